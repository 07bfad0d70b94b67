//! Request model: commands, parameter sets and validated options.

mod command;
mod options;
mod params;

pub use command::Command;
pub use options::{
    ArriveDepart, DepartureOptions, InvalidOption, LatLon, MaxWalk, Minimize, PreviewTime,
    SearchCount, TripPlan,
};
pub use params::{ID_DELIMITER, IdList, Params};

pub(crate) use options::format_date;

//! Validated optional arguments for the accessor methods.
//!
//! Each option type guarantees its value is in the range the API accepts.
//! Options left at the API's own default are not sent at all, which keeps
//! the parameter set (and therefore the cache key) of a default request
//! minimal.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use super::params::{IdList, Params};

/// Error returned when an option value is outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {name}: {reason}")]
pub struct InvalidOption {
    name: &'static str,
    reason: String,
}

impl InvalidOption {
    pub(crate) fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    lat: f64,
    lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidOption> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidOption::new("latitude", format!("{lat} not in -90..=90")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidOption::new("longitude", format!("{lon} not in -180..=180")));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// How far ahead to look for departures, in minutes (0 to 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTime(u8);

impl PreviewTime {
    pub const DEFAULT: PreviewTime = PreviewTime(30);
    pub const MAX: u8 = 60;

    pub fn new(minutes: u8) -> Result<Self, InvalidOption> {
        if minutes > Self::MAX {
            return Err(InvalidOption::new(
                "preview time",
                format!("{minutes} minutes not in 0..={}", Self::MAX),
            ));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u8 {
        self.0
    }
}

impl Default for PreviewTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of stops a search returns (1 to 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCount(u8);

impl SearchCount {
    pub const DEFAULT: SearchCount = SearchCount(10);

    pub fn new(count: u8) -> Result<Self, InvalidOption> {
        if !(1..=100).contains(&count) {
            return Err(InvalidOption::new(
                "search count",
                format!("{count} not in 1..=100"),
            ));
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for SearchCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maximum walking distance for a planned trip, in miles (0.1 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxWalk(f64);

impl MaxWalk {
    pub const DEFAULT: MaxWalk = MaxWalk(0.5);

    pub fn new(miles: f64) -> Result<Self, InvalidOption> {
        if !(0.1..=1.0).contains(&miles) {
            return Err(InvalidOption::new(
                "max walk",
                format!("{miles} miles not in 0.1..=1.0"),
            ));
        }
        Ok(Self(miles))
    }

    pub fn miles(&self) -> f64 {
        self.0
    }
}

impl Default for MaxWalk {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What the trip planner should optimise for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Minimize {
    #[default]
    Time,
    Walking,
    Transfers,
}

impl Minimize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Minimize::Time => "time",
            Minimize::Walking => "walking",
            Minimize::Transfers => "transfers",
        }
    }
}

impl fmt::Display for Minimize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the planned trip's time is a departure or an arrival time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArriveDepart {
    #[default]
    Depart,
    Arrive,
}

impl ArriveDepart {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArriveDepart::Depart => "depart",
            ArriveDepart::Arrive => "arrive",
        }
    }
}

impl fmt::Display for ArriveDepart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filters for a departure board.
#[derive(Debug, Clone, Default)]
pub struct DepartureOptions {
    /// Only departures on these routes.
    pub routes: Option<IdList>,
    /// Look-ahead window.
    pub preview_time: PreviewTime,
    /// Maximum number of departures.
    pub count: Option<u32>,
}

impl DepartureOptions {
    pub fn with_routes(mut self, routes: IdList) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn with_preview_time(mut self, preview_time: PreviewTime) -> Self {
        self.preview_time = preview_time;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub(crate) fn apply(&self, params: &mut Params) {
        if let Some(routes) = &self.routes {
            params.set("route_id", routes);
        }
        if self.preview_time != PreviewTime::DEFAULT {
            params.set("pt", self.preview_time.minutes());
        }
        if let Some(count) = self.count {
            params.set("count", count);
        }
    }
}

/// Options shared by both trip planner commands.
#[derive(Debug, Clone, Default)]
pub struct TripPlan {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub max_walk: MaxWalk,
    pub minimize: Minimize,
    pub arrive_depart: ArriveDepart,
}

impl TripPlan {
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_max_walk(mut self, max_walk: MaxWalk) -> Self {
        self.max_walk = max_walk;
        self
    }

    pub fn minimizing(mut self, minimize: Minimize) -> Self {
        self.minimize = minimize;
        self
    }

    pub fn arriving(mut self) -> Self {
        self.arrive_depart = ArriveDepart::Arrive;
        self
    }

    pub(crate) fn apply(&self, params: &mut Params) {
        if let Some(date) = self.date {
            params.set("date", format_date(date));
        }
        if let Some(time) = self.time {
            params.set("time", time.format("%H:%M"));
        }
        if self.max_walk != MaxWalk::DEFAULT {
            params.set("max_walk", self.max_walk.miles());
        }
        if self.minimize != Minimize::default() {
            params.set("minimize", self.minimize);
        }
        if self.arrive_depart != ArriveDepart::default() {
            params.set("arrive_depart", self.arrive_depart);
        }
    }
}

/// Dates are sent as `YYYY-MM-DD`.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

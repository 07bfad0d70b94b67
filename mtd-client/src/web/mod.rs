//! Demo web page for browsing the MTD API.
//!
//! One page answers everything, driven by the query string: departures for
//! a stop, a route's names, stops near a point, stop search, and full stop
//! or route listings.

mod routes;
mod state;
pub mod templates;

pub use routes::{AppError, DemoQuery, View, create_router};
pub use state::AppState;
pub use templates::*;

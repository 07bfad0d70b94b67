//! MTD API response payloads.
//!
//! These types map directly to the JSON objects found under each command's
//! result field. They use `Option` and `#[serde(default)]` liberally because
//! the API omits fields rather than sending nulls, and older API versions
//! name some fields differently.

use serde::{Deserialize, Serialize};

/// A bus route. Returned by `GetRoute`, `GetRoutes` and `GetRoutesByStop`,
/// and embedded in departures.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Route {
    pub route_id: String,

    /// Route number shown on the bus, e.g. "22".
    #[serde(default)]
    pub route_short_name: Option<String>,

    /// Route name, e.g. "Illini".
    #[serde(default)]
    pub route_long_name: Option<String>,

    /// Hex colour of the route, without `#`.
    #[serde(default)]
    pub route_color: Option<String>,

    /// Hex colour of text drawn on the route colour, without `#`.
    #[serde(default)]
    pub route_text_color: Option<String>,
}

/// A stop: either a parent stop or one of its boarding points.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Stop {
    pub stop_id: String,

    #[serde(default)]
    pub stop_name: Option<String>,

    /// Text message code for the stop.
    #[serde(default)]
    pub code: Option<String>,

    /// Distance from the queried point, in feet (`GetStopsByLatLon` only).
    #[serde(default)]
    pub distance: Option<f64>,

    /// How closely the stop matches a search query (`GetStopsBySearch`).
    #[serde(default)]
    pub percent_match: Option<f64>,

    /// The boarding points making up a parent stop. Named `points` in
    /// API version 2.0.
    #[serde(default, alias = "points")]
    pub stop_points: Vec<StopPoint>,
}

/// A boarding point of a parent stop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopPoint {
    pub stop_id: String,

    #[serde(default)]
    pub stop_name: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub stop_lat: Option<f64>,

    #[serde(default)]
    pub stop_lon: Option<f64>,
}

/// A vehicle's position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// An upcoming departure from a stop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Departure {
    /// The boarding point the bus will be at.
    pub stop_id: String,

    /// Text usually shown on the headsign.
    #[serde(default)]
    pub headsign: Option<String>,

    pub route: Route,

    #[serde(default)]
    pub trip: Option<Trip>,

    #[serde(default)]
    pub vehicle_id: Option<String>,

    #[serde(default)]
    pub origin: Option<StopRef>,

    #[serde(default)]
    pub destination: Option<StopRef>,

    /// Whether the vehicle is reporting its position.
    #[serde(default)]
    pub is_monitored: bool,

    /// Whether this trip was scheduled (as opposed to added).
    #[serde(default)]
    pub is_scheduled: bool,

    /// Scheduled departure time (ISO 8601).
    #[serde(default)]
    pub scheduled: Option<String>,

    /// Expected departure time (ISO 8601).
    #[serde(default)]
    pub expected: Option<String>,

    /// Minutes until the expected departure.
    #[serde(default)]
    pub expected_mins: Option<i64>,

    #[serde(default)]
    pub location: Option<Location>,
}

/// A reference to a stop by id.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopRef {
    pub stop_id: String,
}

/// A scheduled trip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Trip {
    pub trip_id: String,

    #[serde(default)]
    pub trip_headsign: Option<String>,

    #[serde(default)]
    pub route_id: Option<String>,

    #[serde(default)]
    pub block_id: Option<String>,

    #[serde(default)]
    pub direction: Option<String>,

    #[serde(default)]
    pub service_id: Option<String>,

    #[serde(default)]
    pub shape_id: Option<String>,
}

/// A scheduled stop of a trip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopTime {
    /// Scheduled arrival time (`HH:MM:SS`; may exceed 24:00 for trips
    /// running past midnight).
    #[serde(default)]
    pub arrival_time: Option<String>,

    #[serde(default)]
    pub departure_time: Option<String>,

    #[serde(default)]
    pub stop_sequence: Option<u32>,

    #[serde(default)]
    pub stop_id: Option<String>,

    #[serde(default)]
    pub stop_point: Option<StopPoint>,

    #[serde(default)]
    pub trip: Option<Trip>,
}

/// A date on which a service runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalendarDate {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub service_id: String,
}

/// One point of a route's path on the map.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShapePoint {
    /// Total distance travelled along the shape up to this point.
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,

    pub shape_pt_lat: f64,

    pub shape_pt_lon: f64,

    #[serde(default)]
    pub shape_pt_sequence: Option<u32>,

    /// Stop associated with this point, if any.
    #[serde(default)]
    pub stop_id: Option<String>,
}

/// A complete plan for a requested trip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Itinerary {
    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    /// Total travel time in minutes.
    #[serde(default)]
    pub travel_time: Option<i64>,

    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One walking or riding part of an itinerary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Leg {
    /// `"Walk"` or `"Service"`.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub walk: Option<Walk>,

    /// A riding leg may span several services on one vehicle.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Leg {
    pub fn is_walk(&self) -> bool {
        self.kind.eq_ignore_ascii_case("walk")
    }
}

/// A walking leg.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Walk {
    #[serde(default)]
    pub begin: Place,

    #[serde(default)]
    pub end: Place,

    /// Compass direction of travel, e.g. "NE".
    #[serde(default)]
    pub direction: Option<String>,

    /// Miles.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// One vehicle ride within a riding leg.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Service {
    #[serde(default)]
    pub begin: Place,

    #[serde(default)]
    pub end: Place,

    #[serde(default)]
    pub route: Option<Route>,

    #[serde(default)]
    pub trip: Option<Trip>,
}

/// Where a leg begins or ends: a stop or an arbitrary point.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Place {
    #[serde(default)]
    pub name: Option<String>,

    /// Set when the place is a stop.
    #[serde(default)]
    pub stop_id: Option<String>,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// ISO 8601.
    #[serde(default)]
    pub time: Option<String>,
}

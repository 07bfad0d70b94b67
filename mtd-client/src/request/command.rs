//! The remote operations exposed by the MTD API.

use std::fmt;

use crate::cache::CHANGESET_PARAM;

/// A named remote operation.
///
/// Each command maps to one endpoint (`.../json/{name}`) and yields its
/// result under a single payload field of the response document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GetCalendarDatesByDate,
    GetCalendarDatesByService,
    GetDeparturesByStop,
    GetRoute,
    GetRoutes,
    GetRoutesByStop,
    GetShape,
    GetShapeBetweenStops,
    GetStop,
    GetStops,
    GetStopsByLatLon,
    GetStopsBySearch,
    GetStopTimesByTrip,
    GetStopTimesByStop,
    GetPlannedTripsByLatLon,
    GetPlannedTripsByStops,
    GetTrip,
    GetTripsByBlock,
    GetTripsByRoute,
    GetLastFeedUpdate,
}

impl Command {
    /// Every command, in API documentation order.
    pub const ALL: [Command; 20] = [
        Command::GetCalendarDatesByDate,
        Command::GetCalendarDatesByService,
        Command::GetDeparturesByStop,
        Command::GetRoute,
        Command::GetRoutes,
        Command::GetRoutesByStop,
        Command::GetShape,
        Command::GetShapeBetweenStops,
        Command::GetStop,
        Command::GetStops,
        Command::GetStopsByLatLon,
        Command::GetStopsBySearch,
        Command::GetStopTimesByTrip,
        Command::GetStopTimesByStop,
        Command::GetPlannedTripsByLatLon,
        Command::GetPlannedTripsByStops,
        Command::GetTrip,
        Command::GetTripsByBlock,
        Command::GetTripsByRoute,
        Command::GetLastFeedUpdate,
    ];

    /// The command name as it appears in the request path.
    pub fn name(self) -> &'static str {
        self.wire().name
    }

    /// The query parameters the command understands, besides the API key
    /// and the change-token.
    pub fn params(self) -> &'static [&'static str] {
        self.wire().params
    }

    /// The top-level field of the response document holding the result.
    pub fn result_field(self) -> &'static str {
        self.wire().result_field
    }

    /// Whether `name` is a parameter of this command. Every cacheable
    /// command also takes the change-token.
    pub fn accepts(self, name: &str) -> bool {
        self.params().contains(&name) || (self.is_cacheable() && name == CHANGESET_PARAM)
    }

    /// Whether responses for this command go through the disk cache.
    ///
    /// The feed timestamp is itself the revalidation oracle, so it is
    /// always fetched fresh.
    pub fn is_cacheable(self) -> bool {
        self != Command::GetLastFeedUpdate
    }

    fn wire(self) -> Wire {
        match self {
            Command::GetCalendarDatesByDate => {
                Wire::new("GetCalendarDatesByDate", &["date"], "calendar_dates")
            }
            Command::GetCalendarDatesByService => {
                Wire::new("GetCalendarDatesByService", &["service_id"], "calendar_dates")
            }
            Command::GetDeparturesByStop => Wire::new(
                "GetDeparturesByStop",
                &["stop_id", "route_id", "pt", "count"],
                "departures",
            ),
            Command::GetRoute => Wire::new("GetRoute", &["route_id"], "routes"),
            Command::GetRoutes => Wire::new("GetRoutes", &[], "routes"),
            Command::GetRoutesByStop => Wire::new("GetRoutesByStop", &["stop_id"], "routes"),
            Command::GetShape => Wire::new("GetShape", &["shape_id"], "shapes"),
            Command::GetShapeBetweenStops => Wire::new(
                "GetShapeBetweenStops",
                &["begin_stop_id", "end_stop_id", "shape_id"],
                "shapes",
            ),
            Command::GetStop => Wire::new("GetStop", &["stop_id"], "stops"),
            Command::GetStops => Wire::new("GetStops", &[], "stops"),
            Command::GetStopsByLatLon => {
                Wire::new("GetStopsByLatLon", &["lat", "lon", "count"], "stops")
            }
            Command::GetStopsBySearch => {
                Wire::new("GetStopsBySearch", &["query", "count"], "stops")
            }
            Command::GetStopTimesByTrip => {
                Wire::new("GetStopTimesByTrip", &["trip_id"], "stop_times")
            }
            Command::GetStopTimesByStop => Wire::new(
                "GetStopTimesByStop",
                &["stop_id", "route_id", "date"],
                "stop_times",
            ),
            Command::GetPlannedTripsByLatLon => Wire::new(
                "GetPlannedTripsByLatLon",
                &[
                    "origin_lat",
                    "origin_lon",
                    "destination_lat",
                    "destination_lon",
                    "date",
                    "time",
                    "max_walk",
                    "minimize",
                    "arrive_depart",
                ],
                "itineraries",
            ),
            Command::GetPlannedTripsByStops => Wire::new(
                "GetPlannedTripsByStops",
                &[
                    "origin_stop_id",
                    "destination_stop_id",
                    "date",
                    "time",
                    "max_walk",
                    "minimize",
                    "arrive_depart",
                ],
                "itineraries",
            ),
            Command::GetTrip => Wire::new("GetTrip", &["trip_id"], "trips"),
            Command::GetTripsByBlock => Wire::new("GetTripsByBlock", &["block_id"], "trips"),
            Command::GetTripsByRoute => Wire::new("GetTripsByRoute", &["route_id"], "trips"),
            Command::GetLastFeedUpdate => Wire::new("GetLastFeedUpdate", &[], "last_updated"),
        }
    }
}

/// One row of the command table.
struct Wire {
    name: &'static str,
    params: &'static [&'static str],
    result_field: &'static str,
}

impl Wire {
    const fn new(
        name: &'static str,
        params: &'static [&'static str],
        result_field: &'static str,
    ) -> Self {
        Self {
            name,
            params,
            result_field,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

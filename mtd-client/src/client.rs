//! Typed accessors for every MTD API command.
//!
//! Each accessor only assembles a parameter set and names the payload type;
//! [`MtdClient::call`] does the cached lookup and field extraction for all
//! of them.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiClient, ApiConfig, ApiError, HttpTransport, Transport};
use crate::cache::{CacheConfig, CachedApiClient};
use crate::request::{
    Command, DepartureOptions, IdList, LatLon, Params, SearchCount, TripPlan, format_date,
};
use crate::types::{CalendarDate, Departure, Itinerary, Route, ShapePoint, Stop, StopTime, Trip};

/// Number of stops requested when filtering by radius.
const RADIUS_QUERY_COUNT: u32 = 30;

/// Default number of stops returned by `GetStopsByLatLon`.
const DEFAULT_NEARBY_COUNT: u32 = 20;

const FEET_PER_MILE: f64 = 5280.0;

/// Client for the MTD API with a revalidating disk cache.
pub struct MtdClient<T = HttpTransport> {
    cache: CachedApiClient<T>,
}

impl MtdClient<HttpTransport> {
    /// Create a client that talks HTTP.
    pub fn new(api: ApiConfig, cache: &CacheConfig) -> Result<Self, ApiError> {
        Ok(Self::from_cached(CachedApiClient::new(ApiClient::new(api)?, cache)))
    }
}

impl<T: Transport> MtdClient<T> {
    /// Create a client on top of any transport.
    pub fn with_transport(api: ApiConfig, transport: T, cache: &CacheConfig) -> Self {
        Self::from_cached(CachedApiClient::new(
            ApiClient::with_transport(api, transport),
            cache,
        ))
    }

    pub fn from_cached(cache: CachedApiClient<T>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CachedApiClient<T> {
        &self.cache
    }

    /// Mutable access for changing the cache directory or enabled flag.
    pub fn cache_mut(&mut self) -> &mut CachedApiClient<T> {
        &mut self.cache
    }

    /// Run any command through the cache and decode its payload field.
    pub async fn call<R: DeserializeOwned>(
        &self,
        command: Command,
        params: &Params,
    ) -> Result<R, ApiError> {
        let fetched = self.cache.get(command, params).await?;
        debug!(%command, source = ?fetched.source, "response ready");
        fetched.document.extract(command.result_field())
    }

    // ===== Calendar dates =====

    /// Service ids that run on `date`.
    pub async fn calendar_dates_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<CalendarDate>, ApiError> {
        let params = Params::new().with("date", format_date(date));
        self.call(Command::GetCalendarDatesByDate, &params).await
    }

    /// Every date on which `service_id` runs.
    pub async fn calendar_dates_by_service(
        &self,
        service_id: &str,
    ) -> Result<Vec<CalendarDate>, ApiError> {
        let params = Params::new().with("service_id", service_id);
        self.call(Command::GetCalendarDatesByService, &params).await
    }

    // ===== Departures =====

    /// Upcoming departures from a stop.
    pub async fn departures_by_stop(
        &self,
        stop_id: &str,
        options: &DepartureOptions,
    ) -> Result<Vec<Departure>, ApiError> {
        let mut params = Params::new().with("stop_id", stop_id);
        options.apply(&mut params);
        self.call(Command::GetDeparturesByStop, &params).await
    }

    // ===== Routes =====

    pub async fn route(&self, route_ids: &IdList) -> Result<Vec<Route>, ApiError> {
        let params = Params::new().with("route_id", route_ids);
        self.call(Command::GetRoute, &params).await
    }

    pub async fn routes(&self) -> Result<Vec<Route>, ApiError> {
        self.call(Command::GetRoutes, &Params::new()).await
    }

    /// Routes serving a stop.
    pub async fn routes_by_stop(&self, stop_id: &str) -> Result<Vec<Route>, ApiError> {
        let params = Params::new().with("stop_id", stop_id);
        self.call(Command::GetRoutesByStop, &params).await
    }

    // ===== Shapes =====

    pub async fn shape(&self, shape_id: &str) -> Result<Vec<ShapePoint>, ApiError> {
        let params = Params::new().with("shape_id", shape_id);
        self.call(Command::GetShape, &params).await
    }

    /// The part of a shape between two stops.
    pub async fn shape_between_stops(
        &self,
        begin_stop_id: &str,
        end_stop_id: &str,
        shape_id: &str,
    ) -> Result<Vec<ShapePoint>, ApiError> {
        let params = Params::new()
            .with("begin_stop_id", begin_stop_id)
            .with("end_stop_id", end_stop_id)
            .with("shape_id", shape_id);
        self.call(Command::GetShapeBetweenStops, &params).await
    }

    // ===== Stops =====

    pub async fn stop(&self, stop_ids: &IdList) -> Result<Vec<Stop>, ApiError> {
        let params = Params::new().with("stop_id", stop_ids);
        self.call(Command::GetStop, &params).await
    }

    /// Every stop in the system (2500+).
    pub async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
        self.call(Command::GetStops, &Params::new()).await
    }

    /// The stops closest to a point, nearest first. The server returns 20
    /// when `count` is `None`.
    pub async fn stops_by_lat_lon(
        &self,
        point: LatLon,
        count: Option<u32>,
    ) -> Result<Vec<Stop>, ApiError> {
        let params = lat_lon_params(point)
            .with_opt("count", count.filter(|&c| c != DEFAULT_NEARBY_COUNT));
        self.call(Command::GetStopsByLatLon, &params).await
    }

    /// The stops within `radius_miles` of a point, nearest first.
    ///
    /// Asks for the nearest 30 stops and cuts the list at the first one
    /// further away than the radius. This relies on the server returning
    /// stops in ascending `distance` order; stops without a distance are
    /// kept. An empty result means no stop lies within the radius.
    pub async fn stops_within_radius(
        &self,
        point: LatLon,
        radius_miles: f64,
    ) -> Result<Vec<Stop>, ApiError> {
        let params = lat_lon_params(point).with("count", RADIUS_QUERY_COUNT);
        let stops: Vec<Stop> = self.call(Command::GetStopsByLatLon, &params).await?;

        let found = stops.len();
        let stops = within_radius(stops, radius_miles * FEET_PER_MILE);
        if stops.is_empty() {
            debug!(radius_miles, "no stops found within radius");
        } else if stops.len() == found {
            debug!(radius_miles, found, "radial limit not reached");
        }
        Ok(stops)
    }

    /// Stops matching a name or a stop code (e.g. `MTD3121`).
    pub async fn stops_by_search(
        &self,
        query: &str,
        count: SearchCount,
    ) -> Result<Vec<Stop>, ApiError> {
        let params = Params::new()
            .with("query", query)
            .with_opt("count", (count != SearchCount::DEFAULT).then(|| count.get()));
        self.call(Command::GetStopsBySearch, &params).await
    }

    // ===== Stop times =====

    /// The scheduled stops of a trip.
    pub async fn stop_times_by_trip(&self, trip_id: &str) -> Result<Vec<StopTime>, ApiError> {
        let params = Params::new().with("trip_id", trip_id);
        self.call(Command::GetStopTimesByTrip, &params).await
    }

    /// Scheduled stop times at a stop, optionally limited to some routes
    /// and a service date.
    pub async fn stop_times_by_stop(
        &self,
        stop_id: &str,
        route_ids: Option<&IdList>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<StopTime>, ApiError> {
        let params = Params::new()
            .with("stop_id", stop_id)
            .with_opt("route_id", route_ids)
            .with_opt("date", date.map(format_date));
        self.call(Command::GetStopTimesByStop, &params).await
    }

    // ===== Trip planner =====

    /// Up to three itineraries between two points.
    pub async fn planned_trips_by_lat_lon(
        &self,
        origin: LatLon,
        destination: LatLon,
        plan: &TripPlan,
    ) -> Result<Vec<Itinerary>, ApiError> {
        let mut params = Params::new()
            .with("origin_lat", origin.lat())
            .with("origin_lon", origin.lon())
            .with("destination_lat", destination.lat())
            .with("destination_lon", destination.lon());
        plan.apply(&mut params);
        self.call(Command::GetPlannedTripsByLatLon, &params).await
    }

    /// Up to three itineraries between two stops.
    pub async fn planned_trips_by_stops(
        &self,
        origin_stop_id: &str,
        destination_stop_id: &str,
        plan: &TripPlan,
    ) -> Result<Vec<Itinerary>, ApiError> {
        let mut params = Params::new()
            .with("origin_stop_id", origin_stop_id)
            .with("destination_stop_id", destination_stop_id);
        plan.apply(&mut params);
        self.call(Command::GetPlannedTripsByStops, &params).await
    }

    // ===== Trips =====

    pub async fn trip(&self, trip_ids: &IdList) -> Result<Vec<Trip>, ApiError> {
        let params = Params::new().with("trip_id", trip_ids);
        self.call(Command::GetTrip, &params).await
    }

    pub async fn trips_by_block(&self, block_id: &str) -> Result<Vec<Trip>, ApiError> {
        let params = Params::new().with("block_id", block_id);
        self.call(Command::GetTripsByBlock, &params).await
    }

    pub async fn trips_by_route(&self, route_id: &str) -> Result<Vec<Trip>, ApiError> {
        let params = Params::new().with("route_id", route_id);
        self.call(Command::GetTripsByRoute, &params).await
    }

    // ===== Metadata =====

    /// When the feed was last updated. Never cached.
    pub async fn last_feed_update(&self) -> Result<String, ApiError> {
        self.cache.last_feed_update().await
    }
}

fn lat_lon_params(point: LatLon) -> Params {
    Params::new().with("lat", point.lat()).with("lon", point.lon())
}

/// Cut `stops` at the first stop further than `radius_feet`.
fn within_radius(mut stops: Vec<Stop>, radius_feet: f64) -> Vec<Stop> {
    if let Some(cut) = stops
        .iter()
        .position(|s| s.distance.is_some_and(|d| d > radius_feet))
    {
        stops.truncate(cut);
    }
    stops
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::api::MockTransport;
    use crate::cache::Source;
    use crate::request::{MaxWalk, Minimize, PreviewTime};

    fn client(
        cache: impl FnOnce(CacheConfig) -> CacheConfig,
    ) -> (MtdClient<MockTransport>, MockTransport, TempDir) {
        let dir = tempdir().unwrap();
        let mock = MockTransport::new();
        let client = MtdClient::with_transport(
            ApiConfig::new("k"),
            mock.clone(),
            &cache(CacheConfig::new(dir.path())),
        );
        (client, mock, dir)
    }

    fn stop_with_distance(id: &str, distance: Option<f64>) -> Stop {
        Stop {
            stop_id: id.to_string(),
            stop_name: None,
            code: None,
            distance,
            percent_match: None,
            stop_points: Vec::new(),
        }
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn routes_with_cache_disabled() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(
            Command::GetRoutes,
            r#"{"status":{"code":200,"msg":"OK"},"routes":[{"route_id":"22","route_short_name":"ILLINI"}]}"#,
        )
        .await;

        let routes = client.routes().await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route_id, "22");
        assert_eq!(routes[0].route_short_name.as_deref(), Some("ILLINI"));
    }

    #[tokio::test]
    async fn unchanged_changeset_returns_cached_stops() {
        let (client, mock, _dir) = client(|c| c);
        let params = Params::new().with("stop_id", "IU");
        let cached = r#"{"changeset_id":"5","stops":[{"stop_id":"IU","stop_name":"Illini Union"}]}"#;
        std::fs::write(client.cache().cache_path(Command::GetStop, &params), cached).unwrap();
        mock.respond(Command::GetStop, r#"{"status":{"code":200},"new_changeset":false}"#)
            .await;

        let stops = client.stop(&IdList::single("IU").unwrap()).await.unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].stop_name.as_deref(), Some("Illini Union"));
        assert_eq!(mock.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn second_call_revalidates() {
        let (client, mock, _dir) = client(|c| c);
        mock.respond(
            Command::GetRoutes,
            r#"{"status":{"code":200},"changeset_id":"9","routes":[{"route_id":"GREEN"}]}"#,
        )
        .await;
        mock.respond(Command::GetRoutes, r#"{"status":{"code":200},"new_changeset":false}"#)
            .await;

        let first = client.routes().await.unwrap();
        let second = client.routes().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            mock.requests_for(Command::GetRoutes).await[1],
            pairs(&[("changeset_id", "9")])
        );
    }

    #[tokio::test]
    async fn departures_parameters() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(
            Command::GetDeparturesByStop,
            r#"{"status":{"code":200},"departures":[{"stop_id":"IU:1","headsign":"22N","route":{"route_id":"ILLINI"},"expected_mins":3}]}"#,
        )
        .await;

        let options = DepartureOptions::default()
            .with_routes(IdList::new(["ILLINI", "GREEN"]).unwrap())
            .with_preview_time(PreviewTime::new(45).unwrap());
        let departures = client.departures_by_stop("IU", &options).await.unwrap();

        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].expected_mins, Some(3));
        assert_eq!(
            mock.requests_for(Command::GetDeparturesByStop).await,
            vec![pairs(&[("stop_id", "IU"), ("route_id", "ILLINI;GREEN"), ("pt", "45")])]
        );
    }

    #[tokio::test]
    async fn search_omits_default_count() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        let body = r#"{"status":{"code":200},"stops":[]}"#;
        mock.respond(Command::GetStopsBySearch, body).await;
        mock.respond(Command::GetStopsBySearch, body).await;

        client
            .stops_by_search("green & wright", SearchCount::default())
            .await
            .unwrap();
        client
            .stops_by_search("green & wright", SearchCount::new(3).unwrap())
            .await
            .unwrap();

        assert_eq!(
            mock.requests_for(Command::GetStopsBySearch).await,
            vec![
                pairs(&[("query", "green & wright")]),
                pairs(&[("query", "green & wright"), ("count", "3")]),
            ]
        );
    }

    #[tokio::test]
    async fn radius_truncates_at_first_distant_stop() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(
            Command::GetStopsByLatLon,
            r#"{"status":{"code":200},"stops":[
                {"stop_id":"A","distance":100.0},
                {"stop_id":"B","distance":2000.0},
                {"stop_id":"C","distance":3000.0},
                {"stop_id":"D","distance":9000.0}
            ]}"#,
        )
        .await;

        let point = LatLon::new(40.11, -88.23).unwrap();
        let stops = client.stops_within_radius(point, 0.5).await.unwrap();

        let ids: Vec<_> = stops.iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(
            mock.requests_for(Command::GetStopsByLatLon).await,
            vec![pairs(&[("lat", "40.11"), ("lon", "-88.23"), ("count", "30")])]
        );
    }

    #[tokio::test]
    async fn accessor_parameters() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        let script = [
            (Command::GetCalendarDatesByDate, "calendar_dates"),
            (Command::GetRoutesByStop, "routes"),
            (Command::GetShapeBetweenStops, "shapes"),
            (Command::GetStops, "stops"),
            (Command::GetStopTimesByTrip, "stop_times"),
            (Command::GetPlannedTripsByLatLon, "itineraries"),
            (Command::GetTrip, "trips"),
        ];
        for (command, field) in script {
            mock.respond(command, format!(r#"{{"status":{{"code":200}},"{field}":[]}}"#))
                .await;
        }

        let date = NaiveDate::from_ymd_opt(2012, 1, 26).unwrap();
        let origin = LatLon::new(40.1, -88.2).unwrap();
        let destination = LatLon::new(40.2, -88.3).unwrap();
        assert!(client.calendar_dates_by_date(date).await.unwrap().is_empty());
        assert!(client.routes_by_stop("IU").await.unwrap().is_empty());
        assert!(client.shape_between_stops("IU", "PAR", "5W").await.unwrap().is_empty());
        assert!(client.stops().await.unwrap().is_empty());
        assert!(client.stop_times_by_trip("t1").await.unwrap().is_empty());
        assert!(client
            .planned_trips_by_lat_lon(origin, destination, &TripPlan::default().arriving())
            .await
            .unwrap()
            .is_empty());
        let trips = IdList::new(["t1", "t2"]).unwrap();
        assert!(client.trip(&trips).await.unwrap().is_empty());

        let expected = [
            (Command::GetCalendarDatesByDate, pairs(&[("date", "2012-01-26")])),
            (Command::GetRoutesByStop, pairs(&[("stop_id", "IU")])),
            (
                Command::GetShapeBetweenStops,
                pairs(&[("begin_stop_id", "IU"), ("end_stop_id", "PAR"), ("shape_id", "5W")]),
            ),
            (Command::GetStops, pairs(&[])),
            (Command::GetStopTimesByTrip, pairs(&[("trip_id", "t1")])),
            (
                Command::GetPlannedTripsByLatLon,
                pairs(&[
                    ("origin_lat", "40.1"),
                    ("origin_lon", "-88.2"),
                    ("destination_lat", "40.2"),
                    ("destination_lon", "-88.3"),
                    ("arrive_depart", "arrive"),
                ]),
            ),
            (Command::GetTrip, pairs(&[("trip_id", "t1;t2")])),
        ];
        for (command, params) in expected {
            for (name, _) in &params {
                assert!(command.accepts(name), "{command} does not list {name}");
            }
            assert_eq!(mock.requests_for(command).await, vec![params], "{command}");
        }
        assert_eq!(mock.pending().await, 0);
    }

    #[test]
    fn within_radius_edge_cases() {
        assert!(within_radius(Vec::new(), 100.0).is_empty());

        let all_far = vec![stop_with_distance("A", Some(500.0))];
        assert!(within_radius(all_far, 100.0).is_empty());

        let all_near = vec![
            stop_with_distance("A", Some(10.0)),
            stop_with_distance("B", None),
            stop_with_distance("C", Some(100.0)),
        ];
        assert_eq!(within_radius(all_near, 100.0).len(), 3);
    }

    #[tokio::test]
    async fn nearby_stops_omit_default_count() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        let body = r#"{"status":{"code":200},"stops":[]}"#;
        mock.respond(Command::GetStopsByLatLon, body).await;
        mock.respond(Command::GetStopsByLatLon, body).await;
        let point = LatLon::new(40.0, -88.0).unwrap();

        client.stops_by_lat_lon(point, Some(20)).await.unwrap();
        client.stops_by_lat_lon(point, Some(5)).await.unwrap();

        let requests = mock.requests_for(Command::GetStopsByLatLon).await;
        assert_eq!(requests[0], pairs(&[("lat", "40"), ("lon", "-88")]));
        assert_eq!(requests[1], pairs(&[("lat", "40"), ("lon", "-88"), ("count", "5")]));
    }

    #[tokio::test]
    async fn planned_trip_parameters() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(
            Command::GetPlannedTripsByStops,
            r#"{"status":{"code":200},"itineraries":[{"travel_time":12,"legs":[]}]}"#,
        )
        .await;

        let plan = TripPlan::default()
            .on(NaiveDate::from_ymd_opt(2012, 1, 26).unwrap())
            .at(NaiveTime::from_hms_opt(17, 30, 0).unwrap())
            .with_max_walk(MaxWalk::new(0.3).unwrap())
            .minimizing(Minimize::Walking);
        let itineraries = client
            .planned_trips_by_stops("IU", "PAR", &plan)
            .await
            .unwrap();

        assert_eq!(itineraries[0].travel_time, Some(12));
        assert_eq!(
            mock.requests_for(Command::GetPlannedTripsByStops).await,
            vec![pairs(&[
                ("origin_stop_id", "IU"),
                ("destination_stop_id", "PAR"),
                ("date", "2012-01-26"),
                ("time", "17:30"),
                ("max_walk", "0.3"),
                ("minimize", "walking"),
            ])]
        );
    }

    #[tokio::test]
    async fn stop_times_by_stop_parameters() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(
            Command::GetStopTimesByStop,
            r#"{"status":{"code":200},"stop_times":[{"arrival_time":"08:01:00","departure_time":"08:01:00","stop_sequence":4}]}"#,
        )
        .await;

        let routes = IdList::single("GREEN").unwrap();
        let date = NaiveDate::from_ymd_opt(2012, 2, 1).unwrap();
        let times = client
            .stop_times_by_stop("IU", Some(&routes), Some(date))
            .await
            .unwrap();

        assert_eq!(times[0].stop_sequence, Some(4));
        assert_eq!(
            mock.requests_for(Command::GetStopTimesByStop).await,
            vec![pairs(&[("stop_id", "IU"), ("route_id", "GREEN"), ("date", "2012-02-01")])]
        );
    }

    #[tokio::test]
    async fn missing_payload_field_is_an_error() {
        let (client, mock, _dir) = client(CacheConfig::disabled);
        mock.respond(Command::GetTripsByRoute, r#"{"status":{"code":200}}"#)
            .await;

        let err = client.trips_by_route("GREEN").await.unwrap_err();
        assert!(matches!(err, ApiError::Payload { field: "trips", .. }));
    }

    #[tokio::test]
    async fn server_error_is_no_data() {
        let (client, mock, _dir) = client(|c| c);
        mock.respond(
            Command::GetShape,
            r#"{"status":{"code":400,"msg":"shape_id is invalid"}}"#,
        )
        .await;

        assert!(client.shape("nope").await.is_err());
        let path = client
            .cache()
            .cache_path(Command::GetShape, &Params::new().with("shape_id", "nope"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn last_feed_update_is_uncached() {
        let (client, mock, dir) = client(|c| c);
        mock.respond(
            Command::GetLastFeedUpdate,
            r#"{"status":{"code":200},"last_updated":"2012-01-20T15:00:00-06:00"}"#,
        )
        .await;

        let updated = client.last_feed_update().await.unwrap();
        assert_eq!(updated, "2012-01-20T15:00:00-06:00");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn call_reports_cache_hits() {
        let (client, mock, _dir) = client(|c| c);
        let params = Params::new().with("block_id", "GN_1");
        std::fs::write(
            client.cache().cache_path(Command::GetTripsByBlock, &params),
            r#"{"changeset_id":"1","trips":[{"trip_id":"t1"}]}"#,
        )
        .unwrap();
        mock.respond(Command::GetTripsByBlock, r#"{"status":{"code":202}}"#)
            .await;

        let fetched = client
            .cache()
            .get(Command::GetTripsByBlock, &params)
            .await
            .unwrap();
        assert_eq!(fetched.source, Source::Cache);
    }

    #[tokio::test]
    async fn toggling_cache_through_client() {
        let (mut client, mock, _dir) = client(|c| c);
        client.cache_mut().set_enabled(false);
        mock.respond(
            Command::GetCalendarDatesByService,
            r#"{"status":{"code":200},"calendar_dates":[{"date":"2012-01-26","service_id":"A1"}]}"#,
        )
        .await;

        let dates = client.calendar_dates_by_service("A1").await.unwrap();
        assert_eq!(dates[0].date, "2012-01-26");
        assert!(!client.cache().is_enabled());
    }
}

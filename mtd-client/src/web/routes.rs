//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::api::{ApiError, ApiStatus, Transport};
use crate::client::MtdClient;
use crate::request::{DepartureOptions, IdList, LatLon, SearchCount};

use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router<T>(state: AppState<T>, static_dir: &str) -> Router
where
    T: Transport + 'static,
{
    Router::new()
        .route("/", get(index_page::<T>))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Query parameters of the demo page.
#[derive(Debug, Default, Deserialize)]
pub struct DemoQuery {
    pub stop_id: Option<String>,
    pub route_id: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub limit: Option<u32>,
    pub q: Option<String>,
    pub show: Option<String>,
}

/// What the demo page should list.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Departures(String),
    Route(String),
    Nearby { point: LatLon, limit: Option<u32> },
    Search(String),
    AllStops,
    AllRoutes,
    Home,
}

impl DemoQuery {
    /// Pick the view. Earlier parameters win: `stop_id`, `route_id`,
    /// `lat`+`lon`, `q`, then `show`.
    pub fn view(&self) -> Result<View, AppError> {
        if let Some(stop_id) = non_empty(&self.stop_id) {
            return Ok(View::Departures(stop_id.to_string()));
        }
        if let Some(route_id) = non_empty(&self.route_id) {
            return Ok(View::Route(route_id.to_string()));
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            let point = LatLon::new(lat, lon).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })?;
            return Ok(View::Nearby {
                point,
                limit: self.limit,
            });
        }
        if let Some(q) = non_empty(&self.q) {
            return Ok(View::Search(q.to_string()));
        }
        Ok(match self.show.as_deref() {
            Some("stops") => View::AllStops,
            Some("routes") => View::AllRoutes,
            _ => View::Home,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The demo page.
async fn index_page<T: Transport>(
    State(state): State<AppState<T>>,
    Query(query): Query<DemoQuery>,
) -> Result<Html<String>, AppError> {
    let page = build_page(&state.mtd, query.view()?).await?;
    let html = page.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

async fn build_page<T: Transport>(
    mtd: &MtdClient<T>,
    view: View,
) -> Result<IndexTemplate, AppError> {
    let page = match view {
        View::Departures(stop_id) => {
            let departures = mtd
                .departures_by_stop(&stop_id, &DepartureOptions::default())
                .await?;
            let items = departures.iter().map(ItemView::from_departure).collect();
            IndexTemplate::new(format!("Departures from {stop_id}"), items)
                .when_empty("No departures in the next 30 minutes.")
        }
        View::Route(route_id) => {
            let ids = IdList::single(route_id.as_str()).map_err(ApiError::from)?;
            let routes = mtd.route(&ids).await?;
            let items = routes.iter().map(ItemView::from_route).collect();
            IndexTemplate::new(format!("Route {route_id}"), items).when_empty("No such route.")
        }
        View::Nearby { point, limit } => {
            let stops = mtd.stops_by_lat_lon(point, limit).await?;
            let items = stops.iter().map(ItemView::from_stop).collect();
            IndexTemplate::new(
                format!("Stops near {}, {}", point.lat(), point.lon()),
                items,
            )
            .when_empty("No stops nearby.")
        }
        View::Search(q) => {
            let stops = mtd.stops_by_search(&q, SearchCount::default()).await?;
            let items = stops.iter().map(ItemView::from_stop).collect();
            IndexTemplate::new(format!("Stops matching \"{q}\""), items)
                .with_search_form()
                .when_empty("No matching stops.")
        }
        View::AllStops => {
            let stops = mtd.stops().await?;
            let items = stops.iter().map(ItemView::from_stop).collect();
            IndexTemplate::new("All stops", items).with_search_form()
        }
        View::AllRoutes => {
            let routes = mtd.routes().await?;
            let items = routes.iter().map(ItemView::from_route_listing).collect();
            IndexTemplate::new("All routes", items)
        }
        View::Home => IndexTemplate::new("MTD", Vec::new())
            .with_search_form()
            .when_empty("Search for a stop, or browse all stops and routes."),
    };
    Ok(page)
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::InvalidOption(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            ApiError::Status {
                status: ApiStatus::InvalidParameter,
                ..
            } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::Upstream { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mtd_client::MtdClient;
use mtd_client::api::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_VERSION};
use mtd_client::cache::{CacheConfig, DEFAULT_CACHE_DIR};
use mtd_client::web::{AppState, create_router};

const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("MTD_API_KEY").unwrap_or_else(|_| {
        warn!("MTD_API_KEY not set. API calls will fail.");
        String::new()
    });

    let api_config = ApiConfig::new(api_key)
        .with_base_url(env_or("MTD_API_URL", DEFAULT_BASE_URL))
        .with_version(env_or("MTD_API_VERSION", DEFAULT_VERSION));

    let mut cache_config = CacheConfig::new(env_or("MTD_CACHE_DIR", DEFAULT_CACHE_DIR));
    if std::env::var("MTD_CACHE").is_ok_and(|v| v.eq_ignore_ascii_case("off")) {
        cache_config = cache_config.disabled();
    }
    info!(
        dir = %cache_config.dir.display(),
        enabled = cache_config.enabled,
        "response cache"
    );

    let mtd = MtdClient::new(api_config, &cache_config).expect("Failed to create MTD client");

    // Build app state and router
    let state = AppState::new(mtd);
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    let app = create_router(state, static_dir);

    // Bind and serve
    let addr: SocketAddr = env_or("MTD_LISTEN", DEFAULT_LISTEN)
        .parse()
        .expect("MTD_LISTEN must be a socket address");
    info!("MTD demo listening on http://{addr}");
    info!("  GET  /          - Demo page (?stop_id, ?route_id, ?lat&lon, ?q, ?show=stops|routes)");
    info!("  GET  /health    - Health check");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

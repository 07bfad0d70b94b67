//! Client for the Champaign-Urbana MTD transit API.
//!
//! Every command of the API is available as a typed accessor on
//! [`MtdClient`]. Responses are kept in a disk cache and revalidated against
//! the server on each request, so large static datasets are only
//! downloaded again when they change.
//!
//! ```no_run
//! use mtd_client::api::ApiConfig;
//! use mtd_client::cache::CacheConfig;
//! use mtd_client::MtdClient;
//!
//! # async fn run() -> Result<(), mtd_client::api::ApiError> {
//! let mtd = MtdClient::new(ApiConfig::new("your-api-key"), &CacheConfig::default())?;
//! for route in mtd.routes().await? {
//!     println!("{} {:?}", route.route_id, route.route_long_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod client;
pub mod request;
pub mod types;
pub mod web;

pub use client::MtdClient;

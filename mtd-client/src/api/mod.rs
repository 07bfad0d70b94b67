//! MTD developer API client.
//!
//! This module provides an HTTP client for the Champaign-Urbana Mass
//! Transit District developer API, which serves GTFS-derived transit data
//! and real-time departures as JSON.
//!
//! Key characteristics of the API:
//! - Every request is `GET {base}/v{version}/json/{command}?key=...`
//! - Every response carries a `status` envelope (`code`, `msg`); the HTTP
//!   status is not meaningful on its own
//! - Static datasets carry a `changeset_id` that can be sent back to ask
//!   whether the data has changed

mod client;
mod document;
mod error;
mod mock;
mod status;
mod transport;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, DEFAULT_VERSION, RawResponse};
pub use document::Document;
pub use error::ApiError;
pub use mock::MockTransport;
pub use status::{ApiStatus, StatusEnvelope};
pub use transport::{HttpTransport, Transport};

pub(crate) use document::token_string;

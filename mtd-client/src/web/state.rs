//! Application state for the web layer.

use std::sync::Arc;

use crate::api::HttpTransport;
use crate::client::MtdClient;

/// Shared application state.
pub struct AppState<T = HttpTransport> {
    /// Cached MTD API client
    pub mtd: Arc<MtdClient<T>>,
}

impl<T> AppState<T> {
    pub fn new(mtd: MtdClient<T>) -> Self {
        Self { mtd: Arc::new(mtd) }
    }
}

// Not derived: the transport itself need not be `Clone`.
impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            mtd: Arc::clone(&self.mtd),
        }
    }
}

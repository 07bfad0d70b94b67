//! Revalidating disk cache for API responses.
//!
//! Static datasets (stops, routes, trips...) change rarely but are large, so
//! every response is kept on disk and revalidated on the next request
//! instead of being downloaded again:
//!
//! - a cached document with a `changeset_id` is re-requested with that
//!   token; the server answers "not modified" cheaply if it still holds
//! - a cached document with a `time` stamp is compared against the feed's
//!   last update time
//! - anything else is fetched fresh
//!
//! Fresh documents always overwrite the slot. A failure never falls back
//! to stale data.

mod key;
mod locks;
mod revalidate;
mod store;

use std::path::PathBuf;

pub use key::CacheKey;
pub use locks::KeyLocks;
pub use revalidate::{CachedApiClient, Fetched, Source};
pub use store::{CacheError, DiskStore};

use crate::api::Document;

/// Name of the parameter that carries a change-token back to the server.
pub const CHANGESET_PARAM: &str = "changeset_id";

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one file per cache key.
    pub dir: PathBuf,

    /// When false, every request is fetched fresh (and still persisted).
    pub enabled: bool,

    /// Maximum number of per-key locks kept around.
    pub lock_capacity: u64,
}

impl CacheConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_lock_capacity(mut self, capacity: u64) -> Self {
        self.lock_capacity = capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            enabled: true,
            lock_capacity: 10_000,
        }
    }
}

/// How a cached document can be checked for freshness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Served with a change-token.
    Changeset(String),
    /// Served with a feed timestamp and no change-token.
    Timestamp(String),
    /// Neither; the document must be fetched again.
    Unknown,
}

impl Validity {
    pub fn of(document: &Document) -> Self {
        if let Some(token) = document.changeset_id() {
            Validity::Changeset(token)
        } else if let Some(time) = document.timestamp() {
            Validity::Timestamp(time)
        } else {
            Validity::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.dir, PathBuf::from("cache"));
        assert!(config.enabled);
        assert_eq!(config.lock_capacity, 10_000);
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::new("/tmp/mtd").disabled().with_lock_capacity(8);
        assert_eq!(config.dir, PathBuf::from("/tmp/mtd"));
        assert!(!config.enabled);
        assert_eq!(config.lock_capacity, 8);
    }

    #[test]
    fn validity_prefers_changeset() {
        let doc = Document::parse(r#"{"changeset_id":"5","time":"T","stops":[]}"#).unwrap();
        assert_eq!(Validity::of(&doc), Validity::Changeset("5".into()));

        let doc = Document::parse(r#"{"time":"2012-01-26T10:00:00-06:00"}"#).unwrap();
        assert_eq!(
            Validity::of(&doc),
            Validity::Timestamp("2012-01-26T10:00:00-06:00".into())
        );

        let doc = Document::parse(r#"{"departures":[]}"#).unwrap();
        assert_eq!(Validity::of(&doc), Validity::Unknown);
    }
}

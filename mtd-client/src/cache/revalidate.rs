//! The cache lookup and revalidation flow.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, Document, HttpTransport, Transport, token_string};
use crate::request::{Command, Params};

use super::key::CacheKey;
use super::locks::KeyLocks;
use super::store::DiskStore;
use super::{CHANGESET_PARAM, CacheConfig, Validity};

/// Where a returned document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The cached copy, confirmed current by the server.
    Cache,
    /// A fresh download.
    Network,
}

/// An authoritative document and its origin.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub document: Document,
    pub source: Source,
}

/// API client with a revalidating disk cache in front of it.
pub struct CachedApiClient<T = HttpTransport> {
    client: ApiClient<T>,
    store: DiskStore,
    enabled: bool,
    locks: KeyLocks,
}

impl<T: Transport> CachedApiClient<T> {
    pub fn new(client: ApiClient<T>, config: &CacheConfig) -> Self {
        Self {
            client,
            store: DiskStore::new(&config.dir),
            enabled: config.enabled,
            locks: KeyLocks::new(config.lock_capacity),
        }
    }

    /// Access the underlying client for requests that bypass the cache.
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn cache_dir(&self) -> &Path {
        self.store.dir()
    }

    /// Move the cache to another directory. Existing files are not moved.
    pub fn set_cache_dir(&mut self, dir: impl Into<PathBuf>) {
        self.store = DiskStore::new(dir);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Path of the file that holds (or would hold) a request's document.
    pub fn cache_path(&self, command: Command, params: &Params) -> PathBuf {
        self.store.path_for(&CacheKey::new(command, params))
    }

    /// Get the authoritative document for a request.
    ///
    /// Returns the cached document only when the server confirms it is
    /// current; otherwise fetches fresh and persists the result. Failing to
    /// persist is logged and otherwise ignored.
    pub async fn get(&self, command: Command, params: &Params) -> Result<Fetched, ApiError> {
        if !command.is_cacheable() {
            let document = self.client.fetch_success(command, params).await?;
            return Ok(Fetched {
                document,
                source: Source::Network,
            });
        }

        let key = CacheKey::new(command, params);
        let _guard = self.locks.lock(&key).await;

        if self.enabled {
            if let Some(cached) = self.store.load(&key) {
                debug!(%key, "cache file retrieved");
                if self.is_current(command, params, &cached).await {
                    debug!(%key, "using cached data");
                    return Ok(Fetched {
                        document: cached,
                        source: Source::Cache,
                    });
                }
            }
        } else {
            debug!(%key, "cache disabled");
        }

        self.fetch_fresh(command, params, &key).await
    }

    /// The time the feed was last updated, fetched uncached.
    pub async fn last_feed_update(&self) -> Result<String, ApiError> {
        let field = Command::GetLastFeedUpdate.result_field();
        let document = self
            .client
            .fetch_success(Command::GetLastFeedUpdate, &Params::new())
            .await?;
        document
            .field(field)
            .and_then(token_string)
            .ok_or_else(|| ApiError::Payload {
                field,
                message: "field missing from response".to_string(),
            })
    }

    async fn is_current(&self, command: Command, params: &Params, cached: &Document) -> bool {
        match Validity::of(cached) {
            Validity::Changeset(token) => self.revalidate(command, params, &token).await,
            Validity::Timestamp(time) => self.matches_feed_update(&time).await,
            Validity::Unknown => {
                debug!(%command, "cached dataset has no changeset_id or timestamp");
                false
            }
        }
    }

    /// Ask the server whether the dataset behind `token` is still current.
    async fn revalidate(&self, command: Command, params: &Params, token: &str) -> bool {
        debug!(%command, changeset_id = token, "revalidating cached data");
        let mut with_token = params.clone();
        with_token.set(CHANGESET_PARAM, token);

        match self.client.fetch(command, &with_token).await {
            Ok(response) if response.status.is_not_modified() => true,
            Ok(response)
                if response.status.is_success()
                    && response.document.new_changeset() == Some(false) =>
            {
                true
            }
            Ok(response) => {
                debug!(%command, code = response.status.code(), "dataset changed");
                false
            }
            Err(e) => {
                debug!(%command, error = %e, "revalidation failed");
                false
            }
        }
    }

    /// Compare a cached feed timestamp with the server's, exactly.
    async fn matches_feed_update(&self, time: &str) -> bool {
        match self.last_feed_update().await {
            Ok(updated) if updated == time => true,
            Ok(updated) => {
                debug!(cached = time, updated = %updated, "feed updated since dataset was cached");
                false
            }
            Err(e) => {
                debug!(error = %e, "could not fetch last feed update");
                false
            }
        }
    }

    async fn fetch_fresh(
        &self,
        command: Command,
        params: &Params,
        key: &CacheKey,
    ) -> Result<Fetched, ApiError> {
        debug!(%key, "getting new data from server");
        let document = self.client.fetch_success(command, params).await?;

        match self.store.save(key, &document) {
            Ok(path) => debug!(path = %path.display(), "data cached"),
            Err(e) => warn!(error = %e, "data could not be cached"),
        }

        Ok(Fetched {
            document,
            source: Source::Network,
        })
    }
}

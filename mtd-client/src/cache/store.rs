//! Disk storage for cached response documents.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::api::Document;

use super::key::CacheKey;

/// Errors from persisting a document. Never fatal to a lookup.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One file per cache key, holding the response body verbatim.
///
/// Files are overwritten on every fresh fetch and never deleted.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Load the document stored under `key`.
    ///
    /// Returns `None` if the file is missing, unreadable, empty, or not a
    /// JSON object.
    pub fn load(&self, key: &CacheKey) -> Option<Document> {
        let path = self.path_for(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(%key, error = %e, "cache file could not be accessed");
                return None;
            }
        };

        if contents.trim().is_empty() {
            debug!(%key, "cache file empty");
            return None;
        }

        match Document::parse(contents) {
            Ok(document) => Some(document),
            Err(e) => {
                debug!(%key, error = %e, "cache file is not a JSON document");
                None
            }
        }
    }

    /// Store `document` under `key`, replacing any previous file.
    ///
    /// Creates the cache directory if it doesn't exist.
    pub fn save(&self, key: &CacheKey, document: &Document) -> Result<PathBuf, CacheError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path_for(key);
        std::fs::write(&path, document.body()).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

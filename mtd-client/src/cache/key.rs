//! Cache key derivation.

use std::fmt::{self, Write};

use sha2::{Digest, Sha256};

use crate::request::{Command, Params};

use super::CHANGESET_PARAM;

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME: usize = 255;

/// Identifies one cache slot: a command plus its ordered parameters.
///
/// The key is `Command&name=value&...` with every name and value
/// percent-encoded, a pure function of the request, so the same logical
/// request always addresses the same file and a `&` or `=` inside a value
/// cannot collide with another parameter set. The change-token parameter is
/// excluded: revalidation requests share the slot of the request they
/// revalidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(command: Command, params: &Params) -> Self {
        let mut key = command.name().to_string();
        for (name, value) in params.iter().filter(|(n, _)| *n != CHANGESET_PARAM) {
            // Writing to a String cannot fail.
            let _ = write!(
                key,
                "&{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            );
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this slot inside the cache directory.
    ///
    /// The key is percent-encoded so that any parameter value (path
    /// separators included) yields a single file name. Names that would
    /// exceed [`MAX_FILE_NAME`] become the command name plus the SHA-256 of
    /// the key.
    pub fn file_name(&self) -> String {
        let name = format!("{}.json", urlencoding::encode(&self.0));
        if name.len() <= MAX_FILE_NAME {
            return name;
        }

        let command = self.0.split('&').next().unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        format!("{command}-{:x}.json", hasher.finalize())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Per-key mutual exclusion for cache slots.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::key::CacheKey;

/// Hands out one async mutex per cache key.
///
/// The registry holds at most `capacity` locks. A lock that is evicted while
/// held stays valid for its holder, but a later caller for the same key may
/// then get a fresh one.
#[derive(Clone)]
pub struct KeyLocks {
    locks: MokaCache<CacheKey, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new(capacity: u64) -> Self {
        let locks = MokaCache::builder().max_capacity(capacity).build();
        Self { locks }
    }

    /// Wait for exclusive access to `key`'s slot.
    pub async fn lock(&self, key: &CacheKey) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(key.clone(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

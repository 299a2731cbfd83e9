//! Best-effort mirroring of records into the cache.
//!
//! The durable store is authoritative. Cache failures are logged and never
//! propagated, so a cache outage degrades freshness but not correctness.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{RecordCache, RecordCacheKey};
use crate::domain::{Record, RecordId};

/// Wraps a [`RecordCache`] and swallows its failures.
#[derive(Clone)]
pub struct CacheSynchronizer {
    cache: Arc<dyn RecordCache>,
}

impl CacheSynchronizer {
    /// Wrap the given cache adapter.
    pub fn new(cache: Arc<dyn RecordCache>) -> Self {
        Self { cache }
    }

    /// Mirror `record` under its key with the cache TTL.
    pub async fn put(&self, record: &Record) {
        let key = RecordCacheKey::for_record(record.id());
        match self.cache.put(record).await {
            Ok(()) => debug!(%key, "record cached"),
            Err(error) => warn!(%key, %error, "failed to cache record"),
        }
    }

    /// Remove the cache entry for `id`, if any.
    pub async fn evict(&self, id: RecordId) {
        let key = RecordCacheKey::for_record(id);
        match self.cache.evict(id).await {
            Ok(()) => debug!(%key, "record evicted from cache"),
            Err(error) => warn!(%key, %error, "failed to evict record from cache"),
        }
    }
}

//! Port for the expiring record mirror.
//!
//! Adapters store the JSON form of a record under
//! [`RecordCacheKey`](super::RecordCacheKey) with a fixed time-to-live.
//! Callers treat every failure as non-fatal.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Record, RecordId};

use super::define_port_error;

/// Lifetime of a mirrored record.
pub const RECORD_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

define_port_error! {
    /// Errors raised by record cache adapters.
    pub enum RecordCacheError {
        /// The cache backend could not be reached.
        Connection { message: String } => "record cache connection failed: {message}",
        /// The record could not be encoded for storage.
        Serialization { message: String } => "record cache serialization failed: {message}",
        /// The cache rejected a command.
        Command { message: String } => "record cache command failed: {message}",
    }
}

/// Port for mirroring single records into a key-value cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordCache: Send + Sync {
    /// Store the record under its key, replacing any previous entry.
    async fn put(&self, record: &Record) -> Result<(), RecordCacheError>;

    /// Remove the entry for `id`. Removing an absent key succeeds.
    async fn evict(&self, id: RecordId) -> Result<(), RecordCacheError>;
}

/// Cache that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecordCache;

#[async_trait]
impl RecordCache for FixtureRecordCache {
    async fn put(&self, _record: &Record) -> Result<(), RecordCacheError> {
        Ok(())
    }

    async fn evict(&self, _id: RecordId) -> Result<(), RecordCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::RecordFields;

    #[rstest]
    fn ttl_is_five_minutes() {
        assert_eq!(RECORD_CACHE_TTL.as_secs(), 300);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_accepts_everything() {
        let cache = FixtureRecordCache;
        let record = Record::new(RecordId::new(1), RecordFields::default());
        cache.put(&record).await.expect("fixture put succeeds");
        cache.evict(RecordId::new(1)).await.expect("fixture evict succeeds");
    }
}

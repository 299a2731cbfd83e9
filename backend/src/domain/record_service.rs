//! Record domain service.
//!
//! Implements the read and write driving ports. Every mutation goes to the
//! durable store first; the cache is touched only after that succeeds.
//! Nothing serializes an update racing a delete on the same record: the last
//! durable write wins and the cache may briefly hold a stale entry until its
//! TTL lapses.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::info;

use crate::domain::ports::{
    RecordRepository, RecordRepositoryError, RecordsCommand, RecordsQuery, UpdateRecordRequest,
};
use crate::domain::{CacheSynchronizer, Error, Record, RecordId};

pub(crate) fn map_repository_error(error: RecordRepositoryError) -> Error {
    match error {
        RecordRepositoryError::NotFound { id } => {
            Error::not_found(format!("record {id} not found"))
        }
        RecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("record repository unavailable: {message}"))
        }
        RecordRepositoryError::Query { message } => {
            Error::internal(format!("record repository error: {message}"))
        }
    }
}

/// Service implementing [`RecordsQuery`] and [`RecordsCommand`].
pub struct RecordService<R: ?Sized> {
    repository: Arc<R>,
    cache: CacheSynchronizer,
}

impl<R: ?Sized> RecordService<R> {
    /// Create the service over a repository and cache synchronizer.
    pub fn new(repository: Arc<R>, cache: CacheSynchronizer) -> Self {
        Self { repository, cache }
    }
}

impl<R: ?Sized> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: self.cache.clone(),
        }
    }
}

#[async_trait]
impl<R> RecordsQuery for RecordService<R>
where
    R: RecordRepository + ?Sized,
{
    async fn list_records(&self, request: PageRequest) -> Result<Vec<Record>, Error> {
        self.repository
            .page(request)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> RecordsCommand for RecordService<R>
where
    R: RecordRepository + ?Sized,
{
    async fn update_record(&self, request: UpdateRecordRequest) -> Result<Record, Error> {
        let UpdateRecordRequest { id, fields } = request;
        let existing = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;

        let updated = self
            .repository
            .update(&existing.with_fields(fields))
            .await
            .map_err(map_repository_error)?;

        self.cache.put(&updated).await;
        info!(record_id = %id, "record updated");
        Ok(updated)
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;

        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;

        self.cache.evict(id).await;
        info!(record_id = %id, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;

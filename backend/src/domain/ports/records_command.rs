//! Driving port for record mutations.

use async_trait::async_trait;

use crate::domain::{Error, Record, RecordFields, RecordId};

/// Request to overwrite the fields of an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecordRequest {
    /// Record to update. Any identifier carried in the payload is ignored.
    pub id: RecordId,
    /// Replacement values for every mutable field.
    pub fields: RecordFields,
}

/// Write side of the record service.
///
/// Both operations write the durable store first and touch the cache only
/// after that write succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Overwrite a record and refresh its cache entry.
    async fn update_record(&self, request: UpdateRecordRequest) -> Result<Record, Error>;

    /// Delete a record and evict its cache entry.
    async fn delete_record(&self, id: RecordId) -> Result<(), Error>;
}

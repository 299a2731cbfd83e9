//! Port for durable record storage.
//!
//! The repository is the source of truth. Adapters must order pages by
//! identifier ascending and must make [`RecordRepository::bulk_create`]
//! all-or-nothing.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Record, RecordFields, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record repository adapters.
    pub enum RecordRepositoryError {
        /// No record exists with the requested identifier.
        NotFound { id: i64 } => "record {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "record repository query failed: {message}",
    }
}

/// Port for persisting and reading records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Persist every draft in a single transaction and return the stored
    /// records, in input order, with their assigned identifiers.
    async fn bulk_create(
        &self,
        drafts: &[RecordFields],
    ) -> Result<Vec<Record>, RecordRepositoryError>;

    /// Fetch one record by identifier.
    async fn find_by_id(&self, id: RecordId) -> Result<Record, RecordRepositoryError>;

    /// Overwrite every field of the stored record with the same identifier.
    async fn update(&self, record: &Record) -> Result<Record, RecordRepositoryError>;

    /// Remove the record with the given identifier.
    async fn delete(&self, id: RecordId) -> Result<(), RecordRepositoryError>;

    /// Read one page of records ordered by identifier ascending.
    async fn page(&self, request: PageRequest) -> Result<Vec<Record>, RecordRepositoryError>;
}

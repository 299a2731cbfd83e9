//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`RecordRepository`, `RecordCache`, `WorkbookReader`) are
//! implemented by outbound adapters. Driving ports (`RecordsQuery`,
//! `RecordsCommand`, `UploadCommand`, `UploadJobsQuery`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod record_cache;
mod record_repository;
mod records_command;
mod records_query;
mod upload_command;
mod upload_jobs_query;
mod workbook_reader;

pub use cache_key::{RECORD_CACHE_PREFIX, RecordCacheKey};
#[cfg(test)]
pub use record_cache::MockRecordCache;
pub use record_cache::{FixtureRecordCache, RECORD_CACHE_TTL, RecordCache, RecordCacheError};
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use records_command::MockRecordsCommand;
pub use records_command::{RecordsCommand, UpdateRecordRequest};
#[cfg(test)]
pub use records_query::MockRecordsQuery;
pub use records_query::RecordsQuery;
#[cfg(test)]
pub use upload_command::MockUploadCommand;
pub use upload_command::{UploadAccepted, UploadCommand};
#[cfg(test)]
pub use upload_jobs_query::MockUploadJobsQuery;
pub use upload_jobs_query::UploadJobsQuery;
#[cfg(test)]
pub use workbook_reader::MockWorkbookReader;
pub use workbook_reader::{SheetRows, WorkbookReadError, WorkbookReader};

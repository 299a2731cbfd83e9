//! Spreadsheet ingestion.
//!
//! An upload is decoded and its header checked while the request waits.
//! The data rows are then queued as an [`IngestionJob`] and stored by the
//! worker pool; callers poll the job for the outcome.

mod header;
mod jobs;
mod rows;
mod service;
mod worker;

pub use header::{EXPECTED_HEADERS, SchemaMismatch, validate_header};
pub use jobs::{
    DEFAULT_FINISHED_JOB_RETENTION, IngestionJob, IngestionJobId, IngestionJobStatus,
    IngestionJobs, MAX_REPORTED_SKIPPED_ROWS,
};
pub use rows::{RowRejection, SkippedRow, TransformedRows, transform_rows};
pub use service::{IngestionPorts, IngestionService};
pub use worker::{
    DEFAULT_INGEST_QUEUE_CAPACITY, DEFAULT_INGEST_WORKERS, EnqueueError, IngestionPoolConfig,
    IngestionQueue, IngestionTask, IngestionWorker, spawn_ingestion_pool,
};

//! Driving port for spreadsheet uploads.

use async_trait::async_trait;

use crate::domain::{Error, IngestionJobId};

/// Outcome of a validated and queued upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadAccepted {
    /// Job tracking the asynchronous ingestion.
    pub job_id: IngestionJobId,
    /// Number of data rows below the header.
    pub row_count: usize,
}

/// Accepts a workbook, validates it synchronously, and queues ingestion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadCommand: Send + Sync {
    /// Validate the workbook header and queue the rows for ingestion.
    ///
    /// Returns as soon as the job is queued; storage happens later.
    async fn submit_upload(&self, workbook: Vec<u8>) -> Result<UploadAccepted, Error>;
}

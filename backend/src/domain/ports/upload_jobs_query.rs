//! Driving port for polling ingestion jobs.

use async_trait::async_trait;

use crate::domain::{Error, IngestionJob, IngestionJobId};

/// Read access to ingestion job status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadJobsQuery: Send + Sync {
    /// Current snapshot of the job, or a not-found error once it is unknown
    /// or pruned.
    async fn job_status(&self, job_id: IngestionJobId) -> Result<IngestionJob, Error>;
}

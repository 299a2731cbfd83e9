//! Upload service: synchronous validation, asynchronous storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::header::validate_header;
use super::jobs::{IngestionJob, IngestionJobId, IngestionJobs};
use super::worker::{
    EnqueueError, IngestionPoolConfig, IngestionQueue, IngestionTask, IngestionWorker,
    spawn_ingestion_pool,
};
use crate::domain::ports::{
    RecordRepository, UploadAccepted, UploadCommand, UploadJobsQuery, WorkbookReadError,
    WorkbookReader,
};
use crate::domain::{CacheSynchronizer, Error, TraceId};

fn map_read_error(error: WorkbookReadError) -> Error {
    match error {
        WorkbookReadError::Unreadable { .. } => Error::invalid_request("unable to read workbook"),
        WorkbookReadError::NoSheets => Error::invalid_request("no sheets found in the workbook"),
        WorkbookReadError::Rows { message } => {
            Error::internal(format!("error reading rows from workbook: {message}"))
        }
        WorkbookReadError::Empty => Error::internal("error reading rows from workbook: no rows"),
    }
}

/// Driven ports the upload pipeline depends on.
#[derive(Clone)]
pub struct IngestionPorts {
    /// Decodes uploaded workbooks.
    pub reader: Arc<dyn WorkbookReader>,
    /// Durable store receiving the rows.
    pub repository: Arc<dyn RecordRepository>,
    /// Mirror refreshed after each stored batch.
    pub cache: CacheSynchronizer,
}

/// Service implementing [`UploadCommand`] and [`UploadJobsQuery`].
#[derive(Clone)]
pub struct IngestionService {
    reader: Arc<dyn WorkbookReader>,
    queue: IngestionQueue,
    jobs: Arc<IngestionJobs>,
}

impl IngestionService {
    /// Start the worker pool and return the service feeding it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        ports: IngestionPorts,
        jobs: Arc<IngestionJobs>,
        config: IngestionPoolConfig,
    ) -> Self {
        let IngestionPorts {
            reader,
            repository,
            cache,
        } = ports;
        let worker = Arc::new(IngestionWorker::new(repository, cache, Arc::clone(&jobs)));
        let queue = spawn_ingestion_pool(config, worker);
        Self::with_queue(reader, queue, jobs)
    }

    /// Assemble the service around an existing queue.
    pub fn with_queue(
        reader: Arc<dyn WorkbookReader>,
        queue: IngestionQueue,
        jobs: Arc<IngestionJobs>,
    ) -> Self {
        Self {
            reader,
            queue,
            jobs,
        }
    }
}

#[async_trait]
impl UploadCommand for IngestionService {
    async fn submit_upload(&self, workbook: Vec<u8>) -> Result<UploadAccepted, Error> {
        let reader = Arc::clone(&self.reader);
        let sheet = tokio::task::spawn_blocking(move || reader.read_first_sheet(&workbook))
            .await
            .map_err(|err| {
                error!(error = %err, "workbook decoding task failed");
                Error::internal("workbook decoding task failed")
            })?
            .map_err(|err| {
                warn!(error = %err, "rejecting unreadable workbook");
                map_read_error(err)
            })?;

        validate_header(&sheet.header).map_err(|mismatch| {
            warn!(%mismatch, "rejecting workbook with unexpected header");
            Error::invalid_request(mismatch.to_string()).with_details(mismatch.details())
        })?;

        let row_count = sheet.rows.len();
        let job = self.jobs.register(row_count);
        let task = IngestionTask::new(job.id, sheet.rows, TraceId::current());
        if let Err(err) = self.queue.try_enqueue(task) {
            self.jobs.discard(job.id);
            return Err(match err {
                EnqueueError::Full => {
                    warn!(job_id = %job.id, "ingestion queue full; rejecting upload");
                    Error::service_unavailable("ingestion queue is full; retry later")
                }
                EnqueueError::Closed => {
                    error!(job_id = %job.id, "ingestion queue closed");
                    Error::internal("ingestion queue closed")
                }
            });
        }

        info!(job_id = %job.id, row_count, "upload accepted for ingestion");
        Ok(UploadAccepted {
            job_id: job.id,
            row_count,
        })
    }
}

#[async_trait]
impl UploadJobsQuery for IngestionService {
    async fn job_status(&self, job_id: IngestionJobId) -> Result<IngestionJob, Error> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| Error::not_found(format!("ingestion job {job_id} not found")))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

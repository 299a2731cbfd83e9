//! Bounded worker pool that stores uploaded rows off the request path.
//!
//! A bounded channel holds queued batches. One dispatcher task drains it and
//! runs each batch on its own task, gated by a semaphore so that at most
//! `workers` batches touch the stores at once. A full queue is reported to
//! the uploader instead of spawning more work.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::sync::{Semaphore, mpsc};
use tracing::{Instrument, debug, error, info, info_span};

use super::jobs::{IngestionJobId, IngestionJobs};
use super::rows::transform_rows;
use crate::domain::ports::RecordRepository;
use crate::domain::{CacheSynchronizer, TraceId};

/// Default number of batches stored concurrently.
pub const DEFAULT_INGEST_WORKERS: usize = 2;

/// Default number of batches waiting for a worker.
pub const DEFAULT_INGEST_QUEUE_CAPACITY: usize = 16;

/// Concurrent cache writes per batch.
const CACHE_FANOUT: usize = 16;

/// Sizing for the ingestion pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionPoolConfig {
    workers: usize,
    queue_capacity: usize,
}

impl IngestionPoolConfig {
    /// Build a configuration. Zero values are raised to one.
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        Self {
            workers: workers.max(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Maximum concurrent batches.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Maximum queued batches.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

impl Default for IngestionPoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INGEST_WORKERS, DEFAULT_INGEST_QUEUE_CAPACITY)
    }
}

/// One queued batch of data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionTask {
    job_id: IngestionJobId,
    rows: Vec<Vec<String>>,
    trace_id: Option<TraceId>,
}

impl IngestionTask {
    /// Package rows for the job, remembering the submitting request's trace.
    pub fn new(job_id: IngestionJobId, rows: Vec<Vec<String>>, trace_id: Option<TraceId>) -> Self {
        Self {
            job_id,
            rows,
            trace_id,
        }
    }

    /// Job this batch belongs to.
    #[cfg(test)]
    pub(crate) fn job_id(&self) -> IngestionJobId {
        self.job_id
    }

    /// Data rows awaiting storage.
    #[cfg(test)]
    pub(crate) fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Trace identifier of the submitting request.
    #[cfg(test)]
    pub(crate) fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }
}

/// Reasons a batch could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnqueueError {
    /// Every queue slot is taken.
    #[error("ingestion queue is full")]
    Full,
    /// The dispatcher has stopped.
    #[error("ingestion queue is closed")]
    Closed,
}

/// Sending half of the ingestion queue.
#[derive(Clone)]
pub struct IngestionQueue {
    sender: mpsc::Sender<IngestionTask>,
}

impl IngestionQueue {
    /// Queue paired with its receiving half, for driving batches manually.
    #[cfg(test)]
    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<IngestionTask>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Queue a batch without waiting.
    pub fn try_enqueue(&self, task: IngestionTask) -> Result<(), EnqueueError> {
        self.sender.try_send(task).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => EnqueueError::Full,
            mpsc::error::TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }
}

/// Executes a single batch: transform, bulk insert, mirror into the cache.
pub struct IngestionWorker {
    repository: Arc<dyn RecordRepository>,
    cache: CacheSynchronizer,
    jobs: Arc<IngestionJobs>,
}

impl IngestionWorker {
    /// Create a worker over the stores and the shared job registry.
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        cache: CacheSynchronizer,
        jobs: Arc<IngestionJobs>,
    ) -> Self {
        Self {
            repository,
            cache,
            jobs,
        }
    }

    /// Run one batch to completion, recording the outcome on its job.
    pub async fn run(&self, task: IngestionTask) {
        let IngestionTask {
            job_id,
            rows,
            trace_id,
        } = task;
        let span = info_span!("ingestion_job", %job_id, row_count = rows.len());
        TraceId::scope_optional(trace_id, self.process(job_id, rows).instrument(span)).await;
    }

    async fn process(&self, job_id: IngestionJobId, rows: Vec<Vec<String>>) {
        self.jobs.mark_running(job_id);
        let transformed = transform_rows(&rows);
        drop(rows);

        if transformed.drafts.is_empty() {
            info!(skipped = transformed.skipped.len(), "no storable rows in upload");
            self.jobs.mark_completed(job_id, 0, &transformed.skipped);
            return;
        }

        match self.repository.bulk_create(&transformed.drafts).await {
            Ok(stored) => {
                stream::iter(&stored)
                    .for_each_concurrent(CACHE_FANOUT, |record| self.cache.put(record))
                    .await;
                info!(
                    stored = stored.len(),
                    skipped = transformed.skipped.len(),
                    "ingestion job completed"
                );
                self.jobs
                    .mark_completed(job_id, stored.len(), &transformed.skipped);
            }
            Err(err) => {
                error!(error = %err, "ingestion job failed; batch rolled back");
                self.jobs
                    .mark_failed(job_id, err.to_string(), &transformed.skipped);
            }
        }
    }
}

/// Start the dispatcher on the current tokio runtime and return the queue.
pub fn spawn_ingestion_pool(
    config: IngestionPoolConfig,
    worker: Arc<IngestionWorker>,
) -> IngestionQueue {
    let (sender, receiver) = mpsc::channel(config.queue_capacity());
    let permits = Arc::new(Semaphore::new(config.workers()));
    tokio::spawn(dispatch(receiver, permits, worker));
    info!(
        workers = config.workers(),
        queue_capacity = config.queue_capacity(),
        "ingestion pool started"
    );
    IngestionQueue { sender }
}

async fn dispatch(
    mut receiver: mpsc::Receiver<IngestionTask>,
    permits: Arc<Semaphore>,
    worker: Arc<IngestionWorker>,
) {
    while let Some(task) = receiver.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let worker = Arc::clone(&worker);
        tokio::spawn(async move {
            let _permit = permit;
            worker.run(task).await;
        });
    }
    debug!("ingestion queue closed; dispatcher exiting");
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ingestion::{EXPECTED_HEADERS, IngestionJobStatus};
    use crate::domain::ports::{
        FixtureRecordCache, MockRecordCache, MockRecordRepository, RecordRepositoryError,
    };
    use crate::domain::{Record, RecordId};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn data_row(name: &str) -> Vec<String> {
        EXPECTED_HEADERS
            .iter()
            .map(|column| format!("{name}-{column}"))
            .collect()
    }

    fn jobs() -> Arc<IngestionJobs> {
        Arc::new(IngestionJobs::new(Arc::new(DefaultClock)))
    }

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(4, 32, 4, 32)]
    fn config_clamps_to_at_least_one(
        #[case] workers: usize,
        #[case] capacity: usize,
        #[case] expected_workers: usize,
        #[case] expected_capacity: usize,
    ) {
        let config = IngestionPoolConfig::new(workers, capacity);
        assert_eq!(config.workers(), expected_workers);
        assert_eq!(config.queue_capacity(), expected_capacity);
    }

    #[rstest]
    #[tokio::test]
    async fn run_stores_rows_and_caches_each_record() {
        let mut repo = MockRecordRepository::new();
        repo.expect_bulk_create()
            .withf(|drafts| drafts.len() == 2 && drafts[1].first_name == "b-first_name")
            .times(1)
            .returning(|drafts| {
                Ok(drafts
                    .iter()
                    .zip(1..)
                    .map(|(fields, id)| Record::new(RecordId::new(id), fields.clone()))
                    .collect())
            });
        let mut cache = MockRecordCache::new();
        cache.expect_put().times(2).returning(|_| Ok(()));

        let jobs = jobs();
        let job = jobs.register(3);
        let worker = IngestionWorker::new(
            Arc::new(repo),
            CacheSynchronizer::new(Arc::new(cache)),
            Arc::clone(&jobs),
        );

        let mut short = data_row("c");
        short.truncate(3);
        worker
            .run(IngestionTask::new(
                job.id,
                vec![data_row("a"), data_row("b"), short],
                None,
            ))
            .await;

        let done = jobs.get(job.id).expect("job retained");
        assert_eq!(done.status, IngestionJobStatus::Completed);
        assert_eq!(done.stored, 2);
        assert_eq!(done.skipped, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn run_marks_job_failed_when_bulk_insert_fails() {
        let mut repo = MockRecordRepository::new();
        repo.expect_bulk_create()
            .times(1)
            .returning(|_| Err(RecordRepositoryError::query("unique violation")));
        let mut cache = MockRecordCache::new();
        cache.expect_put().times(0);

        let jobs = jobs();
        let job = jobs.register(1);
        let worker = IngestionWorker::new(
            Arc::new(repo),
            CacheSynchronizer::new(Arc::new(cache)),
            Arc::clone(&jobs),
        );

        worker
            .run(IngestionTask::new(job.id, vec![data_row("a")], None))
            .await;

        let failed = jobs.get(job.id).expect("job retained");
        assert_eq!(failed.status, IngestionJobStatus::Failed);
        assert!(
            failed
                .failure
                .as_deref()
                .is_some_and(|message| message.contains("unique violation"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn run_without_storable_rows_skips_repository() {
        let mut repo = MockRecordRepository::new();
        repo.expect_bulk_create().times(0);

        let jobs = jobs();
        let job = jobs.register(1);
        let worker = IngestionWorker::new(
            Arc::new(repo),
            CacheSynchronizer::new(Arc::new(FixtureRecordCache)),
            Arc::clone(&jobs),
        );

        worker
            .run(IngestionTask::new(job.id, vec![vec![String::new(); 10]], None))
            .await;

        let done = jobs.get(job.id).expect("job retained");
        assert_eq!(done.status, IngestionJobStatus::Completed);
        assert_eq!(done.stored, 0);
        assert_eq!(done.skipped, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn full_queue_is_reported() {
        let (queue, _receiver) = IngestionQueue::channel(1);
        let task = IngestionTask::new(IngestionJobId::random(), Vec::new(), None);

        queue.try_enqueue(task.clone()).expect("first slot free");
        assert_eq!(queue.try_enqueue(task), Err(EnqueueError::Full));
    }

    #[rstest]
    #[tokio::test]
    async fn closed_queue_is_reported() {
        let (queue, receiver) = IngestionQueue::channel(1);
        drop(receiver);
        let task = IngestionTask::new(IngestionJobId::random(), Vec::new(), None);

        assert_eq!(queue.try_enqueue(task), Err(EnqueueError::Closed));
    }
}

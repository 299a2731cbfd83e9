//! In-memory registry of ingestion jobs.
//!
//! Jobs live for the lifetime of the process. Unfinished jobs are always
//! kept; finished jobs are pruned oldest-first once more than the retention
//! limit have accumulated.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use super::rows::SkippedRow;

/// Number of finished jobs kept for polling.
pub const DEFAULT_FINISHED_JOB_RETENTION: usize = 256;

/// Upper bound on skipped rows reported per job.
pub const MAX_REPORTED_SKIPPED_ROWS: usize = 100;

/// Identifier handed back to the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngestionJobId(Uuid);

impl IngestionJobId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for IngestionJobId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for IngestionJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IngestionJobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle stage of an ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionJobStatus {
    /// Waiting for a worker.
    Queued,
    /// A worker is storing the rows.
    Running,
    /// Rows were stored.
    Completed,
    /// Storage failed; nothing from this batch was kept.
    Failed,
}

impl IngestionJobStatus {
    /// Whether the job has reached a terminal state.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of one ingestion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionJob {
    /// Job identifier.
    pub id: IngestionJobId,
    /// Current lifecycle stage.
    pub status: IngestionJobStatus,
    /// Number of data rows received.
    pub row_count: usize,
    /// Number of records stored.
    pub stored: usize,
    /// Number of rows skipped during transformation.
    pub skipped: usize,
    /// The first skipped rows, capped at [`MAX_REPORTED_SKIPPED_ROWS`].
    pub skipped_rows: Vec<SkippedRow>,
    /// Failure description for [`IngestionJobStatus::Failed`].
    pub failure: Option<String>,
    /// When the upload was accepted.
    pub submitted_at: DateTime<Utc>,
    /// When a worker picked the job up.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct JobTable {
    jobs: HashMap<IngestionJobId, IngestionJob>,
    finished: VecDeque<IngestionJobId>,
}

/// Thread-safe job registry shared by the upload service and its workers.
pub struct IngestionJobs {
    clock: Arc<dyn Clock>,
    retain_finished: usize,
    table: Mutex<JobTable>,
}

impl IngestionJobs {
    /// Create an empty registry.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            retain_finished: DEFAULT_FINISHED_JOB_RETENTION,
            table: Mutex::new(JobTable::default()),
        }
    }

    /// Override how many finished jobs are retained.
    #[must_use]
    pub fn with_retention(mut self, retain_finished: usize) -> Self {
        self.retain_finished = retain_finished;
        self
    }

    /// Register a new queued job.
    pub fn register(&self, row_count: usize) -> IngestionJob {
        let job = IngestionJob {
            id: IngestionJobId::random(),
            status: IngestionJobStatus::Queued,
            row_count,
            stored: 0,
            skipped: 0,
            skipped_rows: Vec::new(),
            failure: None,
            submitted_at: self.clock.utc(),
            started_at: None,
            finished_at: None,
        };
        self.lock().jobs.insert(job.id, job.clone());
        job
    }

    /// Current snapshot of a job.
    pub fn get(&self, id: IngestionJobId) -> Option<IngestionJob> {
        self.lock().jobs.get(&id).cloned()
    }

    /// Forget a job that never reached the queue.
    pub fn discard(&self, id: IngestionJobId) {
        self.lock().jobs.remove(&id);
    }

    /// Record that a worker started the job.
    pub fn mark_running(&self, id: IngestionJobId) {
        let now = self.clock.utc();
        let mut table = self.lock();
        let Some(job) = table.jobs.get_mut(&id) else {
            return;
        };
        if !job.status.is_finished() {
            job.status = IngestionJobStatus::Running;
            job.started_at = Some(now);
        }
    }

    /// Record a successful batch.
    pub fn mark_completed(&self, id: IngestionJobId, stored: usize, skipped: &[SkippedRow]) {
        self.finish(id, IngestionJobStatus::Completed, stored, skipped, None);
    }

    /// Record a failed batch.
    pub fn mark_failed(
        &self,
        id: IngestionJobId,
        failure: impl Into<String>,
        skipped: &[SkippedRow],
    ) {
        self.finish(
            id,
            IngestionJobStatus::Failed,
            0,
            skipped,
            Some(failure.into()),
        );
    }

    fn finish(
        &self,
        id: IngestionJobId,
        status: IngestionJobStatus,
        stored: usize,
        skipped: &[SkippedRow],
        failure: Option<String>,
    ) {
        let now = self.clock.utc();
        let mut table = self.lock();
        let Some(job) = table.jobs.get_mut(&id) else {
            return;
        };
        if job.status.is_finished() {
            debug!(job_id = %id, "ignoring outcome for finished ingestion job");
            return;
        }
        job.status = status;
        job.stored = stored;
        job.skipped = skipped.len();
        job.skipped_rows = skipped
            .iter()
            .take(MAX_REPORTED_SKIPPED_ROWS)
            .copied()
            .collect();
        job.failure = failure;
        job.finished_at = Some(now);

        table.finished.push_back(id);
        while table.finished.len() > self.retain_finished {
            if let Some(evicted) = table.finished.pop_front() {
                debug!(job_id = %evicted, "pruning finished ingestion job");
                table.jobs.remove(&evicted);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ingestion::RowRejection;
    use chrono::TimeZone;
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn jobs() -> IngestionJobs {
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .returning(|| Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).single().expect("valid time"));
        IngestionJobs::new(Arc::new(clock))
    }

    #[rstest]
    fn register_creates_queued_job(jobs: IngestionJobs) {
        let job = jobs.register(12);
        assert_eq!(job.status, IngestionJobStatus::Queued);
        assert_eq!(job.row_count, 12);
        assert_eq!(jobs.get(job.id), Some(job));
    }

    #[rstest]
    fn completion_records_counts(jobs: IngestionJobs) {
        let job = jobs.register(3);
        jobs.mark_running(job.id);
        assert_eq!(
            jobs.get(job.id).map(|snapshot| snapshot.status),
            Some(IngestionJobStatus::Running)
        );

        let skipped = [SkippedRow {
            row: 4,
            rejection: RowRejection::OutOfRange { fields: 2 },
        }];
        jobs.mark_completed(job.id, 2, &skipped);

        let done = jobs.get(job.id).expect("job retained");
        assert_eq!(done.status, IngestionJobStatus::Completed);
        assert_eq!(done.stored, 2);
        assert_eq!(done.skipped, 1);
        assert_eq!(done.skipped_rows, skipped.to_vec());
        assert!(done.started_at.is_some());
        assert!(done.finished_at.is_some());
    }

    #[rstest]
    fn failure_records_message(jobs: IngestionJobs) {
        let job = jobs.register(1);
        jobs.mark_failed(job.id, "database error", &[]);
        let failed = jobs.get(job.id).expect("job retained");
        assert_eq!(failed.status, IngestionJobStatus::Failed);
        assert_eq!(failed.failure.as_deref(), Some("database error"));
        assert_eq!(failed.stored, 0);
    }

    #[rstest]
    fn finished_jobs_are_pruned_oldest_first(jobs: IngestionJobs) {
        let jobs = jobs.with_retention(2);
        let first = jobs.register(0);
        let second = jobs.register(0);
        let third = jobs.register(0);
        let pending = jobs.register(0);

        for id in [first.id, second.id, third.id] {
            jobs.mark_completed(id, 0, &[]);
        }

        assert!(jobs.get(first.id).is_none());
        assert!(jobs.get(second.id).is_some());
        assert!(jobs.get(third.id).is_some());
        assert!(jobs.get(pending.id).is_some());
    }

    #[rstest]
    fn first_outcome_wins(jobs: IngestionJobs) {
        let jobs = jobs.with_retention(1);
        let job = jobs.register(2);
        jobs.mark_completed(job.id, 2, &[]);
        jobs.mark_failed(job.id, "late failure", &[]);
        jobs.mark_running(job.id);

        let done = jobs.get(job.id).expect("job retained");
        assert_eq!(done.status, IngestionJobStatus::Completed);
        assert_eq!(done.stored, 2);
        assert!(done.failure.is_none());

        let other = jobs.register(0);
        jobs.mark_completed(other.id, 0, &[]);
        assert!(jobs.get(job.id).is_none(), "outcome queued for pruning once");
    }

    #[rstest]
    fn discard_removes_job(jobs: IngestionJobs) {
        let job = jobs.register(5);
        jobs.discard(job.id);
        assert!(jobs.get(job.id).is_none());
    }

    #[rstest]
    fn skipped_rows_report_is_capped(jobs: IngestionJobs) {
        let job = jobs.register(500);
        let skipped: Vec<SkippedRow> = (0..150)
            .map(|row| SkippedRow {
                row,
                rejection: RowRejection::Blank,
            })
            .collect();
        jobs.mark_completed(job.id, 350, &skipped);
        let done = jobs.get(job.id).expect("job retained");
        assert_eq!(done.skipped, 150);
        assert_eq!(done.skipped_rows.len(), MAX_REPORTED_SKIPPED_ROWS);
    }
}

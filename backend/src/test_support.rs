//! In-memory port implementations for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration suites in `tests/`. Both doubles are thread-safe so they can
//! sit behind the `Arc<dyn Port>` handles the services expect.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    RecordCache, RecordCacheError, RecordCacheKey, RecordRepository, RecordRepositoryError,
};
use crate::domain::{Record, RecordFields, RecordId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct RepositoryState {
    rows: BTreeMap<i64, RecordFields>,
    last_id: i64,
    failure: Option<RecordRepositoryError>,
}

/// Repository double keeping records in identifier order.
///
/// Identifiers start at 1 and are never reused, mirroring a `BIGSERIAL`
/// column.
#[derive(Default)]
pub struct InMemoryRecordRepository {
    state: Mutex<RepositoryState>,
}

impl InMemoryRecordRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error` until cleared.
    pub fn fail_with(&self, error: RecordRepositoryError) {
        lock(&self.state).failure = Some(error);
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        lock(&self.state).failure = None;
    }

    /// Every stored record, ordered by identifier.
    pub fn snapshot(&self) -> Vec<Record> {
        lock(&self.state)
            .rows
            .iter()
            .map(|(id, fields)| Record::new(RecordId::new(*id), fields.clone()))
            .collect()
    }

    fn checked(&self) -> Result<MutexGuard<'_, RepositoryState>, RecordRepositoryError> {
        let state = lock(&self.state);
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn bulk_create(
        &self,
        drafts: &[RecordFields],
    ) -> Result<Vec<Record>, RecordRepositoryError> {
        let mut state = self.checked()?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            state.last_id += 1;
            let id = state.last_id;
            state.rows.insert(id, draft.clone());
            created.push(Record::new(RecordId::new(id), draft.clone()));
        }
        Ok(created)
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Record, RecordRepositoryError> {
        let state = self.checked()?;
        state
            .rows
            .get(&id.get())
            .map(|fields| Record::new(id, fields.clone()))
            .ok_or_else(|| RecordRepositoryError::not_found(id.get()))
    }

    async fn update(&self, record: &Record) -> Result<Record, RecordRepositoryError> {
        let mut state = self.checked()?;
        let id = record.id().get();
        let Some(slot) = state.rows.get_mut(&id) else {
            return Err(RecordRepositoryError::not_found(id));
        };
        *slot = record.fields().clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<(), RecordRepositoryError> {
        let mut state = self.checked()?;
        state
            .rows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| RecordRepositoryError::not_found(id.get()))
    }

    async fn page(&self, request: PageRequest) -> Result<Vec<Record>, RecordRepositoryError> {
        let state = self.checked()?;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        Ok(state
            .rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, fields)| Record::new(RecordId::new(*id), fields.clone()))
            .collect())
    }
}

/// Cache double storing the JSON payloads a real cache would hold.
#[derive(Default)]
pub struct InMemoryRecordCache {
    entries: Mutex<HashMap<String, String>>,
    unavailable: Mutex<bool>,
}

impl InMemoryRecordCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    /// Decode the cached entry for `id`, if present.
    pub fn get(&self, id: RecordId) -> Option<Record> {
        let key = RecordCacheKey::for_record(id);
        lock(&self.entries)
            .get(key.as_str())
            .and_then(|payload| serde_json::from_str(payload).ok())
    }

    /// Whether an entry exists for `id`.
    pub fn contains(&self, id: RecordId) -> bool {
        let key = RecordCacheKey::for_record(id);
        lock(&self.entries).contains_key(key.as_str())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn available(&self) -> Result<(), RecordCacheError> {
        if *lock(&self.unavailable) {
            Err(RecordCacheError::connection("cache offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordCache for InMemoryRecordCache {
    async fn put(&self, record: &Record) -> Result<(), RecordCacheError> {
        self.available()?;
        let payload = serde_json::to_string(record)
            .map_err(|err| RecordCacheError::serialization(err.to_string()))?;
        let key = RecordCacheKey::for_record(record.id());
        lock(&self.entries).insert(key.as_str().to_owned(), payload);
        Ok(())
    }

    async fn evict(&self, id: RecordId) -> Result<(), RecordCacheError> {
        self.available()?;
        let key = RecordCacheKey::for_record(id);
        lock(&self.entries).remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn draft(first_name: &str) -> RecordFields {
        RecordFields {
            first_name: first_name.to_owned(),
            ..RecordFields::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pages_are_disjoint_and_ordered() {
        let repo = InMemoryRecordRepository::new();
        let drafts: Vec<_> = (0..15).map(|i| draft(&format!("person-{i}"))).collect();
        repo.bulk_create(&drafts).await.expect("seed succeeds");

        let first = repo.page(PageRequest::new(1, 10)).await.expect("page 1");
        let second = repo.page(PageRequest::new(2, 10)).await.expect("page 2");

        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 5);
        assert_eq!(first[0].id(), RecordId::new(1));
        assert_eq!(second[0].id(), RecordId::new(11));
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_identifiers_are_not_reused() {
        let repo = InMemoryRecordRepository::new();
        let created = repo.bulk_create(&[draft("a")]).await.expect("create");
        repo.delete(created[0].id()).await.expect("delete");
        let again = repo.bulk_create(&[draft("b")]).await.expect("create");
        assert_eq!(again[0].id(), RecordId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn cache_round_trips_json_and_ignores_absent_evict() {
        let cache = InMemoryRecordCache::new();
        let record = Record::new(RecordId::new(5), draft("Ada"));
        cache.put(&record).await.expect("put");
        assert_eq!(cache.get(RecordId::new(5)), Some(record));

        cache.evict(RecordId::new(99)).await.expect("absent evict is a no-op");
        cache.evict(RecordId::new(5)).await.expect("evict");
        assert!(cache.is_empty());
    }
}

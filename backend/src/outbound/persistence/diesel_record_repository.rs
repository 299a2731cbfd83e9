//! PostgreSQL-backed `RecordRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{RecordRepository, RecordRepositoryError};
use crate::domain::{Record, RecordFields, RecordId};

use super::models::{RecordRow, RecordValues};
use super::pool::{DbPool, PoolError};
use super::schema::records;

/// Rows per `INSERT` statement. Ten columns each keeps a chunk well under
/// PostgreSQL's 65535 bind parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Diesel-backed implementation of the record repository port.
#[derive(Clone)]
pub struct DieselRecordRepository {
    pool: DbPool,
}

impl DieselRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordRepositoryError {
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Probe { message } => message,
    };
    RecordRepositoryError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RecordRepositoryError::query("record violates a unique constraint")
        }
        DieselError::DatabaseError(_, _) => RecordRepositoryError::query("database error"),
        DieselError::QueryBuilderError(_) => RecordRepositoryError::query("database query error"),
        _ => RecordRepositoryError::query("database error"),
    }
}

#[async_trait]
impl RecordRepository for DieselRecordRepository {
    async fn bulk_create(
        &self,
        drafts: &[RecordFields],
    ) -> Result<Vec<Record>, RecordRepositoryError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<RecordValues<'_>> = drafts.iter().map(RecordValues::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stored = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let values = &values;
                async move {
                    let mut stored: Vec<RecordRow> = Vec::with_capacity(values.len());
                    for chunk in values.chunks(INSERT_CHUNK_ROWS) {
                        let inserted: Vec<RecordRow> = diesel::insert_into(records::table)
                            .values(chunk)
                            .returning(RecordRow::as_returning())
                            .get_results(conn)
                            .await?;
                        stored.extend(inserted);
                    }
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(count = stored.len(), "records inserted");
        Ok(stored.into_iter().map(Record::from).collect())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Record, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        records::table
            .find(id.get())
            .select(RecordRow::as_select())
            .first::<RecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Record::from)
            .ok_or_else(|| RecordRepositoryError::not_found(id.get()))
    }

    async fn update(&self, record: &Record) -> Result<Record, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = record.id().get();

        diesel::update(records::table.find(id))
            .set(RecordValues::from(record.fields()))
            .returning(RecordRow::as_returning())
            .get_result::<RecordRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Record::from)
            .ok_or_else(|| RecordRepositoryError::not_found(id))
    }

    async fn delete(&self, id: RecordId) -> Result<(), RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(records::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(RecordRepositoryError::not_found(id.get()));
        }
        Ok(())
    }

    async fn page(&self, request: PageRequest) -> Result<Vec<Record>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecordRow> = records::table
            .order(records::id.asc())
            .limit(request.limit())
            .offset(request.offset())
            .select(RecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Record::from).collect())
    }
}

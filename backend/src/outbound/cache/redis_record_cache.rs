//! Redis-backed `RecordCache` using a bb8 connection pool.
//!
//! Records are stored as JSON strings under `record:<id>` with `SET EX`, so
//! every write refreshes the TTL. `DEL` on a missing key returns zero and is
//! treated as success.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, AsyncCommands, RedisError};
use tracing::debug;

use crate::domain::ports::{RECORD_CACHE_TTL, RecordCache, RecordCacheError, RecordCacheKey};
use crate::domain::{Record, RecordId};

/// Connection settings for [`RedisRecordCache`].
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
    ttl: Duration,
}

impl RedisCacheConfig {
    /// Settings for the given `redis://` URL with default pool sizing and
    /// the standard record TTL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
            ttl: RECORD_CACHE_TTL,
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Record cache stored in Redis.
#[derive(Clone)]
pub struct RedisRecordCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
}

fn map_run_error(error: RunError<RedisError>) -> RecordCacheError {
    RecordCacheError::connection(error.to_string())
}

fn map_command_error(error: RedisError) -> RecordCacheError {
    if error.is_connection_dropped() || error.is_io_error() || error.is_timeout() {
        RecordCacheError::connection(error.to_string())
    } else {
        RecordCacheError::command(error.to_string())
    }
}

fn encode(record: &Record) -> Result<String, RecordCacheError> {
    serde_json::to_string(record).map_err(|err| RecordCacheError::serialization(err.to_string()))
}

impl RedisRecordCache {
    /// Build the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`RecordCacheError::Connection`] when the URL is invalid or
    /// the pool cannot be built.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, RecordCacheError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| RecordCacheError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| RecordCacheError::connection(err.to_string()))?;
        Ok(Self {
            pool,
            ttl: config.ttl,
        })
    }

    /// Round-trip a `PING` to confirm the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`RecordCacheError::Connection`] when no connection can be
    /// established.
    pub async fn ping(&self) -> Result<(), RecordCacheError> {
        let mut conn = self.connection().await?;
        let reply: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;
        debug!(%reply, "redis ping");
        Ok(())
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, RecordCacheError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

#[async_trait]
impl RecordCache for RedisRecordCache {
    async fn put(&self, record: &Record) -> Result<(), RecordCacheError> {
        let payload = encode(record)?;
        let key = RecordCacheKey::for_record(record.id());
        let mut conn = self.connection().await?;
        let (): () = conn
            .set_ex(key.as_str(), payload, self.ttl.as_secs())
            .await
            .map_err(map_command_error)?;
        Ok(())
    }

    async fn evict(&self, id: RecordId) -> Result<(), RecordCacheError> {
        let key = RecordCacheKey::for_record(id);
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(key.as_str()).await.map_err(map_command_error)?;
        debug!(%key, removed, "cache entry removed");
        Ok(())
    }
}

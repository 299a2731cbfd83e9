//! Redis cache adapter mirroring individual records.
//!
//! Implements the [`RecordCache`](crate::domain::ports::RecordCache) port
//! with `bb8-redis`. Entries are namespaced `record:<id>` and expire after
//! five minutes.

mod redis_record_cache;

pub use redis_record_cache::{RedisCacheConfig, RedisRecordCache};

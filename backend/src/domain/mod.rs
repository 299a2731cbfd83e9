//! Domain layer: entities, services, and the ports they depend on.
//!
//! Nothing in here knows about HTTP, Diesel, or Redis. Inbound adapters call
//! the driving ports in [`ports`]; outbound adapters implement the driven
//! ones.

mod cache_sync;
pub mod error;
pub mod ingestion;
pub mod ports;
mod record;
mod record_service;
mod trace_id;

pub use cache_sync::CacheSynchronizer;
pub use error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use ingestion::{IngestionJob, IngestionJobId, IngestionJobStatus};
pub use record::{Record, RecordFields, RecordId};
pub use record_service::RecordService;
pub use trace_id::TraceId;

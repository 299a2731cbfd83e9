//! Builders turning driven adapters into the HTTP state's driving ports.

use std::sync::Arc;

use mockable::DefaultClock;

use records::domain::ingestion::{
    IngestionJobs, IngestionPoolConfig, IngestionPorts, IngestionService,
};
use records::domain::{CacheSynchronizer, RecordService};
use records::inbound::http::state::{HttpState, HttpStatePorts};

use super::ServerAdapters;

/// Assemble the record and ingestion services and bundle them for handlers.
///
/// Starts the ingestion worker pool, so it must run inside the server's
/// runtime.
pub(super) fn build_http_state(
    adapters: ServerAdapters,
    ingestion: IngestionPoolConfig,
    max_upload_bytes: usize,
) -> HttpState {
    let ServerAdapters {
        repository,
        cache,
        reader,
    } = adapters;
    let cache = CacheSynchronizer::new(cache);

    let records = Arc::new(RecordService::new(Arc::clone(&repository), cache.clone()));
    let jobs = Arc::new(IngestionJobs::new(Arc::new(DefaultClock)));
    let uploads = Arc::new(IngestionService::spawn(
        IngestionPorts {
            reader,
            repository,
            cache,
        },
        jobs,
        ingestion,
    ));

    HttpState::new(HttpStatePorts {
        records: records.clone(),
        records_command: records,
        uploads: uploads.clone(),
        upload_jobs: uploads,
    })
    .with_max_upload_bytes(max_upload_bytes)
}

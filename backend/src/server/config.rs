//! HTTP server configuration object and helpers.

use std::sync::Arc;

use records::domain::ingestion::IngestionPoolConfig;
use records::domain::ports::{RecordCache, RecordRepository, WorkbookReader};
use records::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

/// Driven adapters the server wires into the domain services.
#[derive(Clone)]
pub struct ServerAdapters {
    pub repository: Arc<dyn RecordRepository>,
    pub cache: Arc<dyn RecordCache>,
    pub reader: Arc<dyn WorkbookReader>,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) max_upload_bytes: usize,
    pub(crate) ingestion: IngestionPoolConfig,
    pub(crate) adapters: ServerAdapters,
}

impl ServerConfig {
    /// Construct a server configuration around the given adapters.
    #[must_use]
    pub fn new(bind_addr: (String, u16), adapters: ServerAdapters) -> Self {
        Self {
            bind_addr,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ingestion: IngestionPoolConfig::default(),
            adapters,
        }
    }

    /// Override the upload size limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Override the ingestion worker pool sizing.
    #[must_use]
    pub fn with_ingestion(mut self, ingestion: IngestionPoolConfig) -> Self {
        self.ingestion = ingestion;
        self
    }
}

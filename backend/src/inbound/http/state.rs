//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{RecordsCommand, RecordsQuery, UploadCommand, UploadJobsQuery};

/// Default cap on the size of an uploaded workbook, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub records: Arc<dyn RecordsQuery>,
    pub records_command: Arc<dyn RecordsCommand>,
    pub uploads: Arc<dyn UploadCommand>,
    pub upload_jobs: Arc<dyn UploadJobsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub records: Arc<dyn RecordsQuery>,
    pub records_command: Arc<dyn RecordsCommand>,
    pub uploads: Arc<dyn UploadCommand>,
    pub upload_jobs: Arc<dyn UploadJobsQuery>,
    pub max_upload_bytes: usize,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the default upload limit.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use records::domain::ports::{RecordsCommand, RecordsQuery, UploadCommand, UploadJobsQuery};
    /// use records::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn build(
    ///     records: Arc<dyn RecordsQuery>,
    ///     records_command: Arc<dyn RecordsCommand>,
    ///     uploads: Arc<dyn UploadCommand>,
    ///     upload_jobs: Arc<dyn UploadJobsQuery>,
    /// ) -> HttpState {
    ///     HttpState::new(HttpStatePorts { records, records_command, uploads, upload_jobs })
    ///         .with_max_upload_bytes(1024 * 1024)
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            records,
            records_command,
            uploads,
            upload_jobs,
        } = ports;
        Self {
            records,
            records_command,
            uploads,
            upload_jobs,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the upload size limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

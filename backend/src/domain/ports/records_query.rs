//! Driving port for paginated record reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Record};

/// Read side of the record service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// Return one page of records ordered by identifier ascending.
    ///
    /// The durable store is read directly; the cache is never consulted.
    async fn list_records(&self, request: PageRequest) -> Result<Vec<Record>, Error>;
}

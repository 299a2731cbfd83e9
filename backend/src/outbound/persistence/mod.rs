//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; the rest of the crate sees only domain types through the
//! [`RecordRepository`](crate::domain::ports::RecordRepository) port.
//!
//! # Example
//!
//! ```no_run
//! use records::outbound::persistence::{DbPool, DieselRecordRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/records")).await?;
//! pool.verify().await?;
//! let repository = DieselRecordRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_record_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_record_repository::DieselRecordRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

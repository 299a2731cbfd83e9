//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `RECORDS_*` environment variables, matching CLI flags,
//! or a configuration file. Only the database URL is mandatory.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ingestion::{DEFAULT_INGEST_QUEUE_CAPACITY, DEFAULT_INGEST_WORKERS};
use crate::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_HOST: &str = "0.0.0.0";

/// Runtime settings for the records service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECORDS")]
pub struct Settings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Redis connection URL.
    pub redis_url: Option<String>,
    /// Address the HTTP listener binds to.
    pub host: Option<String>,
    /// Port the HTTP listener binds to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Number of ingestion batches stored concurrently.
    pub ingest_workers: Option<usize>,
    /// Number of ingestion batches that may wait for a worker.
    pub ingest_queue_capacity: Option<usize>,
    /// Largest accepted workbook, in bytes.
    pub max_upload_bytes: Option<usize>,
}

impl Settings {
    /// Return the database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the Redis URL, falling back to the local default.
    pub fn redis_url(&self) -> &str {
        self.redis_url.as_deref().unwrap_or(DEFAULT_REDIS_URL)
    }

    /// Return the host and port for the HTTP listener.
    pub fn bind_addr(&self) -> (&str, u16) {
        (
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port,
        )
    }

    /// Return the ingestion worker count.
    pub fn ingest_workers(&self) -> usize {
        self.ingest_workers.unwrap_or(DEFAULT_INGEST_WORKERS)
    }

    /// Return the ingestion queue capacity.
    pub fn ingest_queue_capacity(&self) -> usize {
        self.ingest_queue_capacity
            .unwrap_or(DEFAULT_INGEST_QUEUE_CAPACITY)
    }

    /// Return the upload size limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "RECORDS_DATABASE_URL",
        "RECORDS_REDIS_URL",
        "RECORDS_HOST",
        "RECORDS_PORT",
        "RECORDS_INGEST_WORKERS",
        "RECORDS_INGEST_QUEUE_CAPACITY",
        "RECORDS_MAX_UPLOAD_BYTES",
    ];

    fn load_from_empty_args() -> Settings {
        Settings::load_from_iter([OsString::from("records")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert_eq!(settings.redis_url(), DEFAULT_REDIS_URL);
        assert_eq!(settings.bind_addr(), ("0.0.0.0", 8080));
        assert_eq!(settings.ingest_workers(), DEFAULT_INGEST_WORKERS);
        assert_eq!(settings.ingest_queue_capacity(), DEFAULT_INGEST_QUEUE_CAPACITY);
        assert_eq!(settings.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "RECORDS_DATABASE_URL",
                Some("postgres://records@db/records".to_owned()),
            ),
            ("RECORDS_REDIS_URL", Some("redis://cache:6380".to_owned())),
            ("RECORDS_HOST", Some("127.0.0.1".to_owned())),
            ("RECORDS_PORT", Some("9090".to_owned())),
            ("RECORDS_INGEST_WORKERS", Some("4".to_owned())),
            ("RECORDS_INGEST_QUEUE_CAPACITY", Some("32".to_owned())),
            ("RECORDS_MAX_UPLOAD_BYTES", Some("2048".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Some("postgres://records@db/records")
        );
        assert_eq!(settings.redis_url(), "redis://cache:6380");
        assert_eq!(settings.bind_addr(), ("127.0.0.1", 9090));
        assert_eq!(settings.ingest_workers(), 4);
        assert_eq!(settings.ingest_queue_capacity(), 32);
        assert_eq!(settings.max_upload_bytes(), 2048);
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[0].1 = Some("   ".to_owned());
        let _guard = lock_env(vars);

        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn port_alone_is_overridable() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[3].1 = Some("7000".to_owned());
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), ("0.0.0.0", 7000));
        assert!(settings.database_url().is_none());
    }
}

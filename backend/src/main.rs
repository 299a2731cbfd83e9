//! Service entry-point: loads settings, checks both stores, applies
//! migrations, and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use records::domain::ingestion::IngestionPoolConfig;
use records::inbound::http::health::HealthState;
use records::outbound::cache::{RedisCacheConfig, RedisRecordCache};
use records::outbound::persistence::{
    DbPool, DieselRecordRepository, PoolConfig, run_pending_migrations,
};
use records::outbound::workbook::CalamineWorkbookReader;
use records::settings::Settings;
use server::{ServerAdapters, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(error) if error.not_found() => {}
        Err(error) => warn!(%error, "ignoring unreadable environment file"),
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let database_url = settings
        .database_url()
        .ok_or_else(|| eyre!("RECORDS_DATABASE_URL must be set"))?;

    let applied = run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database schema ready");

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to build database pool")?;
    pool.verify().await.wrap_err("database unreachable")?;

    let cache = RedisRecordCache::connect(RedisCacheConfig::new(settings.redis_url()))
        .await
        .wrap_err("failed to build cache pool")?;
    cache.ping().await.wrap_err("cache unreachable")?;
    info!(redis_url = %settings.redis_url(), "connected to cache");

    let adapters = ServerAdapters {
        repository: Arc::new(DieselRecordRepository::new(pool)),
        cache: Arc::new(cache),
        reader: Arc::new(CalamineWorkbookReader::new()),
    };
    let (host, port) = settings.bind_addr();
    let config = ServerConfig::new((host.to_owned(), port), adapters)
        .with_max_upload_bytes(settings.max_upload_bytes())
        .with_ingestion(IngestionPoolConfig::new(
            settings.ingest_workers(),
            settings.ingest_queue_capacity(),
        ));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    info!(%host, port, "listening");
    server.await.wrap_err("HTTP server terminated")?;
    Ok(())
}

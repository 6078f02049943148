use std::env;
use std::sync::Arc;
use std::time::Duration;

use filekeep_api::{build_router, AppState};
use filekeep_core::StorageConfig;
use filekeep_db::PgFileRecordRepository;
use filekeep_processing::{FileService, OrphanSweeper};
use filekeep_storage::LocalContentStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StorageConfig::from_env()?;

    let database_url =
        env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = filekeep_api::setup::database::connect(&database_url).await?;

    let records = PgFileRecordRepository::new(pool);
    records.ensure_schema().await?;
    let records = Arc::new(records);

    let store = Arc::new(LocalContentStore::new(config.upload_path.clone()).await?);

    let sweeper = Arc::new(OrphanSweeper::new(
        store.clone(),
        records.clone(),
        Duration::from_secs(config.sweep_grace_secs),
    ));
    sweeper.start();

    let service = FileService::new(config, store, records);
    let app = build_router(AppState { files: service });

    let port: u16 = env::var("PORT").unwrap_or_else(|_| "7000".to_string()).parse()?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "filekeep API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

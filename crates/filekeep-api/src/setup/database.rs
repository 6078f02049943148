//! Database pool setup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Connect to Postgres with conservative pool limits.
pub async fn connect(database_url: &str) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await?;

    Ok(pool)
}

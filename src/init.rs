use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::Instrument;

use crate::telemetry::{self};
use crate::telemetry::ops::init::Phase as InitPhase;

pub const DEFAULT_DSN: &str = "sqlite://shows.db";

/// Opens (creating if needed) the show database and applies pending migrations.
pub async fn open_pool(dsn: &str) -> Result<SqlitePool> {
    let log = telemetry::init();
    let root = log.root_span_kv([("dsn", dsn.to_string())]);

    async {
        let opts = SqliteConnectOptions::from_str(dsn)
            .with_context(|| format!("invalid database url: {dsn}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .instrument(log.span(&InitPhase::Connect))
            .await
            .context("open database")?;

        sqlx::migrate!()
            .run(&pool)
            .instrument(log.span(&InitPhase::Migrate))
            .await
            .context("apply migrations")?;
        log.debug("database ready");
        Ok::<_, anyhow::Error>(pool)
    }
    .instrument(root)
    .await
}

// In-memory databases are per connection, so tests pin the pool to one.
#[cfg(test)]
pub async fn open_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

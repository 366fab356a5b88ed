use std::time::Duration;

use sqlx::{SqlitePool, migrate::Migrator, sqlite::SqlitePoolOptions};

use crate::config::Config;

pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    MIGRATOR.run(&db_pool).await?;
    tracing::info!(url = %config.database_url, "database ready");

    Ok(db_pool)
}

/// Single-connection in-memory database, migrated. Each call gets a fresh one.
pub async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await?;

    MIGRATOR.run(&db_pool).await?;
    Ok(db_pool)
}

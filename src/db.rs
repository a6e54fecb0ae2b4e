use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

/// Open the shared connection pool.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    tracing::info!(host = %cfg.host, port = cfg.port, database = %cfg.name, "connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(cfg.connect_options())
        .await
        .context("connect to database")?;
    Ok(pool)
}

pub async fn apply_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("apply schema")?;
    Ok(())
}

/// Postgres reports unique and foreign key violations with SQLSTATE class 23.
pub(crate) fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().map_or(false, |c| c.starts_with("23")),
        _ => false,
    }
}

//! Postgres persistence for snippets and user accounts.
//!
//! Exposes pool construction, migrations, the row models, and one repository
//! per table. Every store call is bounded: pool checkout by the acquire
//! timeout and each statement by the server-side `statement_timeout`.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod error;
pub mod models;
pub mod repositories;

pub use error::StoreError;

pub type DbPool = sqlx::PgPool;

/// Connection settings for [`create_pool`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a caller may wait for a free connection.
    pub acquire_timeout: Duration,
    /// Server-side limit for a single statement.
    pub statement_timeout: Duration,
}

/// Create a connection pool from [`DbConfig`].
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.url)?.options([(
        "statement_timeout",
        config.statement_timeout.as_millis().to_string(),
    )]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

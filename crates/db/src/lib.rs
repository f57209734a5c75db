//! SQLite persistence for the Fathom platform.
//!
//! [`models`] holds the row structs and DTOs, [`repositories`] the
//! zero-sized `*Repo` structs that run the queries.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a `sqlite:` database URL.
///
/// The database file is created if it does not exist. WAL journaling lets
/// readers proceed while the sweeper or a generation job writes. Any other
/// scheme is a configuration error; sqlx would otherwise read a
/// `postgres://` URL as a relative file name.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    if !database_url.starts_with("sqlite:") {
        let scheme = database_url.split_once(':').map_or(database_url, |(s, _)| s);
        return Err(sqlx::Error::Configuration(
            format!("unsupported database scheme '{scheme}', only sqlite: URLs are supported").into(),
        ));
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Cheap round-trip used by startup and `/health`.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply every pending migration under `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

//! Database initialization
//!
//! Creates the experiment log store on first run. Initialization is
//! idempotent: opening an existing database re-applies the pragmas and
//! leaves existing rows untouched.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Name of the single row-store table used by the ledger.
pub const EXPERIMENT_TABLE: &str = "experiment_logs";

/// Initialize database connection and create the experiment table if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer; the ledger write path
    // is read-then-write, so keep a bounded busy timeout as well.
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_experiment_logs_table(&pool).await?;

    Ok(pool)
}

/// Create the experiment_logs table
///
/// One row per participant/condition run. The five `vas_*` columns hold one
/// self-reported score per phase; their canonical names may be overridden by
/// a deployed schema, which the service discovers at request time.
pub async fn create_experiment_logs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS experiment_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            participant_name TEXT NOT NULL,
            filter_condition TEXT NOT NULL CHECK (filter_condition IN ('weak', 'mid', 'strong')),
            status TEXT CHECK (status IS NULL OR status IN ('in_progress', 'completed')),
            vas_pre INTEGER,
            vas_warmup INTEGER,
            vas_phase1 INTEGER,
            vas_phase2 INTEGER,
            vas_phase3 INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_experiment_logs_participant \
         ON experiment_logs(participant_name, filter_condition)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

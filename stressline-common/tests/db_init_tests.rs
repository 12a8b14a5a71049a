//! Unit tests for database initialization
//!
//! The store must be created automatically on first run, reopen cleanly,
//! and carry the experiment_logs table with the canonical score columns.

use sqlx::Row;
use stressline_common::db::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("stressline.db");

    let result = init_database(&db_path).await;
    assert!(
        result.is_ok(),
        "Database initialization failed: {:?}",
        result.err()
    );

    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("stressline.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    let pool2 = init_database(&db_path).await;
    assert!(
        pool2.is_ok(),
        "Failed to open existing database: {:?}",
        pool2.err()
    );
}

#[tokio::test]
async fn test_experiment_table_has_canonical_columns() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("stressline.db");

    let pool = init_database(&db_path).await.unwrap();

    let rows = sqlx::query("PRAGMA table_info(experiment_logs)")
        .fetch_all(&pool)
        .await
        .unwrap();
    let columns: Vec<String> = rows.iter().map(|r| r.get::<String, _>("name")).collect();

    for expected in [
        "id",
        "participant_name",
        "filter_condition",
        "status",
        "vas_pre",
        "vas_warmup",
        "vas_phase1",
        "vas_phase2",
        "vas_phase3",
        "created_at",
    ] {
        assert!(
            columns.iter().any(|c| c == expected),
            "missing column {expected}, got {columns:?}"
        );
    }
}

#[tokio::test]
async fn test_condition_check_constraint_rejects_unknown_arm() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("stressline.db");

    let pool = init_database(&db_path).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO experiment_logs (participant_name, filter_condition) VALUES ('p1', 'extreme')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "CHECK constraint should reject 'extreme'");
}

//! Progress & Score Ledger
//!
//! One row per (participant, condition) run in the experiment log table.
//! A run starts at `pre`, accumulates one score per phase in place, and is
//! closed by the terminal window. Writes enforce that progression; the
//! advisory reads (`previous_score`, `progress`) degrade to safe defaults
//! on any store failure because the experiment can proceed without them.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use stressline_common::db::{
    Condition, Phase, EXPERIMENT_TABLE, STATUS_COMPLETED, STATUS_IN_PROGRESS,
};

pub mod columns;

pub use columns::{live_columns, resolve_phase_columns, PhaseColumnMap};

/// Outcome of a successful score write
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReceipt {
    pub message: String,
    /// Physical column the score landed in
    pub column: String,
    pub value: i64,
}

/// Per-condition completion flags for one participant
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProgressSummary {
    pub weak: bool,
    pub mid: bool,
    pub strong: bool,
}

/// Latest row for a (participant, condition) pair
#[derive(Debug)]
struct LatestRecord {
    id: i64,
    status: Option<String>,
}

impl LatestRecord {
    fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMPLETED)
    }
}

/// Record one score.
///
/// Phase progression per (participant, condition):
/// no record --pre--> in_progress --any mid phase--> in_progress
/// --terminal window--> completed --pre--> in_progress (new row).
/// Any submission outside those transitions is rejected.
pub async fn record_score(
    db: &SqlitePool,
    participant: &str,
    condition: Condition,
    phase: Phase,
    score: i64,
) -> ApiResult<ScoreReceipt> {
    let column = resolve_phase_columns(db).await.column(phase);

    // When the live schema is known, refuse to write into a column that is
    // not there; report the score columns that do exist.
    if let Some(live) = live_columns(db).await {
        if !live.iter().any(|c| c == column) {
            let available = live
                .iter()
                .filter(|c| c.to_lowercase().contains("vas"))
                .cloned()
                .collect();
            return Err(ApiError::Schema {
                phase: phase.as_str().to_string(),
                column: column.to_string(),
                available,
            });
        }
    }

    match latest_record(db, participant, condition).await? {
        None => {
            if phase == Phase::Pre {
                insert_run(db, participant, condition, column, score).await
            } else {
                Err(ApiError::Sequence(
                    "No existing record found. Please start with pre phase.".to_string(),
                ))
            }
        }
        Some(record) if record.is_completed() => {
            if phase == Phase::Pre {
                insert_run(db, participant, condition, column, score).await
            } else {
                Err(ApiError::Sequence(
                    "Previous experiment is completed. Please start with pre phase.".to_string(),
                ))
            }
        }
        Some(record) => update_run(db, record.id, column, score, phase).await,
    }
}

/// Score recorded at the phase immediately before `current_phase`, from
/// the latest run for the pair. Advisory: any failure, unknown phase, or
/// absent value yields None.
pub async fn previous_score(
    db: &SqlitePool,
    participant: &str,
    condition: Condition,
    current_phase: &str,
) -> Option<i64> {
    let previous = Phase::from_str(current_phase)?.previous()?;
    let column = resolve_phase_columns(db).await.column(previous);

    let query = format!(
        "SELECT {column} FROM {EXPERIMENT_TABLE} \
         WHERE participant_name = ? AND filter_condition = ? \
         ORDER BY id DESC LIMIT 1"
    );
    match sqlx::query_scalar::<_, Option<i64>>(&query)
        .bind(participant)
        .bind(condition.as_str())
        .fetch_optional(db)
        .await
    {
        Ok(row) => row.flatten(),
        Err(err) => {
            warn!("previous score lookup failed: {}", err);
            None
        }
    }
}

/// Which conditions the participant has completed at least once.
/// Advisory: store failures report no completions rather than erroring.
pub async fn progress(db: &SqlitePool, participant: &str) -> ProgressSummary {
    let query = format!(
        "SELECT filter_condition FROM {EXPERIMENT_TABLE} \
         WHERE participant_name = ? AND status = ?"
    );
    let rows = sqlx::query_scalar::<_, String>(&query)
        .bind(participant)
        .bind(STATUS_COMPLETED)
        .fetch_all(db)
        .await;

    let mut summary = ProgressSummary::default();
    match rows {
        Ok(rows) => {
            for row in rows {
                match Condition::from_str(&row) {
                    Some(Condition::Weak) => summary.weak = true,
                    Some(Condition::Mid) => summary.mid = true,
                    Some(Condition::Strong) => summary.strong = true,
                    None => {}
                }
            }
        }
        Err(err) => warn!("progress lookup failed: {}", err),
    }
    summary
}

/// Mark the latest run for the pair completed, creating a completed row
/// when none exists. Idempotent for an already-completed run.
pub async fn complete(
    db: &SqlitePool,
    participant: &str,
    condition: Condition,
) -> ApiResult<String> {
    match latest_record(db, participant, condition).await? {
        Some(record) if !record.is_completed() => {
            let query = format!("UPDATE {EXPERIMENT_TABLE} SET status = ? WHERE id = ?");
            sqlx::query(&query)
                .bind(STATUS_COMPLETED)
                .bind(record.id)
                .execute(db)
                .await?;
            Ok(format!("Updated record {}", record.id))
        }
        Some(_) => Ok("Already completed".to_string()),
        None => {
            let query = format!(
                "INSERT INTO {EXPERIMENT_TABLE} (participant_name, filter_condition, status) \
                 VALUES (?, ?, ?)"
            );
            sqlx::query(&query)
                .bind(participant)
                .bind(condition.as_str())
                .bind(STATUS_COMPLETED)
                .execute(db)
                .await?;
            Ok("Created new record".to_string())
        }
    }
}

/// Most recent row for the pair, by descending id.
async fn latest_record(
    db: &SqlitePool,
    participant: &str,
    condition: Condition,
) -> ApiResult<Option<LatestRecord>> {
    let query = format!(
        "SELECT id, status FROM {EXPERIMENT_TABLE} \
         WHERE participant_name = ? AND filter_condition = ? \
         ORDER BY id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, (i64, Option<String>)>(&query)
        .bind(participant)
        .bind(condition.as_str())
        .fetch_optional(db)
        .await?;

    Ok(row.map(|(id, status)| LatestRecord { id, status }))
}

/// Open a fresh in-progress run with its first score.
async fn insert_run(
    db: &SqlitePool,
    participant: &str,
    condition: Condition,
    column: &str,
    score: i64,
) -> ApiResult<ScoreReceipt> {
    let query = format!(
        "INSERT INTO {EXPERIMENT_TABLE} (participant_name, filter_condition, {column}, status) \
         VALUES (?, ?, ?, ?)"
    );
    sqlx::query(&query)
        .bind(participant)
        .bind(condition.as_str())
        .bind(score)
        .bind(STATUS_IN_PROGRESS)
        .execute(db)
        .await?;

    Ok(ScoreReceipt {
        message: "Created new record".to_string(),
        column: column.to_string(),
        value: score,
    })
}

/// Write one score into an in-progress run; the terminal phase also closes
/// the run in the same statement.
///
/// The status predicate makes the write conditional on the run still being
/// open, so a submission racing a concurrent completion is rejected
/// instead of silently resurrecting a closed run.
async fn update_run(
    db: &SqlitePool,
    id: i64,
    column: &str,
    score: i64,
    phase: Phase,
) -> ApiResult<ScoreReceipt> {
    let query = if phase.is_terminal() {
        format!(
            "UPDATE {EXPERIMENT_TABLE} SET {column} = ?, status = '{STATUS_COMPLETED}' \
             WHERE id = ? AND (status IS NULL OR status != '{STATUS_COMPLETED}')"
        )
    } else {
        format!(
            "UPDATE {EXPERIMENT_TABLE} SET {column} = ? \
             WHERE id = ? AND (status IS NULL OR status != '{STATUS_COMPLETED}')"
        )
    };

    let result = sqlx::query(&query).bind(score).bind(id).execute(db).await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Sequence(format!(
            "Record {id} was completed concurrently. Please start with pre phase."
        )));
    }

    Ok(ScoreReceipt {
        message: format!("Updated record {id}"),
        column: column.to_string(),
        value: score,
    })
}

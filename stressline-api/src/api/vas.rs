//! VAS score recording and lookup
//!
//! The write path is the strict one: condition and phase must parse, the
//! score must be present, and the ledger enforces phase order. The
//! previous-score lookup is advisory UI context and degrades to null.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::ledger;
use crate::AppState;
use stressline_common::db::{Condition, Phase};

#[derive(Debug, Deserialize)]
pub struct VasRequest {
    pub user_id: Option<String>,
    pub condition: Option<String>,
    pub phase: Option<String>,
    /// Accepted as any JSON number; stored truncated to an integer
    pub vas_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct VasResponse {
    pub status: &'static str,
    pub message: String,
    /// Physical column the score landed in
    pub column: String,
    pub value: i64,
}

/// POST /api/vas
pub async fn save_vas(
    State(state): State<AppState>,
    Json(request): Json<VasRequest>,
) -> ApiResult<Json<VasResponse>> {
    let user_id = request
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;
    let condition = request
        .condition
        .as_deref()
        .and_then(Condition::from_str)
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;
    let phase = request
        .phase
        .as_deref()
        .and_then(Phase::from_str)
        .ok_or_else(|| ApiError::Validation("Invalid phase".to_string()))?;
    let score = request
        .vas_score
        .ok_or_else(|| ApiError::Validation("vas_score is required".to_string()))?
        as i64;

    let db = state.store()?;

    let receipt = ledger::record_score(db, &user_id, condition, phase, score).await?;
    info!(
        "recorded VAS: participant={} condition={} phase={} {}={}",
        user_id, condition, phase, receipt.column, receipt.value
    );

    Ok(Json(VasResponse {
        status: "ok",
        message: receipt.message,
        column: receipt.column,
        value: receipt.value,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PreviousQuery {
    pub user_id: Option<String>,
    pub condition: Option<String>,
    pub current_phase: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviousResponse {
    pub previous_score: Option<i64>,
}

/// GET /api/vas/previous?user_id=&condition=&current_phase=
pub async fn previous_vas(
    State(state): State<AppState>,
    Query(query): Query<PreviousQuery>,
) -> ApiResult<Json<PreviousResponse>> {
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;
    let condition = query
        .condition
        .as_deref()
        .and_then(Condition::from_str)
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;

    let previous_score = match &state.db {
        Some(db) => {
            ledger::previous_score(
                db,
                &user_id,
                condition,
                query.current_phase.as_deref().unwrap_or_default(),
            )
            .await
        }
        None => None,
    };

    Ok(Json(PreviousResponse { previous_score }))
}

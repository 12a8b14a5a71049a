//! Session completion
//!
//! Closes the latest open run for a (participant, condition) pair, used by
//! the frontend after the final checkpoint as a belt-and-braces signal.
//! Without a configured store this still answers ok; there is nothing to
//! close and the frontend flow must not stall.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ledger;
use crate::AppState;
use stressline_common::db::Condition;

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub user_id: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/complete
pub async fn complete_session(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> ApiResult<Json<CompleteResponse>> {
    let user_id = request
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;
    let condition = request
        .condition
        .as_deref()
        .and_then(Condition::from_str)
        .ok_or_else(|| ApiError::Validation("Invalid data".to_string()))?;

    let message = match &state.db {
        Some(db) => Some(ledger::complete(db, &user_id, condition).await?),
        None => None,
    };

    Ok(Json(CompleteResponse {
        status: "ok",
        message,
    }))
}

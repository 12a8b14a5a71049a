//! Participant login
//!
//! There is no authentication (participants are identified by an opaque
//! id handed out by the experimenter); login only reports which condition
//! runs the participant has already completed so the frontend can grey
//! them out.

use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ledger::{self, ProgressSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub progress: ProgressSummary,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(user_id) = request.user_id.filter(|id| !id.is_empty()) else {
        return Err(ApiError::Validation("User ID required".to_string()));
    };

    // Advisory read: no store means no completions to report
    let progress = match &state.db {
        Some(db) => ledger::progress(db, &user_id).await,
        None => ProgressSummary::default(),
    };

    Ok(Json(LoginResponse {
        status: "ok",
        progress,
    }))
}

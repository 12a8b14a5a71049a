//! Timeline serving API
//!
//! Resolves a (condition, phase) pair to cleaned timeline text. Stale or
//! unknown pairs yield an empty timeline, never an error: a participant
//! mid-session must keep scrolling even when a dataset is missing.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::content::clean_text_line;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for timeline requests
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub condition: Option<String>,
    pub phase: Option<String>,
}

/// One rendered feed entry
#[derive(Debug, Serialize)]
pub struct TimelinePost {
    pub text: String,
    /// Condition label the entry was served under ("warmup" outside the
    /// scripted windows); the frontend uses it for styling only
    pub source: String,
    /// Reserved display weight; stratification is baked into the datasets
    pub stress: i64,
}

/// Timeline response
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub success: bool,
    pub timeline: Vec<TimelinePost>,
}

/// GET /api/timeline?condition=&phase=
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<TimelineResponse>> {
    let Some(phase) = query.phase.filter(|p| !p.is_empty()) else {
        return Err(ApiError::Validation("Phase required".to_string()));
    };

    let posts = state.catalog.get_posts(query.condition.as_deref(), &phase);
    let source = query.condition.unwrap_or_else(|| "warmup".to_string());

    let timeline = posts
        .into_iter()
        .map(|post| TimelinePost {
            text: clean_text_line(Some(&post.text)),
            source: source.clone(),
            stress: 0,
        })
        .collect();

    Ok(Json(TimelineResponse {
        success: true,
        timeline,
    }))
}

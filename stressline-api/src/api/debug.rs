//! Schema inspection endpoint
//!
//! Operator-facing view of the live experiment table columns, for
//! diagnosing score-column naming drift without shell access to the store.

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::{Column, Row};

use crate::error::ApiResult;
use crate::AppState;
use stressline_common::db::EXPERIMENT_TABLE;

#[derive(Debug, Serialize)]
pub struct TableStructureResponse {
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/debug/table-structure
pub async fn table_structure(
    State(state): State<AppState>,
) -> ApiResult<Json<TableStructureResponse>> {
    let db = state.store()?;

    let query = format!("SELECT * FROM {EXPERIMENT_TABLE} LIMIT 1");
    let row = sqlx::query(&query).fetch_optional(db).await?;

    let response = match row {
        Some(row) => TableStructureResponse {
            columns: row.columns().iter().map(|c| c.name().to_string()).collect(),
            message: None,
        },
        None => TableStructureResponse {
            columns: Vec::new(),
            message: Some("No records found in table".to_string()),
        },
    };

    Ok(Json(response))
}

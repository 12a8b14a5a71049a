//! Error types for stressline-api
//!
//! One taxonomy for everything a request can fail with. Validation,
//! sequence and schema errors are user-correctable (400); a missing or
//! failing backing store is a server problem (500). Content loading never
//! produces an `ApiError`: bad datasets degrade to empty sequences at load
//! time and stay invisible to the experiment flow.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing request field (400)
    #[error("{0}")]
    Validation(String),

    /// Phase requested out of the allowed order (400)
    #[error("{0}")]
    Sequence(String),

    /// No physical column for a logical phase in the live schema (400)
    #[error("Column '{column}' not found in table")]
    Schema {
        phase: String,
        column: String,
        /// Plausible score columns discovered in the live schema
        available: Vec<String>,
    },

    /// Backing store not configured (500)
    #[error("Database not configured")]
    StoreUnavailable,

    /// Backing store query failed (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Sequence(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Schema {
                phase,
                column,
                available,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!("Column '{}' not found in table", column),
                    "phase": phase,
                    "available_columns": available,
                }),
            ),
            ApiError::StoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Database not configured",
                    "hint": "set STRESSLINE_ROOT to a writable folder and restart",
                }),
            ),
            ApiError::Database(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

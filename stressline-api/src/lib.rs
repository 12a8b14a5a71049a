//! stressline-api library - experiment content and scoring service
//!
//! Serves condition/phase-stratified timeline content and records VAS
//! scores per participant, condition and phase. Content is loaded once at
//! startup into an immutable catalog; score writes go to the experiment
//! log row store.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod content;
pub mod error;
pub mod ledger;

pub use content::ContentCatalog;
pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Experiment log store. `None` when the database could not be opened
    /// at startup; content endpoints keep working, score writes report 500.
    pub db: Option<SqlitePool>,
    /// Timeline content, read-only after startup
    pub catalog: Arc<ContentCatalog>,
    /// Startup timestamp for the health endpoint
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: Option<SqlitePool>, catalog: ContentCatalog) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            startup_time: Utc::now(),
        }
    }

    /// The store pool, or the unconfigured-store error
    pub fn store(&self) -> ApiResult<&SqlitePool> {
        self.db.as_ref().ok_or(ApiError::StoreUnavailable)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/timeline", get(api::timeline::get_timeline))
        .route("/api/login", post(api::login::login))
        .route("/api/vas", post(api::vas::save_vas))
        .route("/api/vas/previous", get(api::vas::previous_vas))
        .route("/api/complete", post(api::complete::complete_session))
        .route(
            "/api/debug/table-structure",
            get(api::debug::table_structure),
        )
        .merge(api::health::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! moviweb application library
//!
//! Exposes the application state and router for the binary and for
//! integration tests.

pub mod api;
pub mod data;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::data::DataManager;
use crate::services::OmdbClient;

/// Application state shared across handlers
///
/// Built once at startup; no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend behind the Data Manager capability
    pub data: Arc<dyn DataManager>,
    /// External metadata client; absent when no API key is configured
    pub metadata: Option<Arc<OmdbClient>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(data: Arc<dyn DataManager>, metadata: Option<Arc<OmdbClient>>) -> Self {
        Self {
            data,
            metadata,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::user_routes())
        .merge(api::movie_routes())
        .merge(api::review_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

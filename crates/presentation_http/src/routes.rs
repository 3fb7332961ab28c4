//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
///
/// Unmatched paths fall through to the static frontend directory.
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let static_dir = ServeDir::new(&state.config.storage.static_dir);

    Router::new()
        // Health
        .route("/health", get(handlers::health::health_check))
        // Batch computation
        .route("/api/calculate", post(handlers::calculate::calculate))
        .route(
            "/api/calculate/download",
            post(handlers::calculate::calculate_download),
        )
        .route("/api/progress", get(handlers::progress::progress_stream))
        // Files
        .route("/api/download/{filename}", get(handlers::download::download))
        .route("/sample", get(handlers::download::sample))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .fallback_service(static_dir)
        // Attach state
        .with_state(state)
}

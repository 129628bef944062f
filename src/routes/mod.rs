//! Route modules for the document chat server

pub mod documents;
pub mod health;
pub mod messages;
pub mod ocr;
pub mod sessions;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_upload = state.config().max_upload_bytes();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_routes = sessions::router()
        .merge(documents::router(max_upload))
        .merge(messages::router());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/sessions", session_routes)
        .nest("/api/v1/ocr", ocr::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

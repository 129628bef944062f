//! Session Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions - Create a session
//! - GET /api/v1/sessions/:id - Session state, context preview and messages
//! - DELETE /api/v1/sessions/:id - Drop a session
//! - DELETE /api/v1/sessions/:id/context - Clear the document context

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::session::SessionView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/context", delete(clear_context))
}

async fn create_session(State(state): State<AppState>) -> Result<(StatusCode, Json<SessionView>)> {
    let id = state.sessions().create().await;
    let view = state.sessions().snapshot(id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    Ok(Json(state.sessions().snapshot(id).await?))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions().remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_context(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    Ok(Json(state.sessions().clear_context(id).await?))
}

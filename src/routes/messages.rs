//! Chat Routes
//!
//! Endpoints:
//! - POST /api/v1/sessions/:id/messages - Send a message, get the bot reply

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Bot reply, or the backend error message shown in its place
    pub reply: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/messages", post(send_message))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>> {
    let reply = state
        .sessions()
        .send_message(id, &request.input, state.transport())
        .await?;

    Ok(Json(MessageResponse { reply }))
}

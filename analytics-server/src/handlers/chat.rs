//! Chat handler

use axum::{extract::State, Json};
use validator::Validate;

use crate::models::{ChatRequest, ChatResponse};
use crate::{AppError, AppResult, AppState};

/// Validate the query, then answer with the configured agent
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if req.validate().is_err() {
        return Err(AppError::SecurityViolation);
    }

    let context = &state.context;
    if !context.chat.is_augmented() {
        tracing::debug!("Using rule-based fallback agent");
    }

    let response = context
        .chat
        .respond(&req.query, context.dataset.as_deref())
        .await?;

    Ok(Json(ChatResponse { response }))
}

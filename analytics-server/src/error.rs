//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use pnode_analytics_core::ChatError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Not-ready errors
    ModelNotTrained,
    DataNotLoaded,

    // Rejected chat input (matched signature is logged, never returned)
    SecurityViolation,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::ModelNotTrained => (StatusCode::SERVICE_UNAVAILABLE, "Model not trained yet"),
            AppError::DataNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "Data not loaded"),
            AppError::SecurityViolation => (
                StatusCode::BAD_REQUEST,
                pnode_analytics_core::logic::security::VIOLATION_MESSAGE,
            ),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::DataUnavailable => AppError::DataNotLoaded,
        }
    }
}

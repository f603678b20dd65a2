//! Reward prediction handler

use axum::{extract::State, Json};

use crate::models::{MetricInput, PredictionResponse};
use crate::{AppError, AppResult, AppState};

/// Projected epoch reward for one metric tuple
pub async fn rewards(
    State(state): State<AppState>,
    Json(req): Json<MetricInput>,
) -> AppResult<Json<PredictionResponse>> {
    let reward = &state.context.reward;
    if !reward.is_trained() {
        return Err(AppError::ModelNotTrained);
    }

    let prediction = reward.predict(req.uptime_score, req.storage_used_gb, req.latency_ms);
    Ok(Json(PredictionResponse {
        projected_epoch_reward: prediction,
    }))
}

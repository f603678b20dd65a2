//! Anomaly analysis handler

use axum::{extract::State, Json};

use crate::models::{AnomalyResult, MetricInput};
use crate::{AppError, AppResult, AppState};

pub async fn anomalies(
    State(state): State<AppState>,
    Json(metrics): Json<Vec<MetricInput>>,
) -> AppResult<Json<Vec<AnomalyResult>>> {
    let detector = &state.context.anomaly;
    if !detector.is_trained() {
        return Err(AppError::ModelNotTrained);
    }

    let results = detector.analyze(&metrics);
    tracing::debug!(
        "Analyzed {} records, {} at risk",
        results.len(),
        results.iter().filter(|r| r.status == pnode_analytics_core::AnomalyStatus::Risk).count()
    );
    Ok(Json(results))
}

//! Prediction and analysis payloads

use serde::{Deserialize, Serialize};

pub use pnode_analytics_core::{AnomalyResult, MetricInput};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub projected_epoch_reward: f64,
}

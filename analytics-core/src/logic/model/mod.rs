//! Model Module - Reward Regression & Anomaly Scoring
//!
//! Two thin wrappers over in-crate estimators:
//! - `RewardPredictor` - gradient-boosted regression trees on the three
//!   metric features, target `epoch_rewards`
//! - `AnomalyDetector` - standard scaler + isolation forest with 5%
//!   contamination
//!
//! Both start untrained, are trained once at service startup and are read-only
//! afterwards. An untrained wrapper answers with a neutral value (0.0 or an
//! empty result set) instead of an error.

pub mod scaler;
pub mod boosting;
pub mod isolation;
pub mod reward;
pub mod anomaly;

#[cfg(test)]
mod tests;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::logic::dataset::FEATURE_COUNT;

pub use anomaly::AnomalyDetector;
pub use boosting::{BoostingParams, GradientBoostedRegressor};
pub use isolation::{IsolationForest, IsolationParams};
pub use reward::RewardPredictor;
pub use scaler::StandardScaler;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model is not fitted")]
    NotFitted,
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of a `train` call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingReport {
    pub status: String,
    /// In-sample fit quality, when the model defines one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl TrainingReport {
    pub fn trained(score: Option<f64>) -> Self {
        Self {
            status: "trained".to_string(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnomalyStatus {
    Healthy,
    Risk,
}

/// Per-record anomaly verdict. Negative scores are outliers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyResult {
    pub status: AnomalyStatus,
    pub anomaly_score: f64,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Stack feature rows into an `n x FEATURE_COUNT` matrix
pub fn rows_to_matrix(rows: &[[f64; FEATURE_COUNT]]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), FEATURE_COUNT), |(i, j)| rows[i][j])
}

/// Coefficient of determination. A constant target scores 1.0 only when
/// predicted exactly.
pub fn r2_score(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len() as f64;
    if truth.is_empty() {
        return 0.0;
    }
    let mean = truth.iter().sum::<f64>() / n;
    let ss_res: f64 = truth.iter().zip(predicted).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = truth.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

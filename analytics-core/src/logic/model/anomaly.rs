//! Anomaly Detector
//!
//! Standardizes (uptime, storage, latency) and scores them with an isolation
//! forest. Rows below the learned offset are reported as `Risk`.

use super::isolation::{IsolationForest, IsolationParams};
use super::scaler::StandardScaler;
use super::{rows_to_matrix, AnomalyResult, AnomalyStatus, ModelError, TrainingReport};
use crate::logic::dataset::{Dataset, MetricInput};

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    scaler: StandardScaler,
    forest: IsolationForest,
    is_trained: bool,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::with_params(IsolationParams::default())
    }

    pub fn with_params(params: IsolationParams) -> Self {
        Self {
            scaler: StandardScaler::new(),
            forest: IsolationForest::new(params),
            is_trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn train(&mut self, dataset: &Dataset) -> Result<TrainingReport, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        self.is_trained = false;
        let scaled = self.scaler.fit_transform(&dataset.feature_matrix())?;
        self.forest.fit(&scaled)?;
        self.is_trained = true;

        log::info!(
            "Anomaly detector trained on {} rows (contamination {:.2})",
            dataset.len(),
            self.forest.params().contamination
        );
        Ok(TrainingReport::trained(None))
    }

    /// One verdict per input, in input order. Empty while untrained.
    pub fn analyze(&self, metrics: &[MetricInput]) -> Vec<AnomalyResult> {
        if !self.is_trained || metrics.is_empty() {
            return Vec::new();
        }

        let rows: Vec<_> = metrics.iter().map(MetricInput::features).collect();
        let scores = self
            .scaler
            .transform(&rows_to_matrix(&rows))
            .and_then(|scaled| self.forest.decision_function(&scaled));

        match scores {
            Ok(scores) => scores
                .into_iter()
                .map(|anomaly_score| AnomalyResult {
                    status: if anomaly_score < 0.0 { AnomalyStatus::Risk } else { AnomalyStatus::Healthy },
                    anomaly_score,
                })
                .collect(),
            Err(e) => {
                log::error!("Anomaly scoring failed: {}", e);
                Vec::new()
            }
        }
    }
}

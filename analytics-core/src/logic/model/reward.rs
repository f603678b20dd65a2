//! Reward Predictor
//!
//! Regression of `epoch_rewards` on (uptime, storage, latency).

use ndarray::arr1;

use super::boosting::{BoostingParams, GradientBoostedRegressor};
use super::{r2_score, ModelError, TrainingReport};
use crate::logic::dataset::Dataset;

#[derive(Debug, Clone, Default)]
pub struct RewardPredictor {
    model: GradientBoostedRegressor,
    is_trained: bool,
}

impl RewardPredictor {
    pub fn new() -> Self {
        Self::with_params(BoostingParams::default())
    }

    pub fn with_params(params: BoostingParams) -> Self {
        Self {
            model: GradientBoostedRegressor::new(params),
            is_trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    /// Fit on the dataset and report the in-sample R² score.
    /// On error the predictor stays untrained.
    pub fn train(&mut self, dataset: &Dataset) -> Result<TrainingReport, ModelError> {
        let x = dataset.feature_matrix();
        let y = dataset.rewards().to_vec();

        self.is_trained = false;
        self.model.fit(&x, &y)?;

        let fitted = self.model.predict(&x)?;
        let score = r2_score(&y, &fitted);
        self.is_trained = true;

        log::info!(
            "Reward predictor trained on {} rows ({} trees), R2 = {:.4}",
            dataset.len(),
            self.model.n_trees(),
            score
        );
        Ok(TrainingReport::trained(Some(score)))
    }

    /// Projected epoch reward. Exactly 0.0 while untrained.
    pub fn predict(&self, uptime: f64, storage: f64, latency: f64) -> f64 {
        if !self.is_trained {
            return 0.0;
        }
        self.model.predict_row(arr1(&[uptime, storage, latency]).view())
    }
}

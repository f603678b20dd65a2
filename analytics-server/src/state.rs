//! Service context
//!
//! Built once at startup, then shared read-only with every handler through
//! `AppState`. Load or training failures leave the affected parts untrained;
//! the server still starts.

use std::sync::Arc;

use pnode_analytics_core::{AnomalyDetector, ChatAgent, Dataset, RewardPredictor};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ServiceContext>,
}

impl AppState {
    pub fn new(context: ServiceContext) -> Self {
        Self { context: Arc::new(context) }
    }
}

pub struct ServiceContext {
    pub dataset: Option<Arc<Dataset>>,
    pub reward: RewardPredictor,
    pub anomaly: AnomalyDetector,
    pub chat: ChatAgent,
}

impl ServiceContext {
    /// Load the CSV, train both models, pick the chat mode
    pub async fn initialize(config: &Config) -> Self {
        tracing::info!("Loading data from {}...", config.data_path.display());
        let dataset = match Dataset::load_csv(&config.data_path) {
            Ok(dataset) => Some(Arc::new(dataset)),
            Err(e) => {
                tracing::error!(
                    "Could not load {}: {}. Run generate-data first.",
                    config.data_path.display(),
                    e
                );
                None
            }
        };

        let (reward, anomaly) = match &dataset {
            Some(dataset) => train_models(dataset.clone()).await,
            None => (RewardPredictor::new(), AnomalyDetector::new()),
        };

        let chat = ChatAgent::from_settings(config.llm_settings(), dataset.clone());
        if chat.is_augmented() {
            tracing::info!("AI agent initialized");
        } else {
            tracing::info!("Chat running in offline mode");
        }

        Self { dataset, reward, anomaly, chat }
    }

    /// Context over an in-memory dataset, trained in the calling thread
    #[cfg(test)]
    pub fn from_dataset(dataset: Dataset, chat: ChatAgent) -> Self {
        let (reward, anomaly) = train_blocking(&dataset);
        Self {
            dataset: Some(Arc::new(dataset)),
            reward,
            anomaly,
            chat,
        }
    }

    /// Nothing loaded, nothing trained
    #[cfg(test)]
    pub fn untrained() -> Self {
        Self {
            dataset: None,
            reward: RewardPredictor::new(),
            anomaly: AnomalyDetector::new(),
            chat: ChatAgent::Fallback,
        }
    }

    pub fn models_trained(&self) -> bool {
        self.reward.is_trained()
    }
}

async fn train_models(dataset: Arc<Dataset>) -> (RewardPredictor, AnomalyDetector) {
    match tokio::task::spawn_blocking(move || train_blocking(&dataset)).await {
        Ok(models) => models,
        Err(e) => {
            tracing::error!("Training task failed: {}", e);
            (RewardPredictor::new(), AnomalyDetector::new())
        }
    }
}

fn train_blocking(dataset: &Dataset) -> (RewardPredictor, AnomalyDetector) {
    tracing::info!("Training models on {} records...", dataset.len());

    let mut reward = RewardPredictor::new();
    match reward.train(dataset) {
        Ok(report) => tracing::info!("Reward model trained (R2 {:.4})", report.score.unwrap_or_default()),
        Err(e) => tracing::error!("Reward model training failed: {}", e),
    }

    let mut anomaly = AnomalyDetector::new();
    match anomaly.train(dataset) {
        Ok(_) => tracing::info!("Anomaly model trained"),
        Err(e) => tracing::error!("Anomaly model training failed: {}", e),
    }

    (reward, anomaly)
}

//! pNode Analytics Core
//!
//! Everything the analytics backend does that is not HTTP plumbing:
//!
//! - `logic::dataset` - metric records and the CSV table they live in
//! - `logic::generator` - synthetic pNode telemetry with injected anomalies
//! - `logic::model` - reward regression and anomaly scoring
//! - `logic::security` - prompt-injection gate for chat queries
//! - `logic::chat` - LLM-backed agent or rule-based fallback

pub mod constants;
pub mod logic;

pub use logic::chat::{ChatAgent, ChatError, LlmSettings};
pub use logic::dataset::{Dataset, DataError, MetricInput, MetricRecord};
pub use logic::model::{AnomalyDetector, AnomalyResult, AnomalyStatus, ModelError, RewardPredictor, TrainingReport};
pub use logic::security::{validate_input, SecurityViolation};

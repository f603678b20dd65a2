//! Logic Module - Data, Models & Agents
//!
//! ## Layout
//! - `dataset/` - metric records, CSV reader/writer, aggregate queries
//! - `generator` - synthetic telemetry
//! - `model/` - gradient boosting, isolation forest, scaler, wrappers
//! - `security` - injection signature gate
//! - `chat/` - chat agent (LLM client, dataset tools, offline fallback)

pub mod dataset;
pub mod generator;
pub mod model;
pub mod security;
pub mod chat;

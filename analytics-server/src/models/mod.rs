//! Request and response models

pub mod chat;
pub mod metrics;

pub use chat::*;
pub use metrics::*;

//! HTTP handlers

pub mod analyze;
pub mod chat;
pub mod health;
pub mod predict;

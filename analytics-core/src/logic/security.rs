//! Chat Input Gate
//!
//! Heuristic prompt-injection filter for chat queries. A query matching any
//! signature (case-insensitive) is rejected before it reaches an agent.
//! Binary decision only: no scoring, no learning.

use once_cell::sync::Lazy;
use regex::{RegexSet, RegexSetBuilder};

// Instruction-override and SQL-injection phrases
pub const INJECTION_PATTERNS: &[&str] = &[
    r"ignore previous instructions",
    r"system prompt",
    r"delete everything",
    r"drop table",
    r"update user set role",
    r"forget your instructions",
];

/// Message returned to callers. Never includes the matched signature.
pub const VIOLATION_MESSAGE: &str = "Potential security violation detected.";

static INJECTION_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSetBuilder::new(INJECTION_PATTERNS)
        .case_insensitive(true)
        .build()
        .expect("injection patterns are valid regexes")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", VIOLATION_MESSAGE)]
pub struct SecurityViolation {
    /// Signature that matched (for logs only)
    pub pattern: &'static str,
}

/// Reject queries that match an injection signature.
/// The first signature in list order wins.
pub fn validate_input(query: &str) -> Result<(), SecurityViolation> {
    match INJECTION_SET.matches(query).iter().next() {
        Some(index) => {
            let pattern = INJECTION_PATTERNS[index];
            log::warn!("Security alert: heuristic match for '{}'", pattern);
            Err(SecurityViolation { pattern })
        }
        None => Ok(()),
    }
}

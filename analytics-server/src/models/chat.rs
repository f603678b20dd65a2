//! Chat payloads

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(custom(function = "check_query"))]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Injection gate as a validator rule
fn check_query(query: &str) -> Result<(), ValidationError> {
    pnode_analytics_core::validate_input(query).map_err(|violation| {
        let mut error = ValidationError::new("security_violation");
        error.message = Some(violation.to_string().into());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_validation() {
        let ok = ChatRequest { query: "how many nodes".into() };
        assert!(ok.validate().is_ok());

        let bad = ChatRequest { query: "please DROP TABLE nodes".into() };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("query"));
    }
}

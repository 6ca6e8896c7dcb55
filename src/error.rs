use thiserror::Error;

use crate::constants::ERR_NO_TOKEN;

/// Every failure a data-access call or a form submission can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", ERR_NO_TOKEN)]
    MissingToken,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    UnexpectedShape(String),
    #[cfg(feature = "client")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ApiError {
    /// The text shown inline next to the control that triggered the call.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Pulls the `message` field out of an error body, or uses the fallback
/// for the operation when the body has none.
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.trim().to_string())
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins_over_fallback() {
        let msg = extract_error_message(r#"{"message":"locked"}"#, "Failed to delete category");
        assert_eq!(msg, "locked");
    }

    #[test]
    fn fallback_used_for_plain_text_or_empty_message() {
        assert_eq!(extract_error_message("Internal Server Error", "fallback"), "fallback");
        assert_eq!(extract_error_message(r#"{"message":"  "}"#, "fallback"), "fallback");
        assert_eq!(extract_error_message(r#"{"error":"x"}"#, "fallback"), "fallback");
    }

    #[test]
    fn missing_token_message() {
        assert_eq!(ApiError::MissingToken.user_message(), ERR_NO_TOKEN);
    }
}

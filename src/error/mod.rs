//! Error types for colloquy.

use thiserror::Error;

/// HTTP statuses the backend connector treats as transient.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Primary error type for all colloquy operations.
#[derive(Error, Debug)]
pub enum ColloquyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend answered 2xx with a body that is not a chat completion.
    #[error("Invalid completion response: {message}")]
    ResponseValidation { message: String, body: String },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Tool registered twice: {0}")]
    DuplicateTool(String),

    #[error("Schema error: {0}")]
    Schema(String),

    /// The final answer did not match the declared output shape.
    #[error("Structured output did not validate: {message}")]
    StructuredOutput { message: String, raw: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transcription error: {0}")]
    Transcription(String),
}

impl ColloquyError {
    /// Create an API error from a status and the backend's message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a response validation error, keeping the raw body for logs.
    pub fn response_validation(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::ResponseValidation {
            message: message.into(),
            body: body.into(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend connector may retry after this error.
    ///
    /// Only transient statuses and malformed completion bodies qualify.
    /// Timeouts and connection failures are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => RETRYABLE_STATUSES.contains(status),
            Self::ResponseValidation { .. } => true,
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ColloquyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_are_retryable() {
        for status in RETRYABLE_STATUSES {
            assert!(ColloquyError::api(status, "busy").is_retryable(), "{status}");
        }
    }

    #[test]
    fn client_errors_are_terminal() {
        assert!(!ColloquyError::api(400, "bad request").is_retryable());
        assert!(!ColloquyError::api(401, "nope").is_retryable());
        assert!(!ColloquyError::api(501, "not implemented").is_retryable());
    }

    #[test]
    fn validation_failures_are_retryable_but_tool_lookup_is_not() {
        assert!(ColloquyError::response_validation("missing choices", "{}").is_retryable());
        assert!(!ColloquyError::ToolNotFound("ghost".into()).is_retryable());
        assert!(!ColloquyError::StructuredOutput {
            message: "missing field".into(),
            raw: "{}".into(),
        }
        .is_retryable());
    }

    #[test]
    fn api_display_shows_backend_message() {
        let err = ColloquyError::api(503, "overloaded");
        assert_eq!(err.to_string(), "API error (status 503): overloaded");
        assert_eq!(err.status(), Some(503));
    }
}

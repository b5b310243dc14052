//! Error types for the chat service.

use thiserror::Error;

/// Errors that can occur while handling a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Request body could not be parsed.
    #[error("invalid request format: {0}")]
    InvalidRequest(String),

    /// Request parsed but failed field validation.
    #[error("{0}")]
    Validation(String),

    /// Thread disappeared between lookup and use (eviction race).
    #[error("thread {0} not found")]
    ThreadNotFound(String),

    /// HTTP transport failure talking to the completion API.
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Completion API returned a non-success status.
    #[error("completion API returned status {status}: {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body, passed through verbatim.
        message: String,
    },

    /// Completion API returned an empty choice list.
    #[error("no response choices returned")]
    EmptyCompletion,

    /// The configured request timeout elapsed before the completion returned.
    #[error("chat request timed out")]
    Timeout,

    /// Configuration error at startup.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Wire-level error code used in the response envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Validation(_) => "validation_error",
            Self::ThreadNotFound(_)
            | Self::Http(_)
            | Self::Api { .. }
            | Self::EmptyCompletion
            | Self::Timeout
            | Self::Config(_) => "processing_error",
        }
    }

    /// Whether the error is a client fault (maps to HTTP 400).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ChatError::InvalidRequest(String::new()).code(), "invalid_request");
        assert_eq!(ChatError::Validation(String::new()).code(), "validation_error");
        assert_eq!(ChatError::EmptyCompletion.code(), "processing_error");
        assert_eq!(ChatError::Timeout.code(), "processing_error");
        assert_eq!(
            ChatError::ThreadNotFound("t1".to_string()).code(),
            "processing_error"
        );
    }

    #[test]
    fn test_client_errors_map_to_400() {
        assert!(ChatError::Validation("sessionId is required".to_string()).is_client_error());
        assert!(ChatError::InvalidRequest("bad json".to_string()).is_client_error());
        assert!(!ChatError::EmptyCompletion.is_client_error());
    }
}

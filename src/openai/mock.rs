//! Mock completion client for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::models::ChatMessage;

use super::CompletionClient;

/// Canned reply returned by the default mock.
pub const DEFAULT_MOCK_REPLY: &str = "This is a mock response from the OpenAI API.";

/// Test double for [`CompletionClient`].
///
/// Returns a canned reply, optionally fails or delays, and records the message
/// history of every call for assertions.
pub struct MockCompletionClient {
    reply: String,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    /// Create a mock that answers every call with [`DEFAULT_MOCK_REPLY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            reply: DEFAULT_MOCK_REPLY.to_string(),
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the canned reply.
    #[must_use]
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    /// Make every call fail with an upstream error carrying `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Sleep for `delay` before answering, to exercise timeout handling.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Message histories submitted so far, in call order.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of completions submitted so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn submit_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ChatError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(ChatError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_reply() {
        let mock = MockCompletionClient::new();
        let reply = mock
            .submit_completion("gpt-4o", &[ChatMessage::user("Hello")])
            .await
            .unwrap_or_default();
        assert_eq!(reply, DEFAULT_MOCK_REPLY);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockCompletionClient::new().failing("rate limited");
        let result = mock.submit_completion("gpt-4o", &[]).await;
        assert!(matches!(result, Err(ChatError::Api { status: 500, .. })));
    }
}

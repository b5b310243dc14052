//! Upstream completion API client.
//!
//! The orchestrator only depends on the [`CompletionClient`] capability:
//! submit an ordered message history, get one completion back. Production
//! traffic goes through [`OpenAiClient`]; tests use [`MockCompletionClient`].

pub mod client;
pub mod mock;

pub use client::OpenAiClient;
pub use mock::{DEFAULT_MOCK_REPLY, MockCompletionClient};

use async_trait::async_trait;

use crate::error::ChatError;
use crate::models::ChatMessage;

/// Capability to turn an ordered message history into a single completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit the full message history and return the completion text.
    ///
    /// # Errors
    /// Returns `ChatError::Http` on transport failure, `ChatError::Api` on a
    /// non-success upstream status, and `ChatError::EmptyCompletion` when the
    /// API returns no choices.
    async fn submit_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ChatError>;
}

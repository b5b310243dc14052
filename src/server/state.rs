//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::Config;
use crate::error::ChatError;
use crate::openai::{CompletionClient, OpenAiClient};

/// Shared application state.
pub struct AppState {
    /// Conversation orchestrator owning the thread store.
    pub chat: ChatService,
    /// Service configuration.
    pub config: Config,
}

impl AppState {
    /// Create state backed by the production OpenAI client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Arc<Self>, ChatError> {
        let client = OpenAiClient::new(config.api_key.clone())?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create state with a caller-supplied completion client (test doubles,
    /// alternative gateways).
    #[must_use]
    pub fn with_client(config: Config, client: Arc<dyn CompletionClient>) -> Arc<Self> {
        Arc::new(Self {
            chat: ChatService::new(client),
            config,
        })
    }
}

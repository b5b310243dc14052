//! Conversation orchestrator.
//!
//! Runs one chat turn: look up the thread, append the user message, submit the
//! full ordered history upstream, append the reply. The upstream API is
//! stateless; the local thread store is the only memory the system has, so the
//! whole history is resubmitted every turn.

use std::sync::Arc;

use crate::error::ChatError;
use crate::openai::CompletionClient;
use crate::threads::ThreadStore;

/// Result of a successful chat turn.
#[derive(Clone, Debug)]
pub struct ChatTurn {
    /// The assistant's reply text.
    pub reply: String,
    /// Thread that served the turn; doubles as the conversation id.
    pub thread_id: String,
}

/// Orchestrates chat turns against a thread store and a completion client.
pub struct ChatService {
    store: ThreadStore,
    client: Arc<dyn CompletionClient>,
}

impl ChatService {
    /// Create a service with an empty thread store.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            store: ThreadStore::new(),
            client,
        }
    }

    /// The underlying thread store, for eviction scheduling and inspection.
    #[must_use]
    pub const fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Run one conversation turn for a session.
    ///
    /// On success the user message and the assistant reply are both appended to
    /// the thread. On failure the error is propagated verbatim and the thread
    /// is not mutated further (the user message stays; no partial reply is
    /// ever stored).
    ///
    /// # Errors
    /// Returns `ChatError::ThreadNotFound` if the thread vanished mid-turn, or
    /// any error from the completion client.
    pub async fn run_turn(
        &self,
        session_id: &str,
        agent_id: &str,
        user_id: &str,
        message: &str,
        model: &str,
    ) -> Result<ChatTurn, ChatError> {
        let thread = self.store.get_or_create(session_id, agent_id, user_id);
        self.store.append_user_message(&thread.thread_id, message)?;

        // Snapshot taken under the map guard; the upstream call runs outside it.
        // This is also where a truncation policy would plug in.
        let history = self.store.messages(&thread.thread_id)?;

        let reply = self.client.submit_completion(model, &history).await?;

        self.store.append_assistant_message(&thread.thread_id, &reply);
        Ok(ChatTurn {
            reply,
            thread_id: thread.thread_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::openai::{DEFAULT_MOCK_REPLY, MockCompletionClient};

    fn service_with(mock: Arc<MockCompletionClient>) -> ChatService {
        ChatService::new(mock)
    }

    #[tokio::test]
    async fn test_turn_appends_user_and_assistant() {
        let mock = Arc::new(MockCompletionClient::new());
        let service = service_with(Arc::clone(&mock));

        let turn = service
            .run_turn("s1", "a1", "u1", "Hello", "gpt-4o")
            .await
            .map(|t| (t.reply, t.thread_id))
            .unwrap_or_default();
        assert_eq!(turn.0, DEFAULT_MOCK_REPLY);
        assert_eq!(turn.1, "s1");

        let messages = service.store().messages("s1").unwrap_or_default();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, DEFAULT_MOCK_REPLY);
    }

    #[tokio::test]
    async fn test_full_history_resubmitted_each_turn() {
        let mock = Arc::new(MockCompletionClient::new());
        let service = service_with(Arc::clone(&mock));

        let first = service.run_turn("s1", "a1", "u1", "one", "gpt-4o").await;
        assert!(first.is_ok());
        let second = service.run_turn("s1", "a1", "u1", "two", "gpt-4o").await;
        assert!(second.is_ok());

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 2);
        // Turn 1 submits the lone user message; turn 2 submits the prior turn
        // plus the new user message.
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[1].len(), 3);
        assert_eq!(calls[1][2].content, "two");
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_no_assistant_message() {
        let mock = Arc::new(MockCompletionClient::new().failing("upstream exploded"));
        let service = service_with(Arc::clone(&mock));

        let result = service.run_turn("s1", "a1", "u1", "Hello", "gpt-4o").await;
        assert!(matches!(result, Err(ChatError::Api { .. })));

        let messages = service.store().messages("s1").unwrap_or_default();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let mock = Arc::new(MockCompletionClient::new());
        let service = service_with(Arc::clone(&mock));

        let a = service.run_turn("s1", "a1", "u1", "hi", "gpt-4o").await;
        let b = service.run_turn("s2", "a1", "u2", "yo", "gpt-4o").await;
        assert!(a.is_ok() && b.is_ok());

        assert_eq!(service.store().len(), 2);
        assert_eq!(service.store().messages("s1").unwrap_or_default().len(), 2);
        assert_eq!(service.store().messages("s2").unwrap_or_default().len(), 2);
    }
}

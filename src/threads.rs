//! In-memory thread store with TTL eviction.
//!
//! One thread per session id; the session id doubles as the thread id. Threads
//! live only for the process lifetime and are dropped after sitting idle longer
//! than the configured TTL.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::ChatError;
use crate::models::ChatMessage;

/// A cached conversation thread.
#[derive(Clone, Debug)]
pub struct ThreadInfo {
    /// Thread id; equals the session id by construction.
    pub thread_id: String,
    /// Session the thread belongs to.
    pub session_id: String,
    /// Agent the thread belongs to.
    pub agent_id: String,
    /// User the thread belongs to.
    pub user_id: String,
    /// Ordered message history, append-only.
    pub messages: Vec<ChatMessage>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last touch (lookup or mutation); drives eviction.
    last_used: Instant,
}

impl ThreadInfo {
    fn new(session_id: &str, agent_id: &str, user_id: &str) -> Self {
        Self {
            thread_id: session_id.to_string(),
            session_id: session_id.to_string(),
            agent_id: agent_id.to_string(),
            user_id: user_id.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
            last_used: Instant::now(),
        }
    }
}

/// Thread-safe store mapping session ids to conversation threads.
///
/// All mutation and iteration goes through the concurrent map; guards are held
/// only for the duration of a single operation and never across an await.
#[derive(Default)]
pub struct ThreadStore {
    threads: DashMap<String, ThreadInfo>,
}

impl ThreadStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the thread for a session, creating it on a miss.
    ///
    /// Updates `last_used` on every call and returns a snapshot of the thread.
    pub fn get_or_create(&self, session_id: &str, agent_id: &str, user_id: &str) -> ThreadInfo {
        let mut entry = self
            .threads
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!("Creating new thread for session {session_id}");
                ThreadInfo::new(session_id, agent_id, user_id)
            });
        entry.last_used = Instant::now();
        entry.clone()
    }

    /// Append a user message to an existing thread.
    ///
    /// # Errors
    /// Returns `ChatError::ThreadNotFound` if the thread is absent.
    pub fn append_user_message(&self, thread_id: &str, content: &str) -> Result<(), ChatError> {
        let Some(mut thread) = self.threads.get_mut(thread_id) else {
            return Err(ChatError::ThreadNotFound(thread_id.to_string()));
        };
        thread.messages.push(ChatMessage::user(content));
        thread.last_used = Instant::now();
        Ok(())
    }

    /// Append an assistant message to a thread.
    ///
    /// Silently no-ops if the thread was evicted while the completion call was
    /// in flight; the reply is still returned to the caller.
    pub fn append_assistant_message(&self, thread_id: &str, content: &str) {
        if let Some(mut thread) = self.threads.get_mut(thread_id) {
            thread.messages.push(ChatMessage::assistant(content));
            thread.last_used = Instant::now();
        }
    }

    /// Snapshot the ordered message history of a thread.
    ///
    /// # Errors
    /// Returns `ChatError::ThreadNotFound` if the thread is absent.
    pub fn messages(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        self.threads
            .get(thread_id)
            .map(|thread| thread.messages.clone())
            .ok_or_else(|| ChatError::ThreadNotFound(thread_id.to_string()))
    }

    /// Remove every thread idle longer than `ttl`.
    ///
    /// Each removed session is logged. Callable from any task; this binary
    /// schedules it on a fixed interval.
    pub fn evict_expired(&self, ttl: Duration) {
        self.threads.retain(|session_id, thread| {
            if thread.last_used.elapsed() > ttl {
                tracing::info!(
                    "Removing thread {} from cache due to TTL expiration (session {session_id})",
                    thread.thread_id
                );
                false
            } else {
                true
            }
        });
    }

    /// Number of cached threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Pretend a thread was last touched `age` ago.
    #[cfg(test)]
    fn backdate(&self, thread_id: &str, age: Duration) {
        if let Some(mut thread) = self.threads.get_mut(thread_id) {
            thread.last_used = Instant::now() - age;
        }
    }
}

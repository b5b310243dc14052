//! Request and response envelopes shared by all chat endpoints.
//!
//! The schemas mirror the platform-wide contract: camelCase JSON, every inbound
//! field defaulted so that missing values surface as validation errors rather
//! than parse errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// The single AI provider this service accepts.
pub const SUPPORTED_PROVIDER: &str = "chatgpt";

/// Role of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message authored by the end user.
    User,
    /// Message authored by the model.
    Assistant,
}

/// A single role-tagged message, both cached locally and sent upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Standardized input schema for chat requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    /// Organization the request belongs to.
    pub organization_id: String,
    /// Agent the request is addressed to.
    pub agent_id: String,
    /// End user issuing the request.
    pub user_id: String,
    /// The new user message for this turn.
    pub message: String,
    /// Conversation key; doubles as the thread id.
    pub session_id: String,
    /// Auxiliary context supplied by the platform.
    pub context: RequestContext,
    /// Request metadata.
    pub metadata: RequestMetadata,
}

impl ChatRequest {
    /// Validate required fields, short-circuiting on the first violation.
    ///
    /// Check order: organization id, agent id, user id, message, session id,
    /// provider tag.
    ///
    /// # Errors
    /// Returns `ChatError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.organization_id.is_empty() {
            return Err(ChatError::Validation("organizationId is required".to_string()));
        }
        if self.agent_id.is_empty() {
            return Err(ChatError::Validation("agentId is required".to_string()));
        }
        if self.user_id.is_empty() {
            return Err(ChatError::Validation("userId is required".to_string()));
        }
        if self.message.is_empty() {
            return Err(ChatError::Validation("message is required".to_string()));
        }
        if self.session_id.is_empty() {
            return Err(ChatError::Validation("sessionId is required".to_string()));
        }
        if self.context.agent_config.ai_provider != SUPPORTED_PROVIDER {
            return Err(ChatError::Validation(format!(
                "aiProvider must be '{SUPPORTED_PROVIDER}'"
            )));
        }
        Ok(())
    }
}

/// Auxiliary context for a chat request.
///
/// Accepted by the schema; the current orchestration does not forward it
/// upstream (platform contract keeps the fields reserved).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    /// File attachments.
    pub files: Vec<FileAttachment>,
    /// Prior chat history supplied by the caller.
    pub chat_history: Vec<ChatEntry>,
    /// Per-agent configuration.
    pub agent_config: AgentConfig,
}

/// A file passed along with the request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileAttachment {
    /// File name.
    pub filename: String,
    /// File content.
    pub content: String,
    /// Last modification time, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// A single entry of caller-supplied chat history.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatEntry {
    /// `"user"` or `"assistant"`.
    pub role: String,
    /// Entry text.
    pub content: String,
    /// When the entry was produced, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Per-agent configuration carried in the request context.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Agent display name.
    pub name: String,
    /// Agent description.
    pub description: String,
    /// System instructions for the agent.
    pub instructions: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Provider tag; must equal [`SUPPORTED_PROVIDER`] for this service.
    pub ai_provider: String,
}

/// Metadata attached to a chat request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestMetadata {
    /// Caller-supplied correlation id, echoed back in the response.
    pub request_id: String,
    /// Request creation time, if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Caller user agent.
    pub user_agent: String,
}

/// Response status tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Request fully succeeded.
    Success,
    /// Request failed; `error` is populated.
    Error,
}

/// Standardized output schema for chat responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The completion text (empty on error).
    pub response: String,
    /// Session id echoed from the request.
    pub session_id: String,
    /// Conversation id; equals the thread id.
    pub conversation_id: String,
    /// Outcome tag.
    pub status: ResponseStatus,
    /// Response metadata.
    pub metadata: ResponseMetadata,
    /// Error information, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    /// Additional context, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
}

impl ChatResponse {
    /// Build an error envelope for the given session.
    #[must_use]
    pub fn error(session_id: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            response: String::new(),
            session_id: session_id.into(),
            conversation_id: String::new(),
            status: ResponseStatus::Error,
            metadata: ResponseMetadata::default(),
            error: Some(error),
            context: None,
        }
    }
}

/// Metadata attached to a chat response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseMetadata {
    /// Model that produced the completion.
    pub model: String,
    /// Token usage; not tracked by this service, always 0.
    pub tokens_used: u32,
    /// Wall-clock handling time in seconds.
    pub processing_time: f64,
    /// Provider tag, always [`SUPPORTED_PROVIDER`].
    pub provider: String,
    /// Cost; not tracked by this service, always 0.
    pub cost: f64,
    /// Correlation id echoed from the request.
    pub request_id: String,
}

/// Error information in a response envelope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorInfo {
    /// Taxonomy code: `invalid_request`, `validation_error` or `processing_error`.
    pub code: String,
    /// Human-readable summary.
    pub message: String,
    /// Underlying error text, passed through verbatim.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ErrorInfo {
    /// Create error info with the given code, summary and details.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: details.into(),
        }
    }
}

/// Additional context in a response envelope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseContext {
    /// Thread backing the conversation.
    pub thread_id: String,
    /// Assistant id; unused in this implementation.
    pub assistant_id: String,
    /// Suggested follow-up actions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(request: &ChatRequest) -> String {
        request
            .validate()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default()
    }

    fn valid_request() -> ChatRequest {
        ChatRequest {
            organization_id: "org123".to_string(),
            agent_id: "agent123".to_string(),
            user_id: "user123".to_string(),
            message: "Hello".to_string(),
            session_id: "session123".to_string(),
            context: RequestContext {
                agent_config: AgentConfig {
                    ai_provider: SUPPORTED_PROVIDER.to_string(),
                    ..AgentConfig::default()
                },
                ..RequestContext::default()
            },
            metadata: RequestMetadata::default(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_validation_order() {
        let cases: &[(fn(&mut ChatRequest), &str)] = &[
            (|r| r.organization_id.clear(), "organizationId is required"),
            (|r| r.agent_id.clear(), "agentId is required"),
            (|r| r.user_id.clear(), "userId is required"),
            (|r| r.message.clear(), "message is required"),
            (|r| r.session_id.clear(), "sessionId is required"),
        ];

        for (mutate, expected) in cases {
            let mut request = valid_request();
            mutate(&mut request);
            assert_eq!(validation_message(&request), *expected);
        }
    }

    #[test]
    fn test_first_violation_wins() {
        let mut request = valid_request();
        request.organization_id.clear();
        request.session_id.clear();
        assert_eq!(validation_message(&request), "organizationId is required");
    }

    #[test]
    fn test_wrong_provider_rejected() {
        let mut request = valid_request();
        request.context.agent_config.ai_provider = "claude".to_string();
        let code = request.validate().err().map(|e| e.code()).unwrap_or_default();
        assert_eq!(validation_message(&request), "aiProvider must be 'chatgpt'");
        assert_eq!(code, "validation_error");
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"Hi"}"#).unwrap_or_default();
        assert_eq!(request.message, "Hi");
        assert!(request.session_id.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_camel_case_parse() {
        let body = r#"{
            "organizationId": "org1",
            "agentId": "a1",
            "userId": "u1",
            "message": "Hello",
            "sessionId": "s1",
            "context": {"agentConfig": {"aiProvider": "chatgpt", "temperature": 0.7}},
            "metadata": {"requestId": "req-42"}
        }"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap_or_default();
        assert_eq!(request.session_id, "s1");
        assert_eq!(request.context.agent_config.ai_provider, "chatgpt");
        assert_eq!(request.metadata.request_id, "req-42");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_message_role_wire_format() {
        let message = ChatMessage::user("hi");
        let json = serde_json::to_string(&message).unwrap_or_default();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}

//! Production OpenAI chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::models::ChatMessage;

use super::CompletionClient;

/// Default OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection timeout for the upstream API.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenAI client submitting chat completions over HTTPS.
///
/// No overall request timeout is set here; the caller bounds each call with
/// its own cancellation context.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for the public OpenAI API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ChatError> {
        let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (proxies, self-hosted gateways, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn submit_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let request = CompletionRequest { model, messages };
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_completion_request_wire_format() {
        let messages = vec![ChatMessage::user("Hello")];
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: &messages,
        };
        let json = serde_json::to_string(&request).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"model":"gpt-4o","messages":[{"role":"user","content":"Hello"}]}"#
        );
    }

    #[test]
    fn test_completion_response_parse() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}}]
        }"#;
        let parsed: CompletionResponse =
            serde_json::from_str(body).unwrap_or(CompletionResponse { choices: vec![] });
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.role, Role::Assistant);
        assert_eq!(parsed.choices[0].message.content, "Hi");
    }

    #[test]
    fn test_empty_choices_parse() {
        let sentinel = CompletionResponse {
            choices: vec![Choice {
                message: ChatMessage::user("x"),
            }],
        };
        let parsed: CompletionResponse = serde_json::from_str("{}").unwrap_or(sentinel);
        assert!(parsed.choices.is_empty());
    }
}

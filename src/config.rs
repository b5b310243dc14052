//! Environment-derived service configuration.

use std::time::Duration;

use crate::error::ChatError;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default thread TTL in minutes.
const DEFAULT_THREAD_TTL_MINUTES: u64 = 60;
/// Default completion model.
const DEFAULT_MODEL: &str = "gpt-4o";
/// Default maximum retries for completion calls.
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay between retries in seconds.
const DEFAULT_RETRY_DELAY_SECONDS: u64 = 1;
/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// OpenAI API key. Required at startup.
    pub api_key: String,
    /// HTTP listening port.
    pub port: u16,
    /// Idle duration after which a thread is evicted.
    pub thread_ttl: Duration,
    /// Model submitted with every completion.
    pub default_model: String,
    /// Maximum retries for failed completion calls. Reserved; the orchestrator
    /// does not retry.
    pub max_retries: u32,
    /// Delay between retries. Reserved alongside `max_retries`.
    pub retry_delay: Duration,
    /// Timeout applied to each inbound chat request.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            port: DEFAULT_PORT,
            thread_ttl: Duration::from_secs(DEFAULT_THREAD_TTL_MINUTES * 60),
            default_model: DEFAULT_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required. `PORT`, `THREAD_TTL` (minutes),
    /// `DEFAULT_MODEL`, `MAX_RETRIES`, `RETRY_DELAY` (seconds) and
    /// `REQUEST_TIMEOUT` (seconds) are optional; unparseable values fall back
    /// to their defaults.
    ///
    /// # Errors
    /// Returns `ChatError::Config` if the API key is absent.
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ChatError::Config("OPENAI_API_KEY environment variable is required".to_string())
            })?;

        let defaults = Self::default();
        Ok(Self {
            api_key,
            port: env_parse("PORT", defaults.port),
            thread_ttl: Duration::from_secs(
                env_parse("THREAD_TTL", DEFAULT_THREAD_TTL_MINUTES) * 60,
            ),
            default_model: std::env::var("DEFAULT_MODEL")
                .ok()
                .filter(|model| !model.is_empty())
                .unwrap_or(defaults.default_model),
            max_retries: env_parse("MAX_RETRIES", defaults.max_retries),
            retry_delay: Duration::from_secs(env_parse(
                "RETRY_DELAY",
                DEFAULT_RETRY_DELAY_SECONDS,
            )),
            request_timeout: Duration::from_secs(env_parse(
                "REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            )),
        })
    }
}

/// Parse an env var, falling back to `default` when absent or unparseable.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.thread_ttl, Duration::from_secs(60 * 60));
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_env_parse_fallback() {
        assert_eq!(env_parse("CHATGPT_SERVICE_UNSET_VAR", 42_u64), 42);
    }
}

/// Chat completion HTTP client implementation.
///
/// This module provides `ChatClient` for making synchronous requests to an
/// OpenAI-compatible `/chat/completions` endpoint, along with error types and a
/// builder for configuration.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::types::{ApiErrorBody, ChatCompletionResponse, ChatRequest};

/// Default completion endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when calling the completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status, with the API's error message when it sent one
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Well-formed response without usable content
    #[error("API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was supplied
    #[error("API key is not configured")]
    MissingApiKey,
}

impl LlmError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Builder for constructing `ChatClient` instances.
///
/// # Examples
///
/// ```
/// use webrag::llm::ChatClientBuilder;
///
/// let client = ChatClientBuilder::new()
///     .api_key("sk-test")
///     .base_url("https://api.deepseek.com/v1")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct ChatClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl ChatClientBuilder {
    /// Creates a new `ChatClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer token sent with every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL of the API (e.g., "https://api.deepseek.com/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `ChatClient` with the configured settings.
    ///
    /// The environment is never consulted; callers resolve configuration
    /// beforehand (see [`ApiConfig`](crate::config::ApiConfig)).
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingApiKey` if no non-empty key was set and
    /// `LlmError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<ChatClient, LlmError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Requests may narrow this with their own timeout.
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(LlmError::Network)?;

        Ok(ChatClient {
            client,
            api_key,
            base_url,
        })
    }
}

/// Synchronous client for an OpenAI-compatible chat completion API.
///
/// Every call is attempted exactly once.
pub struct ChatClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

/// Trait for chat completion operations.
///
/// This trait enables mocking in unit tests and lets the answer generator and
/// evaluator stay independent of the HTTP layer.
pub trait ChatClientTrait: Send + Sync {
    /// Sends a completion request and returns the generated text.
    fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

impl ChatClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn complete_internal(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "sending chat completion");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(LlmError::from_transport)?;
        let status = response.status();
        let body = response.text().map_err(LlmError::from_transport)?;

        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(LlmError::Serialization)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Api {
                message: "Response contained no completion content".to_string(),
            })
    }
}

impl ChatClientTrait for ChatClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.complete_internal(request)
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, falling back to a
/// truncated copy of the raw body.
fn api_error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;
    use std::error::Error;

    #[test]
    fn network_error_variant_creation_and_display() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("not-a-valid-url").build().unwrap_err();
        let llm_error = LlmError::Network(reqwest_error);

        let error_msg = format!("{}", llm_error);
        assert!(error_msg.contains("Network error"));
    }

    #[test]
    fn timeout_error_variant_display() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("http://").build().unwrap_err();
        let llm_error = LlmError::Timeout(reqwest_error);

        assert_eq!(format!("{}", llm_error), "Request timed out");
    }

    #[test]
    fn http_error_variant_includes_status_and_message() {
        let llm_error = LlmError::Http {
            status: 401,
            message: "Authentication Fails".to_string(),
        };

        let error_msg = format!("{}", llm_error);
        assert!(error_msg.contains("401"));
        assert!(error_msg.contains("Authentication Fails"));
    }

    #[test]
    fn serialization_error_variant_wraps_serde_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let llm_error = LlmError::Serialization(json_error);

        assert!(format!("{}", llm_error).contains("Serialization error"));
        assert!(llm_error.source().is_some());
    }

    #[test]
    fn build_requires_api_key() {
        let result = ChatClientBuilder::new().build();
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn build_treats_blank_api_key_as_missing() {
        let result = ChatClientBuilder::new().api_key("   ").build();
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn build_uses_default_base_url() {
        let client = ChatClientBuilder::new().api_key("sk-test").build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn build_strips_trailing_slash() {
        let client = ChatClientBuilder::new()
            .api_key("sk-test")
            .base_url("http://localhost:8080/v1/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn build_returns_error_if_invalid_url_provided() {
        let result = ChatClientBuilder::new()
            .api_key("sk-test")
            .base_url("not-a-valid-url")
            .build();
        assert!(matches!(result, Err(LlmError::InvalidUrl(_))));
    }

    #[test]
    fn api_error_message_prefers_structured_body() {
        let body = r#"{"error":{"message":"Model Not Exist","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Model Not Exist");
    }

    #[test]
    fn api_error_message_truncates_raw_body() {
        let body = "x".repeat(500);
        assert_eq!(api_error_message(&body).len(), ERROR_BODY_LIMIT);
        assert_eq!(api_error_message("  "), "empty response body");
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let client = ChatClientBuilder::new()
            .api_key("sk-test")
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let request = ChatRequest::new("m", vec![ChatMessage::user("hi")])
            .timeout(Duration::from_secs(2));
        let result = client.complete(&request);

        assert!(matches!(
            result,
            Err(LlmError::Network(_)) | Err(LlmError::Timeout(_))
        ));
    }

    #[test]
    fn trait_can_be_implemented_by_mock_struct() {
        struct MockClient {
            response: String,
        }

        impl ChatClientTrait for MockClient {
            fn complete(&self, _request: &ChatRequest) -> Result<String, LlmError> {
                Ok(self.response.clone())
            }
        }

        let mock = MockClient {
            response: "test response".to_string(),
        };
        let request = ChatRequest::new("test-model", vec![ChatMessage::user("test prompt")]);
        assert_eq!(mock.complete(&request).unwrap(), "test response");
    }
}

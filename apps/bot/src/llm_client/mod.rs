/// Completion client for the fact-check bot.
///
/// Only this module talks to the Anthropic API. The generator and the self-test
/// see it through the `CompletionService` trait, with `LlmClient` as the
/// production implementation.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod testing;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all fact-check calls. Small and fast: replies are 1-2 sentences.
pub const MODEL: &str = "claude-3-haiku-20240307";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Completion contract
// ────────────────────────────────────────────────────────────────────────────

/// A single synchronous text-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generated_text: String,
}

/// Black-box text completion. Any provider with request/response semantics fits.
///
/// Carried by the generator as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;

    /// Cheap reachability check used by the system self-test.
    async fn ping(&self) -> Result<(), LlmError> {
        let request = CompletionRequest {
            system_prompt: String::new(),
            user_prompt: "Hi".to_string(),
            max_output_tokens: 10,
            temperature: 0.0,
        };
        self.complete(&request).await.map(|_| ())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Anthropic Messages API. One attempt by default; with
/// `max_attempts > 1` it retries 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    max_attempts: u32,
}

impl LlmClient {
    pub fn new(api_key: String, max_attempts: u32) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: ANTHROPIC_API_URL.to_string(),
            max_attempts: max_attempts.max(1),
        })
    }

    /// Points the client at a different Messages endpoint (local mocks, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(&self, request: &CompletionRequest) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_output_tokens,
            system: &request.system_prompt,
            temperature: request.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.user_prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: self.max_attempts,
        }))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let response = self.call(request).await?;
        let text = response.text().map(str::trim).unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(Completion {
            generated_text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "be sassy".to_string(),
            user_prompt: "Claim: the moon is cheese".to_string(),
            max_output_tokens: 150,
            temperature: 0.8,
        }
    }

    async fn client_for(server: &MockServer, attempts: u32) -> LlmClient {
        LlmClient::new("test-key".to_string(), attempts)
            .unwrap()
            .with_endpoint(format!("{}/v1/messages", server.uri()))
    }

    #[tokio::test]
    async fn test_complete_returns_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "  Bestie, no. 🧀 Source: NASA  "}],
                "usage": {"input_tokens": 12, "output_tokens": 9}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = client_for(&server, 1).await.complete(&request()).await.unwrap();
        assert_eq!(completion.generated_text, "Bestie, no. 🧀 Source: NASA");
    }

    #[tokio::test]
    async fn test_empty_text_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "   "}],
                "usage": {"input_tokens": 1, "output_tokens": 0}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, 1).await.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_client_error_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, 3).await.complete(&request()).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid x-api-key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 1).await.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 529, .. }));
    }

    #[test]
    fn test_request_body_omits_empty_system() {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: 10,
            system: "",
            temperature: 0.0,
            messages: vec![AnthropicMessage {
                role: "user",
                content: "Hi",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("system").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}

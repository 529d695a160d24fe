/*!
 * OpenAI-compatible chat-completions client.
 *
 * Covers both the public OpenAI API (Bearer auth, `/v1/chat/completions`)
 * and Azure OpenAI deployments (`api-key` header,
 * `/openai/deployments/{model}/chat/completions?api-version=...`), selected
 * by whether an API version is configured.
 */

use std::time::Duration;

use log::error;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ChatRequest, Provider};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// OpenAI client for chat-completion requests
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (empty means the public API)
    endpoint: String,
    /// Model or deployment name
    model: String,
    /// Azure api-version; `None` selects the standard OpenAI surface
    api_version: Option<String>,
    /// Request timeout, also reported in timeout errors
    timeout_secs: u64,
}

/// Chat message wire format
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

impl OpenAI {
    /// Create a new client.
    ///
    /// An empty `endpoint` selects the public OpenAI API; a `Some`
    /// `api_version` switches to the Azure deployment URL and header scheme.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_version: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_version,
            timeout_secs,
        }
    }

    fn base_url(&self) -> &str {
        if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        }
    }

    fn request_url(&self) -> String {
        match &self.api_version {
            Some(api_version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url(),
                self.model,
                api_version
            ),
            None => format!("{}/v1/chat/completions", self.base_url()),
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else if error.is_connect() {
            ProviderError::ConnectionError(error.to_string())
        } else {
            ProviderError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait::async_trait]
impl Provider for OpenAI {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let mut builder = self
            .client
            .post(self.request_url())
            .header("Content-Type", "application/json");
        builder = match &self.api_version {
            Some(_) => builder.header("api-key", &self.api_key),
            None => builder.bearer_auth(&self.api_key),
        };

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(message)
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                },
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("response held no choices".to_string()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ChatRequest::new("You are a helpful assistant.", "Say hello!")
            .max_tokens(10);
        self.complete(ChatRequest {
            json_response: false,
            ..request
        })
        .await?;
        Ok(())
    }
}

/*!
 * Provider implementations for the translation service boundary.
 *
 * This module contains client implementations for LLM chat-completion
 * backends:
 * - OpenAI: OpenAI API and Azure OpenAI deployments
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One chat-completion request: system instruction plus user payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System prompt guiding the model
    pub system: String,
    /// User message (the serialized address map)
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Whether to constrain the response to a JSON object
    pub json_response: bool,
}

impl ChatRequest {
    /// Create a new request with the given system and user messages.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.5,
            max_tokens: 4000,
            json_response: true,
        }
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Common trait for all translation providers.
///
/// Object-safe so the translation client can hold any backend behind a
/// `Box<dyn Provider>`; the response is the raw message content, parsing
/// into an address map is the client's job.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a chat request, returning the response message content.
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider.
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod mock;
pub mod openai;

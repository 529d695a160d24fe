/*!
 * Batched, fault-tolerant translation of address maps.
 *
 * The client serializes one logical unit's address map into a single
 * chat-completion request, asks for a JSON object mirroring the input shape,
 * and parses the structured response back into an address map. Transient
 * failures (malformed output, timeout) are retried a bounded number of
 * times with a pause in between; on exhaustion, and on any permanent
 * failure, the original untranslated map is returned unchanged - translation
 * failure never propagates past this boundary.
 */

use std::time::Duration;

use indexmap::IndexMap;
use log::{error, warn};
use serde::Deserialize;

use crate::address::{AddressMap, TextUnit};
use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::openai::OpenAI;
use crate::providers::{ChatRequest, Provider};

/// System prompt template; `{target_language}` is substituted per request.
const SYSTEM_PROMPT: &str = "You are a professional language translator.\n\
    Return a json with format similar to user's provided dictionary.\n\
    Translate the text to {target_language}.";

/// Translation client owning a provider and the retry policy.
pub struct TranslationClient {
    provider: Box<dyn Provider>,
    max_attempts: u32,
    retry_delay: Duration,
    temperature: f32,
    max_tokens: u32,
}

/// A response value: the requested shape is a list of strings, but a bare
/// string is tolerated as a one-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseValue {
    Many(Vec<String>),
    One(String),
}

impl From<ResponseValue> for TextUnit {
    fn from(value: ResponseValue) -> Self {
        match value {
            ResponseValue::Many(strings) => strings,
            ResponseValue::One(string) => vec![string],
        }
    }
}

impl TranslationClient {
    /// Create a client from configuration, using the OpenAI provider.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let provider = OpenAI::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.model.clone(),
            config.api_version.clone(),
            config.timeout_secs,
        );
        Self::with_provider(Box::new(provider), config)
    }

    /// Create a client around an arbitrary provider (used by tests).
    pub fn with_provider(provider: Box<dyn Provider>, config: &TranslationConfig) -> Self {
        Self {
            provider,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Translate one logical unit's map.
    ///
    /// Always returns a map: the translated one on success, the input
    /// unchanged on any failure. Length mismatches between request and
    /// response are not corrected here; the writer absorbs them.
    pub async fn translate_unit(&self, units: &AddressMap, target_language: &str) -> AddressMap {
        if units.is_empty() {
            return AddressMap::new();
        }
        let payload = match serde_json::to_string(units) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize translation payload: {}", e);
                return units.clone();
            }
        };
        let system = SYSTEM_PROMPT.replace("{target_language}", target_language);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(&system, &payload).await {
                Ok(translated) => return translated,
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        "Translation attempt {}/{} failed: {}",
                        attempt, self.max_attempts, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) if e.is_retryable() => {
                    error!(
                        "Translation failed after {} attempts, keeping original text: {}",
                        attempt, e
                    );
                    return units.clone();
                }
                Err(e) => {
                    error!(
                        "Translation failed with non-retryable error, keeping original text: {}",
                        e
                    );
                    return units.clone();
                }
            }
        }
    }

    async fn attempt(&self, system: &str, payload: &str) -> Result<AddressMap, ProviderError> {
        let request = ChatRequest::new(system, payload)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        let content = self.provider.complete(request).await?;
        let parsed: IndexMap<String, ResponseValue> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(parsed
            .into_iter()
            .map(|(address, value)| (address, value.into()))
            .collect())
    }

    /// Test the provider connection.
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.provider.test_connection().await
    }
}

/*!
 * Mock provider implementations for testing.
 *
 * This module provides a scripted provider that simulates different
 * behaviors per call:
 * - `MockProvider::echo()` - always answers with the request payload
 *   (an identity translation)
 * - `MockProvider::failing()` - always fails with a transport error
 * - `MockProvider::scripted(...)` - plays a fixed behavior sequence, then
 *   repeats the last entry (e.g. "unit 1 succeeds, unit 2 times out")
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{ChatRequest, Provider};

/// Behavior of a single mock call
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Echo the user payload back verbatim (identity translation)
    Echo,
    /// Answer with a canned response body
    Reply(String),
    /// Answer with prose that is not parseable JSON
    Malformed,
    /// Fail with a timeout
    Timeout,
    /// Fail with a transport error
    Fail,
    /// Fail with an authentication error
    AuthError,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Scripted behaviors, consumed front to back
    script: Mutex<Vec<MockBehavior>>,
    /// Behavior once the script is exhausted
    default_behavior: MockBehavior,
    /// Number of completed calls
    call_count: AtomicUsize,
    /// Captured requests, in call order
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a provider that repeats `default_behavior` on every call.
    pub fn new(default_behavior: MockBehavior) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            default_behavior,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Identity-translation provider: every call echoes its payload.
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Provider that always fails with a transport error.
    pub fn failing() -> Self {
        Self::new(MockBehavior::Fail)
    }

    /// Provider that plays `script` in order, then repeats its last entry.
    pub fn scripted(script: Vec<MockBehavior>) -> Self {
        let default_behavior = script.last().cloned().unwrap_or(MockBehavior::Echo);
        Self {
            script: Mutex::new(script),
            default_behavior,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// User payloads of all calls made so far.
    pub fn payloads(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.user.clone())
            .collect()
    }

    fn next_behavior(&self) -> MockBehavior {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            self.default_behavior.clone()
        } else {
            script.remove(0)
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let behavior = self.next_behavior();
        let payload = request.user.clone();
        self.requests.lock().unwrap().push(request);
        match behavior {
            MockBehavior::Echo => Ok(payload),
            MockBehavior::Reply(body) => Ok(body),
            MockBehavior::Malformed => {
                Ok("Sure! Here is the translation you asked for.".to_string())
            }
            MockBehavior::Timeout => Err(ProviderError::Timeout(120)),
            MockBehavior::Fail => {
                Err(ProviderError::RequestFailed("connection reset".to_string()))
            }
            MockBehavior::AuthError => Err(ProviderError::AuthenticationError(
                "invalid api key".to_string(),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

// Shared handle, so tests can keep inspecting a provider they handed to a
// translation client.
#[async_trait]
impl Provider for Arc<MockProvider> {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.as_ref().complete(request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.as_ref().test_connection().await
    }
}

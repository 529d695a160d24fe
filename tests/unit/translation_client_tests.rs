/*!
 * Tests for translation client retry and fallback behavior
 */

use std::sync::Arc;

use transdoc::address::AddressMap;
use transdoc::providers::mock::{MockBehavior, MockProvider};
use transdoc::translation_client::TranslationClient;

use crate::common::{init_test_logging, test_translation_config};

fn sample_map() -> AddressMap {
    let mut map = AddressMap::new();
    map.insert("0,0".to_string(), vec!["Hello".to_string()]);
    map.insert(
        "0,1".to_string(),
        vec!["World".to_string(), "!".to_string()],
    );
    map
}

fn client_around(provider: Arc<MockProvider>) -> TranslationClient {
    init_test_logging();
    TranslationClient::with_provider(Box::new(provider), &test_translation_config())
}

/// Test that an identity provider returns the input map unchanged
#[tokio::test]
async fn test_translateUnit_withEchoProvider_shouldReturnIdentity() {
    let provider = Arc::new(MockProvider::echo());
    let client = client_around(provider.clone());

    let map = sample_map();
    let result = client.translate_unit(&map, "French").await;

    assert_eq!(result, map);
    assert_eq!(provider.call_count(), 1);
}

/// Test that a canned provider response is parsed into the result map
#[tokio::test]
async fn test_translateUnit_withCannedReply_shouldReturnTranslation() {
    let provider = Arc::new(MockProvider::new(MockBehavior::Reply(
        r#"{"0,0": ["Bonjour"], "0,1": ["Monde", "!"]}"#.to_string(),
    )));
    let client = client_around(provider.clone());

    let result = client.translate_unit(&sample_map(), "French").await;

    assert_eq!(result["0,0"], vec!["Bonjour".to_string()]);
    assert_eq!(result["0,1"], vec!["Monde".to_string(), "!".to_string()]);
}

/// Test that a malformed first response is retried and the second parsed
#[tokio::test]
async fn test_translateUnit_withMalformedThenValidResponse_shouldRetryAndSucceed() {
    let provider = Arc::new(MockProvider::scripted(vec![
        MockBehavior::Malformed,
        MockBehavior::Echo,
    ]));
    let client = client_around(provider.clone());

    let map = sample_map();
    let result = client.translate_unit(&map, "French").await;

    assert_eq!(result, map);
    assert_eq!(provider.call_count(), 2);
}

/// Test that exhausting retryable attempts falls back to the original text
#[tokio::test]
async fn test_translateUnit_withRepeatedTimeouts_shouldFallBackToOriginal() {
    let provider = Arc::new(MockProvider::new(MockBehavior::Timeout));
    let client = client_around(provider.clone());

    let map = sample_map();
    let result = client.translate_unit(&map, "French").await;

    assert_eq!(result, map);
    // Default policy allows two attempts per unit.
    assert_eq!(provider.call_count(), 2);
}

/// Test that transport errors are not retried
#[tokio::test]
async fn test_translateUnit_withTransportError_shouldNotRetry() {
    let provider = Arc::new(MockProvider::failing());
    let client = client_around(provider.clone());

    let map = sample_map();
    let result = client.translate_unit(&map, "French").await;

    assert_eq!(result, map);
    assert_eq!(provider.call_count(), 1);
}

/// Test that authentication errors are not retried
#[tokio::test]
async fn test_translateUnit_withAuthError_shouldNotRetry() {
    let provider = Arc::new(MockProvider::new(MockBehavior::AuthError));
    let client = client_around(provider.clone());

    let map = sample_map();
    let result = client.translate_unit(&map, "French").await;

    assert_eq!(result, map);
    assert_eq!(provider.call_count(), 1);
}

/// Test that an empty map never reaches the provider
#[tokio::test]
async fn test_translateUnit_withEmptyMap_shouldSkipProviderCall() {
    let provider = Arc::new(MockProvider::echo());
    let client = client_around(provider.clone());

    let result = client.translate_unit(&AddressMap::new(), "French").await;

    assert!(result.is_empty());
    assert_eq!(provider.call_count(), 0);
}

/// Test that the request carries the serialized map and the target language
#[tokio::test]
async fn test_translateUnit_withSampleMap_shouldSendSerializedPayload() {
    let provider = Arc::new(MockProvider::echo());
    let client = client_around(provider.clone());

    let map = sample_map();
    client.translate_unit(&map, "Japanese").await;

    let payloads = provider.payloads();
    assert_eq!(payloads.len(), 1);
    let sent: AddressMap = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(sent, map);
}

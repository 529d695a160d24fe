/*!
 * Error types for the transdoc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The request exceeded the configured wall-clock timeout
    #[error("API request timed out after {0} seconds")]
    Timeout(u64),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Malformed structured output and timeouts are transient: the service is
    /// non-deterministic and a second attempt may produce a valid response.
    /// Authentication, quota and transport failures will not get better by
    /// asking again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::Timeout(_))
    }
}

/// Errors that can occur while opening, mutating or serializing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input bytes are not a readable archive of the expected format
    #[error("Failed to open document: {0}")]
    Open(String),

    /// A required package part is missing
    #[error("Missing document part: {0}")]
    MissingPart(String),

    /// A package part holds XML that cannot be parsed
    #[error("Malformed XML in part {part}: {message}")]
    MalformedXml {
        /// Package part path
        part: String,
        /// Parser error description
        message: String,
    },

    /// Writing the mutated document back to bytes failed
    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    /// The file extension does not map to a supported document format
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document handling
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document handling
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

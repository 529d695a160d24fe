/*!
 * # transdoc - AI-powered office document translator
 *
 * A Rust library for translating office documents with an LLM while
 * preserving their formatting and layout.
 *
 * ## Features
 *
 * - Extract translatable text from .pptx, .docx and .xlsx files
 * - Translate extracted text using OpenAI or Azure OpenAI deployments
 * - Write translations back in place, preserving run-level formatting
 *   (font size, color, bold, italic, underline)
 * - Bounded retry on transient provider failures, degrading to the
 *   original text so one bad response never corrupts a document
 * - Configurable translation parameters
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `ooxml`: ZIP package access and a mutable XML tree for document parts
 * - `document`: Format backends behind the `TranslatableDocument` trait:
 *   - `document::pptx`: Presentations (slides, shapes, groups)
 *   - `document::docx`: Word documents (paragraphs, runs, tables)
 *   - `document::xlsx`: Spreadsheets (worksheets, cells, shared strings)
 * - `address`: Stable string addresses mapping extracted text to its origin
 * - `translation_client`: Retry loop and response parsing around a provider
 * - `pipeline`: Per-unit extract/translate/apply orchestration
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI / Azure OpenAI API client
 *   - `providers::mock`: Scriptable in-memory provider for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Module declarations
pub mod address;
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod ooxml;
pub mod pipeline;
pub mod providers;
pub mod translation_client;

// Re-export the most commonly used types
pub use address::{AddressMap, TextUnit};
pub use app_config::Config;
pub use document::{DocumentKind, TranslatableDocument};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use pipeline::DocumentPipeline;
pub use translation_client::TranslationClient;

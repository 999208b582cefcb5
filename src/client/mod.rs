//! # Gemini Client
//!
//! This module provides the HTTP client for the Gemini generative-AI API along
//! with the domain types, error kinds and retry machinery shared by the rest
//! of the crate.
//!
//! ## Modules
//!
//! - [`auth`] - API key handling and validation
//! - [`client`] - HTTP transport for text and image models
//! - [`error`] - Error kinds and transport failure classification
//! - [`prompts`] - Prompts and response schemas for each call site
//! - [`retry`] - Exponential backoff around a single remote operation
//! - [`types`] - Cocktail domain types and wire format
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcp_mixmaster::client::{AiTransport, GeminiClient, GenerateContentRequest, Part};
//!
//! # async fn example() -> Result<(), mcp_mixmaster::client::CallError> {
//! let client = GeminiClient::new(
//!     "https://generativelanguage.googleapis.com".to_string(),
//!     Some("AIza...".to_string()),
//! );
//!
//! let request = GenerateContentRequest::structured(
//!     vec![Part::text("List three gin cocktails as a JSON array of names.")],
//!     serde_json::json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
//! );
//! let response = client.generate_content("gemini-2.5-flash", &request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod prompts;
pub mod retry;
pub mod types;

pub use client::GeminiClient;
pub use error::{AiError, CallError};
pub use retry::{AttemptOutcome, CallAttempt, Failure, RetryPolicy, RetryableCall};
pub use types::*;

use async_trait::async_trait;

/// A remote generative-AI service.
///
/// [`GeminiClient`] talks HTTP; tests substitute scripted implementations.
#[async_trait]
pub trait AiTransport: Send + Sync {
    /// Calls a text/vision model.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CallError>;

    /// Calls an image model.
    async fn predict_image(
        &self,
        model: &str,
        request: &ImagePredictRequest,
    ) -> Result<ImagePredictResponse, CallError>;
}

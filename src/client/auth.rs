//! API key handling for the Gemini API.
//!
//! The key is sent with every request in the `x-goog-api-key` header. Nothing
//! is exchanged up front, so [`GeminiAuth::validate`] performs a cheap model
//! listing call to confirm the key before a server starts accepting work.

use reqwest::Client;

use crate::client::error::CallError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// # Gemini Credential Holder
///
/// Keeps the API key and exposes it to the HTTP client.
///
/// ## Key Format
///
/// Google AI Studio keys look like `AIza...` (39 characters). Only a short
/// prefix is ever logged.
#[derive(Clone)]
pub struct GeminiAuth {
    /// Base URL of the API, e.g. `https://generativelanguage.googleapis.com`
    base_url: String,
    /// Configured API key
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAuth")
            .field("base_url", &self.base_url)
            .field("api_key", &self.key_preview())
            .finish()
    }
}

impl GeminiAuth {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { base_url, api_key }
    }

    /// Confirms the key against the models endpoint.
    pub async fn validate(&self, client: &Client) -> Result<(), CallError> {
        let key = self.get_key()?;
        let url = format!("{}/v1beta/models?pageSize=1", self.base_url);

        tracing::debug!("Validating API key {} against {}", self.key_preview().unwrap_or_default(), url);

        let response = client
            .get(&url)
            .header(API_KEY_HEADER, key)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during key validation: {}", e);
                CallError::Network(format!("Failed to connect to {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        tracing::debug!("Key validation response status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Key validation failed with status {}: {}", status, error_body);
            return Err(CallError::from_response(status.as_u16(), &error_body));
        }

        tracing::info!("API key accepted by {}", self.base_url);
        Ok(())
    }

    /// The configured key, or `Unauthorized` when none is set.
    pub fn get_key(&self) -> Result<&str, CallError> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => {
                tracing::error!("Attempted to call the API without an API key");
                Err(CallError::Unauthorized {
                    status: 401,
                    message: "API_KEY_INVALID: no API key configured".to_string(),
                })
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn key_preview(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(|key| format!("{}...", key.chars().take(6).collect::<String>()))
    }

    pub fn set_key(&mut self, api_key: String) {
        self.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{
    auth::{GeminiAuth, API_KEY_HEADER},
    error::CallError,
    types::*,
    AiTransport,
};

/// Default endpoint of the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    base_url: String,
    client: Client,
    auth: GeminiAuth,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            auth: GeminiAuth::new(base_url.clone(), api_key),
            base_url,
            timeout: Duration::from_secs(120),
        }
    }

    pub async fn validate_key(&self) -> Result<(), CallError> {
        self.auth.validate(&self.client).await
    }

    pub fn is_configured(&self) -> bool {
        self.auth.is_configured()
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.base_url,
            urlencoding::encode(model),
            method
        )
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, CallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let key = self.auth.get_key()?;

        tracing::debug!("Making request to: {}", url);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error calling {}: {}", url, e);
                CallError::Network(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Request to {} failed with status {}: {}", url, status, error_body);
            return Err(CallError::from_response(status.as_u16(), &error_body));
        }

        response.json::<R>().await.map_err(|e| {
            tracing::error!("Failed to parse response from {}: {}", url, e);
            CallError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl AiTransport for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CallError> {
        let url = self.model_url(model, "generateContent");
        self.post_json(&url, request).await
    }

    async fn predict_image(
        &self,
        model: &str,
        request: &ImagePredictRequest,
    ) -> Result<ImagePredictResponse, CallError> {
        let url = self.model_url(model, "predict");
        self.post_json(&url, request).await
    }
}

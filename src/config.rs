//! Runtime configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` | required |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
//! | `MIXMASTER_TEXT_MODEL` | `gemini-2.5-flash` |
//! | `MIXMASTER_IMAGE_MODEL` | `imagen-4.0-generate-001` |
//! | `MIXMASTER_STORE_PATH` | unset (in-memory store) |
//! | `MIXMASTER_LANGUAGE` | `es` |
//! | `BIND_ADDR` | `127.0.0.1:3001` |

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::client::{GeminiClient, Language};
use crate::client::client::DEFAULT_BASE_URL;
use crate::connectivity::TcpProbe;
use crate::gateway::{AiGateway, ModelConfig, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::ingredients::IngredientSet;
use crate::session::MixSession;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub models: ModelConfig,
    pub store_path: Option<PathBuf>,
    pub language: Language,
    pub bind_addr: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("store_path", &self.store_path)
            .field("language", &self.language)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source; used by [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;

        let base_url = lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        TcpProbe::for_base_url(&base_url)
            .with_context(|| format!("invalid GEMINI_BASE_URL: {}", base_url))?;

        let models = ModelConfig {
            text_model: lookup("MIXMASTER_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: lookup("MIXMASTER_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        };

        let store_path = lookup("MIXMASTER_STORE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let language = match lookup("MIXMASTER_LANGUAGE") {
            Some(raw) => raw
                .parse::<Language>()
                .map_err(anyhow::Error::msg)
                .context("invalid MIXMASTER_LANGUAGE")?,
            None => Language::default(),
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3001".to_string());

        Ok(Self {
            api_key,
            base_url,
            models,
            store_path,
            language,
            bind_addr,
        })
    }

    pub fn client(&self) -> GeminiClient {
        GeminiClient::new(self.base_url.clone(), Some(self.api_key.clone()))
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        match &self.store_path {
            Some(path) => {
                tracing::info!("Persisting favorites and shares to {}", path.display());
                Arc::new(FileStore::new(path.clone()))
            }
            None => {
                tracing::info!("No MIXMASTER_STORE_PATH set; favorites and shares are kept in memory");
                Arc::new(MemoryStore::new())
            }
        }
    }

    /// A session wired to the live API, starting with random catalog ingredients.
    pub fn build_session(&self) -> anyhow::Result<MixSession> {
        let probe = TcpProbe::for_base_url(&self.base_url)
            .with_context(|| format!("invalid GEMINI_BASE_URL: {}", self.base_url))?;
        tracing::debug!("Connectivity probe target: {}", probe.addr());
        let gateway = AiGateway::new(Arc::new(self.client()))
            .with_connectivity(Arc::new(probe))
            .with_models(self.models.clone());
        Ok(MixSession::new(gateway, self.store())
            .with_language(self.language)
            .with_ingredients(IngredientSet::random_starter(self.language)))
    }
}

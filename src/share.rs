//! Link-based sharing of cocktails.
//!
//! A share record is an immutable snapshot stored under
//! `shared_cocktail_<id>`. Links use the fragment form `#/share/<id>`.

use std::sync::{Arc, OnceLock};

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::client::{AiError, CocktailDetails, Recipe};
use crate::store::KeyValueStore;

pub const SHARE_KEY_PREFIX: &str = "shared_cocktail_";

const SHARE_ID_LEN: usize = 9;
const SHARE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Stored form of a share record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub cocktail_data: CocktailDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

pub struct ShareStore {
    store: Arc<dyn KeyValueStore>,
}

impl ShareStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Publishes a snapshot and returns its id.
    pub fn save(&self, details: &CocktailDetails, image_url: Option<&str>) -> Result<String, AiError> {
        let id = generate_share_id();
        let record = ShareRecord {
            cocktail_data: details.clone(),
            image_url: image_url.map(str::to_string),
        };
        let value = serde_json::to_string(&record).map_err(|e| AiError::Storage(e.to_string()))?;
        self.store.set(&share_key(&id), value).map_err(|e| {
            tracing::error!("Failed to save shared cocktail \"{}\": {}", details.cocktail_name, e);
            e
        })?;
        tracing::info!("Shared cocktail \"{}\" as {}", details.cocktail_name, id);
        Ok(id)
    }

    /// Rebuilds the shared cocktail under `id`. Its image status is `success`
    /// when an image was shared and `error` otherwise.
    pub fn load(&self, id: &str) -> Result<Recipe, AiError> {
        let raw = self.store.get(&share_key(id))?.ok_or_else(|| {
            tracing::warn!("Shared cocktail {} not found", id);
            AiError::NotFound
        })?;
        let record: ShareRecord = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("Shared cocktail {} is corrupt: {}", id, e);
            AiError::Storage(e.to_string())
        })?;
        Ok(Recipe::restore(id, record.cocktail_data, record.image_url))
    }
}

pub fn share_key(id: &str) -> String {
    format!("{}{}", SHARE_KEY_PREFIX, id)
}

fn generate_share_id() -> String {
    let mut rng = rand::rng();
    (0..SHARE_ID_LEN)
        .map(|_| SHARE_ID_ALPHABET[rng.random_range(0..SHARE_ID_ALPHABET.len())] as char)
        .collect()
}

/// `#/share/<id>`
pub fn share_fragment(id: &str) -> String {
    format!("#/share/{}", id)
}

/// Extracts the id from a `#/share/<alphanumeric-id>` fragment.
///
/// Full URLs are accepted; only their fragment is inspected.
pub fn parse_share_fragment(input: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^#/share/([a-zA-Z0-9]+)$").expect("share fragment pattern is valid")
    });
    let fragment = match input.find('#') {
        Some(index) => &input[index..],
        None => input,
    };
    pattern
        .captures(fragment.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Accepts a share link, a bare fragment or a bare id.
pub fn resolve_share_id(input: &str) -> Option<String> {
    let input = input.trim();
    parse_share_fragment(input).or_else(|| {
        (!input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| input.to_string())
    })
}

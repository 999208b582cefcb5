//! Type definitions for cocktails and the Gemini wire format.
//!
//! This module contains the domain model shared by the gateway, the status
//! tracker and the persistence layer, plus the request and response shapes
//! exchanged with the generative-AI service.
//!
//! ## Key Types
//!
//! - [`CocktailDetails`] - A generated recipe body, without identity or image fields
//! - [`Recipe`] - A cocktail owned by a collection, with an immutable id and image status
//! - [`Difficulty`] - The five difficulty levels, with a bilingual label table
//! - [`ImageStatus`] / [`ImageUpdate`] - Per-recipe image progress
//! - [`RecipePatch`] - Translated fields to merge into an existing recipe
//!
//! ## JSON Compatibility
//!
//! Field names follow the camelCase layout used by the persisted favorites and
//! share records (`cocktailName`, `prepTime`, `imageUrl`, `imageState`, ...).
//! [`Difficulty`] accepts either its English or Spanish label when deserializing,
//! since the model sometimes answers in the requested language.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Presentation language for prompts, recipes and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Es,
}

impl Language {
    /// English name of the language, as used inside prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "spanish" | "español" | "espanol" => Ok(Language::Es),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Difficulty of a cocktail.
///
/// Serialized with its English label. The label table is bijective: every
/// level has exactly one English and one Spanish label, and
/// [`Difficulty::from_label`] accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    VeryEasy,
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

// Indexed by discriminant.
const DIFFICULTY_LABELS: [(Difficulty, &str, &str); 5] = [
    (Difficulty::VeryEasy, "Very Easy", "Muy Fácil"),
    (Difficulty::Easy, "Easy", "Fácil"),
    (Difficulty::Medium, "Medium", "Medio"),
    (Difficulty::Hard, "Hard", "Difícil"),
    (Difficulty::Expert, "Expert", "Experto"),
];

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Label of this level in the given language.
    pub fn label(self, language: Language) -> &'static str {
        let (_, en, es) = DIFFICULTY_LABELS[self as usize];
        match language {
            Language::En => en,
            Language::Es => es,
        }
    }

    /// Looks up a level by its English or Spanish label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        DIFFICULTY_LABELS
            .iter()
            .find(|(_, en, es)| en.to_lowercase() == wanted || es.to_lowercase() == wanted)
            .map(|(level, _, _)| *level)
    }

    /// Maps a label from one language to the other, e.g. `"Fácil"` -> `"Easy"`.
    pub fn translate_label(label: &str, to: Language) -> Option<&'static str> {
        Self::from_label(label).map(|level| level.label(to))
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label(Language::En))
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Difficulty::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown difficulty level: {}", label))
        })
    }
}

/// A single ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Amount and unit, e.g. `"2 oz"` or `"1/2 lime"`
    pub quantity: String,
    pub name: String,
    /// Set when the ingredient is primarily a garnish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_garnish: Option<bool>,
}

/// A generated cocktail recipe without identity or image fields.
///
/// This is what the generation call returns and what a share record stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailDetails {
    pub cocktail_name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Preparation time as free text, e.g. `"5 minutes"`
    pub prep_time: String,
    pub difficulty: Difficulty,
    pub glassware: String,
    pub garnish: String,
    pub flavor_profile: String,
}

/// Progress of the image attached to a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    #[default]
    Pending,
    Loading,
    Success,
    Error,
    ErrorQuota,
}

impl ImageStatus {
    /// Pending and loading images still have work outstanding.
    pub fn is_unfinished(self) -> bool {
        matches!(self, ImageStatus::Pending | ImageStatus::Loading)
    }
}

/// A status transition for a recipe image.
///
/// `Ready` is the only way into [`ImageStatus::Success`], so a successful
/// recipe always carries its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    Pending,
    Loading,
    Ready(String),
    Failed,
    QuotaExceeded,
}

/// A cocktail held by a collection (working list, favorites or shared view).
///
/// The id is assigned once and cannot be changed. Image fields are only
/// mutated through [`Recipe::apply_image`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecipe")]
pub struct Recipe {
    id: String,
    #[serde(flatten)]
    pub details: CocktailDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    image_state: ImageStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecipe {
    id: String,
    #[serde(flatten)]
    details: CocktailDetails,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_state: Option<ImageStatus>,
}

impl From<StoredRecipe> for Recipe {
    fn from(stored: StoredRecipe) -> Self {
        let image_state = match (stored.image_state, stored.image_url.is_some()) {
            (Some(ImageStatus::Success), false) => ImageStatus::Error,
            (Some(state), _) => state,
            (None, true) => ImageStatus::Success,
            (None, false) => ImageStatus::Error,
        };
        Self {
            id: stored.id,
            details: stored.details,
            image_url: stored.image_url,
            image_state,
        }
    }
}

impl Recipe {
    /// Wraps freshly generated details with a new id, ready for image generation.
    pub fn new(details: CocktailDetails) -> Self {
        Self {
            id: generate_recipe_id(),
            details,
            image_url: None,
            image_state: ImageStatus::Loading,
        }
    }

    /// Rebuilds a recipe from stored parts, deriving the status from the image.
    pub fn restore(id: impl Into<String>, details: CocktailDetails, image_url: Option<String>) -> Self {
        let image_state = if image_url.is_some() {
            ImageStatus::Success
        } else {
            ImageStatus::Error
        };
        Self {
            id: id.into(),
            details,
            image_url,
            image_state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image_state
    }

    pub fn name(&self) -> &str {
        &self.details.cocktail_name
    }

    /// Applies an image transition. A successful update stores the image.
    pub fn apply_image(&mut self, update: ImageUpdate) {
        match update {
            ImageUpdate::Pending => self.image_state = ImageStatus::Pending,
            ImageUpdate::Loading => self.image_state = ImageStatus::Loading,
            ImageUpdate::Ready(image) => {
                self.image_url = Some(image);
                self.image_state = ImageStatus::Success;
            }
            ImageUpdate::Failed => self.image_state = ImageStatus::Error,
            ImageUpdate::QuotaExceeded => self.image_state = ImageStatus::ErrorQuota,
        }
    }

    /// Resets the status from image presence: `success` with an image, `error` without.
    pub fn settle_image_status(&mut self) {
        self.image_state = if self.image_url.is_some() {
            ImageStatus::Success
        } else {
            ImageStatus::Error
        };
    }

    /// Copies image fields from another copy of the same cocktail.
    pub fn sync_image_from(&mut self, other: &Recipe) {
        self.image_url = other.image_url.clone();
        self.image_state = other.image_state;
    }

    /// Merges translated fields. An empty patch leaves the recipe untouched.
    pub fn apply_patch(&mut self, patch: RecipePatch) {
        let details = &mut self.details;
        if let Some(name) = patch.cocktail_name {
            details.cocktail_name = name;
        }
        if let Some(description) = patch.description {
            details.description = description;
        }
        if let Some(ingredients) = patch.ingredients {
            details.ingredients = ingredients;
        }
        if let Some(instructions) = patch.instructions {
            details.instructions = instructions;
        }
        if let Some(prep_time) = patch.prep_time {
            details.prep_time = prep_time;
        }
        if let Some(difficulty) = patch.difficulty {
            details.difficulty = difficulty;
        }
        if let Some(glassware) = patch.glassware {
            details.glassware = glassware;
        }
        if let Some(garnish) = patch.garnish {
            details.garnish = garnish;
        }
        if let Some(flavor_profile) = patch.flavor_profile {
            details.flavor_profile = flavor_profile;
        }
    }
}

/// `cocktail-<unix millis>-<random>`
fn generate_recipe_id() -> String {
    let suffix: u64 = rand::rng().random();
    format!(
        "cocktail-{}-{:016x}",
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}

/// Translated recipe fields. `None` keeps the original value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub cocktail_name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub prep_time: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub glassware: Option<String>,
    pub garnish: Option<String>,
    pub flavor_profile: Option<String>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        *self == RecipePatch::default()
    }
}

// ---------------------------------------------------------------------------
// Gemini wire format
// ---------------------------------------------------------------------------

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<WireContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A request whose reply must be JSON matching `schema`.
    pub fn structured(parts: Vec<Part>, schema: Value) -> Self {
        Self {
            contents: vec![WireContent { parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(schema),
            }),
        }
    }

    /// Concatenated text of every text part, used by tests and logging.
    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a message: either text or inline binary data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: base64_data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<WireContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Builds a single-candidate reply carrying `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(WireContent {
                    parts: vec![Part::text(text)],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    /// Text of the first candidate, trimmed. Empty when the model returned nothing.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Request body for `models/{model}:predict` on an image model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePredictRequest {
    pub instances: Vec<ImageInstance>,
    pub parameters: ImageParameters,
}

impl ImagePredictRequest {
    /// One image for `prompt` with the given aspect ratio and output mime type.
    pub fn single(prompt: impl Into<String>, aspect_ratio: &str, mime_type: &str) -> Self {
        Self {
            instances: vec![ImageInstance {
                prompt: prompt.into(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.to_string(),
                output_options: OutputOptions {
                    mime_type: mime_type.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_options: OutputOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub mime_type: String,
}

/// Response body of an image `predict` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagePredictResponse {
    #[serde(default)]
    pub predictions: Vec<ImagePrediction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePrediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ImagePredictResponse {
    pub fn from_base64(bytes_base64: impl Into<String>) -> Self {
        Self {
            predictions: vec![ImagePrediction {
                bytes_base64_encoded: Some(bytes_base64.into()),
                mime_type: Some("image/jpeg".to_string()),
            }],
        }
    }
}

/// Error envelope returned by the API on non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

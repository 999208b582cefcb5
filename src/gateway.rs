//! The four AI call sites: recipe generation, image generation, ingredient
//! identification and recipe translation.
//!
//! Each call shapes a request, runs it through a [`RetryableCall`] (except
//! translation, which is a single best-effort attempt) and validates the reply
//! before returning it. Classification differs per call site: a rejected API key
//! is always fatal, quota exhaustion is fatal only for images.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::client::prompts;
use crate::client::{
    AiError, AiTransport, CallError, CocktailDetails, Difficulty, Failure, GenerateContentRequest,
    GenerateContentResponse, ImagePredictRequest, ImagePredictResponse, Ingredient, Language, Part,
    Recipe, RecipePatch, RetryPolicy, RetryableCall,
};
use crate::connectivity::{Connectivity, StaticConnectivity};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Model names used by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub text_model: String,
    pub image_model: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// Retry policy per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayPolicies {
    pub recipes: RetryPolicy,
    pub images: RetryPolicy,
    pub identification: RetryPolicy,
}

impl Default for GatewayPolicies {
    fn default() -> Self {
        Self {
            recipes: RetryPolicy::recipes(),
            images: RetryPolicy::images(),
            identification: RetryPolicy::identification(),
        }
    }
}

pub struct AiGateway {
    transport: Arc<dyn AiTransport>,
    connectivity: Arc<dyn Connectivity>,
    models: ModelConfig,
    policies: GatewayPolicies,
}

impl AiGateway {
    pub fn new(transport: Arc<dyn AiTransport>) -> Self {
        Self {
            transport,
            connectivity: Arc::new(StaticConnectivity(true)),
            models: ModelConfig::default(),
            policies: GatewayPolicies::default(),
        }
    }

    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    pub fn with_policies(mut self, policies: GatewayPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    pub async fn is_online(&self) -> bool {
        self.connectivity.is_online().await
    }

    async fn ensure_online(&self) -> Result<(), AiError> {
        if self.connectivity.is_online().await {
            Ok(())
        } else {
            Err(AiError::OfflineUnavailable)
        }
    }

    /// Generates cocktail recipes from the given ingredients.
    ///
    /// Asks for three recipes: two strictly from `ingredients`, a third that may
    /// add one or two common staples. Fails with `EmptyInput` before any call
    /// when `ingredients` is empty.
    pub async fn generate_recipes(
        &self,
        ingredients: &[String],
        language: Language,
    ) -> Result<Vec<CocktailDetails>, AiError> {
        if ingredients.is_empty() {
            return Err(AiError::EmptyInput);
        }
        self.ensure_online().await?;

        let request = GenerateContentRequest::structured(
            vec![Part::text(prompts::recipes_prompt(ingredients, language))],
            prompts::recipes_schema(),
        );
        let transport = self.transport.as_ref();
        let model = self.models.text_model.as_str();
        let request = &request;

        let mut call = RetryableCall::new("generate_recipes", self.policies.recipes);
        let recipes = call
            .run(AiError::GenerationFailed, move |_| async move {
                let response = transport
                    .generate_content(model, request)
                    .await
                    .map_err(classify_text_failure)?;
                parse_recipes(&response)
            })
            .await?;

        tracing::info!("Generated {} cocktails from {} ingredients", recipes.len(), ingredients.len());
        Ok(recipes)
    }

    /// Generates a 16:9 image for a cocktail, returned as a JPEG data URL.
    pub async fn generate_image(&self, details: &CocktailDetails) -> Result<String, AiError> {
        self.ensure_online().await?;

        let request = ImagePredictRequest::single(
            prompts::image_prompt(details),
            prompts::IMAGE_ASPECT_RATIO,
            prompts::IMAGE_MIME_TYPE,
        );
        let transport = self.transport.as_ref();
        let model = self.models.image_model.as_str();
        let request = &request;

        let mut call = RetryableCall::new(
            format!("generate_image \"{}\"", details.cocktail_name),
            self.policies.images,
        );
        call.run(AiError::ImageGenerationFailed, move |_| async move {
            let response = transport
                .predict_image(model, request)
                .await
                .map_err(classify_image_failure)?;
            image_data_url(&response)
        })
        .await
    }

    /// Lists ingredients visible in a photo. An answer that is valid JSON but
    /// not an array yields an empty list.
    pub async fn identify_ingredients(
        &self,
        image: &[u8],
        mime_type: &str,
        language: Language,
    ) -> Result<Vec<String>, AiError> {
        if image.is_empty() {
            return Err(AiError::EmptyInput);
        }
        self.ensure_online().await?;

        let request = GenerateContentRequest::structured(
            vec![
                Part::inline(mime_type, BASE64.encode(image)),
                Part::text(prompts::identify_prompt(language)),
            ],
            prompts::ingredients_schema(),
        );
        let transport = self.transport.as_ref();
        let model = self.models.text_model.as_str();
        let request = &request;

        let mut call = RetryableCall::new("identify_ingredients", self.policies.identification);
        let names = call
            .run(AiError::IdentificationFailed, move |_| async move {
                let response = transport
                    .generate_content(model, request)
                    .await
                    .map_err(classify_text_failure)?;
                parse_ingredient_names(&response)
            })
            .await?;

        tracing::info!("Identified {} ingredients in photo", names.len());
        Ok(names)
    }

    /// Translates a recipe's text between the supported languages.
    ///
    /// Never fails: any problem yields an empty patch so the caller keeps the
    /// original text.
    pub async fn translate_recipe(
        &self,
        recipe: &Recipe,
        target: Language,
        source: Language,
    ) -> RecipePatch {
        if target == source {
            return RecipePatch::default();
        }
        if !self.connectivity.is_online().await {
            tracing::warn!("Skipping translation of \"{}\": offline", recipe.name());
            return RecipePatch::default();
        }

        let request = GenerateContentRequest::structured(
            vec![Part::text(prompts::translation_prompt(recipe, target, source))],
            prompts::translation_schema(),
        );

        let response = match self
            .transport
            .generate_content(&self.models.text_model, &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error translating cocktail \"{}\": {}", recipe.name(), e);
                return RecipePatch::default();
            }
        };

        match serde_json::from_str::<TranslatedCocktail>(&response.text()) {
            Ok(translated) => translated.into_patch(recipe),
            Err(e) => {
                tracing::error!("Invalid translation for \"{}\": {}", recipe.name(), e);
                RecipePatch::default()
            }
        }
    }
}

fn classify_text_failure(error: CallError) -> Failure {
    if error.is_invalid_credential() {
        Failure::Fatal(AiError::InvalidCredential)
    } else {
        Failure::Retryable(error.to_string())
    }
}

fn classify_image_failure(error: CallError) -> Failure {
    if error.is_quota() {
        Failure::Fatal(AiError::QuotaExceeded)
    } else if error.is_invalid_credential() {
        Failure::Fatal(AiError::InvalidCredential)
    } else {
        Failure::Retryable(error.to_string())
    }
}

const EMPTY_REPLY: &str = "API returned an empty response. This may be due to safety filters.";

fn parse_recipes(response: &GenerateContentResponse) -> Result<Vec<CocktailDetails>, Failure> {
    let text = response.text();
    if text.is_empty() {
        return Err(Failure::Retryable(EMPTY_REPLY.to_string()));
    }
    let recipes: Vec<CocktailDetails> = serde_json::from_str(&text)
        .map_err(|e| Failure::Retryable(format!("malformed cocktail data: {}", e)))?;
    if recipes.is_empty() {
        return Err(Failure::Retryable(
            "API returned invalid or empty cocktail data.".to_string(),
        ));
    }
    Ok(recipes)
}

fn parse_ingredient_names(response: &GenerateContentResponse) -> Result<Vec<String>, Failure> {
    let text = response.text();
    if text.is_empty() {
        return Err(Failure::Retryable(EMPTY_REPLY.to_string()));
    }
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| Failure::Retryable(format!("malformed ingredient list: {}", e)))?;
    let names = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(|s| s.trim().to_string()))
            .filter(|name| !name.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(names)
}

fn image_data_url(response: &ImagePredictResponse) -> Result<String, Failure> {
    let prediction = response
        .predictions
        .iter()
        .find(|p| p.bytes_base64_encoded.as_deref().is_some_and(|b| !b.is_empty()))
        .ok_or_else(|| Failure::Retryable("No image was generated by the API.".to_string()))?;
    let mime_type = prediction
        .mime_type
        .as_deref()
        .unwrap_or(prompts::IMAGE_MIME_TYPE);
    Ok(format!(
        "data:{};base64,{}",
        mime_type,
        prediction.bytes_base64_encoded.as_deref().unwrap_or_default()
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedCocktail {
    cocktail_name: String,
    description: String,
    #[serde(default)]
    ingredients: Vec<TranslatedIngredient>,
    #[serde(default)]
    instructions: Vec<String>,
    prep_time: String,
    difficulty: String,
    glassware: String,
    garnish: String,
    flavor_profile: String,
}

#[derive(Debug, Deserialize)]
struct TranslatedIngredient {
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: String,
}

impl TranslatedCocktail {
    /// Builds the patch. Ingredients merge index-wise and keep the garnish flag.
    /// Blank fields, blank ingredient names or quantities, and unknown
    /// difficulty labels all fall back to the original.
    fn into_patch(self, original: &Recipe) -> RecipePatch {
        let details = &original.details;
        let ingredients = details
            .ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| {
                let translated = self.ingredients.get(index);
                Ingredient {
                    name: non_blank(translated.map(|t| t.name.as_str()))
                        .unwrap_or_else(|| ingredient.name.clone()),
                    quantity: non_blank(translated.map(|t| t.quantity.as_str()))
                        .unwrap_or_else(|| ingredient.quantity.clone()),
                    is_garnish: ingredient.is_garnish,
                }
            })
            .collect();

        let instructions = if self.instructions.is_empty() {
            details.instructions.clone()
        } else {
            self.instructions
        };

        RecipePatch {
            cocktail_name: non_blank(Some(self.cocktail_name.as_str())),
            description: non_blank(Some(self.description.as_str())),
            ingredients: Some(ingredients),
            instructions: Some(instructions),
            prep_time: non_blank(Some(self.prep_time.as_str())),
            difficulty: Some(Difficulty::from_label(&self.difficulty).unwrap_or(details.difficulty)),
            glassware: non_blank(Some(self.glassware.as_str())),
            garnish: non_blank(Some(self.garnish.as_str())),
            flavor_profile: non_blank(Some(self.flavor_profile.as_str())),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

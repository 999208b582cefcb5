//! A mixing session: the user's ingredients, the generated cocktails, the
//! favorites and the currently opened shared cocktail.
//!
//! The session drives the end-to-end flow: generate recipes, then generate
//! their images one at a time, then re-sync any favorited copies.

use std::sync::Arc;
use std::time::Duration;

use crate::batch::{BatchReport, ImageBatch, IMAGE_COOLDOWN};
use crate::client::{AiError, Language, Recipe, RecipePatch};
use crate::favorites::Favorites;
use crate::gateway::AiGateway;
use crate::ingredients::IngredientSet;
use crate::share::{resolve_share_id, share_fragment, ShareStore};
use crate::store::KeyValueStore;
use crate::tracker::RecipeCollection;

/// Result of [`MixSession::generate`].
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub recipes: Vec<Recipe>,
    pub images: BatchReport,
}

/// A published share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    pub id: String,
    pub fragment: String,
}

pub struct MixSession {
    gateway: AiGateway,
    language: Language,
    ingredients: IngredientSet,
    recipes: RecipeCollection,
    favorites: Favorites,
    shares: ShareStore,
    shared: Option<Recipe>,
    image_cooldown: Duration,
}

impl MixSession {
    pub fn new(gateway: AiGateway, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            gateway,
            language: Language::default(),
            ingredients: IngredientSet::new(),
            recipes: RecipeCollection::new(),
            favorites: Favorites::load(store.clone()),
            shares: ShareStore::new(store),
            shared: None,
            image_cooldown: IMAGE_COOLDOWN,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_ingredients(mut self, ingredients: IngredientSet) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_image_cooldown(mut self, cooldown: Duration) -> Self {
        self.image_cooldown = cooldown;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn ingredients(&self) -> &IngredientSet {
        &self.ingredients
    }

    pub fn ingredients_mut(&mut self) -> &mut IngredientSet {
        &mut self.ingredients
    }

    pub fn recipes(&self) -> &RecipeCollection {
        &self.recipes
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn shared(&self) -> Option<&Recipe> {
        self.shared.as_ref()
    }

    pub fn close_shared(&mut self) {
        self.shared = None;
    }

    /// Looks a cocktail up in the working list, favorites, then the shared view.
    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes
            .get(id)
            .or_else(|| self.favorites.recipes().get(id))
            .or_else(|| self.shared.as_ref().filter(|r| r.id() == id))
    }

    /// Generates cocktails for the current ingredients, then their images.
    ///
    /// Recipe text is kept even when the image batch stops early.
    pub async fn generate(&mut self) -> Result<GenerationReport, AiError> {
        if !self.gateway.is_online().await {
            return Err(AiError::OfflineUnavailable);
        }
        if self.ingredients.is_empty() {
            return Err(AiError::EmptyInput);
        }

        self.recipes.clear();
        let generated = self
            .gateway
            .generate_recipes(self.ingredients.as_slice(), self.language)
            .await?;
        for details in generated {
            self.recipes.push(Recipe::new(details));
        }

        let images = ImageBatch::from_collection(&self.recipes)
            .with_cooldown(self.image_cooldown)
            .run(&self.gateway, &mut self.recipes)
            .await;
        if let Some(error) = images.surfaced_error() {
            tracing::warn!("Image batch finished with error: {}", error);
        }

        self.favorites.sync_images_from(&self.recipes);

        Ok(GenerationReport {
            recipes: self.recipes.as_slice().to_vec(),
            images,
        })
    }

    /// Identifies ingredients in a photo and adds the new ones to the set.
    /// Returns every name detected.
    pub async fn identify_from_photo(&mut self, image: &[u8], mime_type: &str) -> Result<Vec<String>, AiError> {
        let detected = self
            .gateway
            .identify_ingredients(image, mime_type, self.language)
            .await?;
        let added = self.ingredients.add_many(&detected);
        tracing::info!("Detected {} ingredients, {} new", detected.len(), added.len());
        Ok(detected)
    }

    /// Switches language, translating ingredients and every held cocktail.
    /// Cocktails whose translation fails keep their current text.
    pub async fn set_language(&mut self, language: Language) {
        let previous = self.language;
        if previous == language {
            return;
        }
        self.language = language;

        if self.shared.is_none() {
            self.ingredients.translate(previous, language);
        }

        let patches = self.translate_all(self.recipes.as_slice(), language, previous).await;
        apply_patches(&mut self.recipes, patches);

        let patches = self
            .translate_all(self.favorites.recipes().as_slice(), language, previous)
            .await;
        self.favorites.update(|favorites| apply_patches(favorites, patches));

        if let Some(shared) = self.shared.as_ref() {
            let patch = self.gateway.translate_recipe(shared, language, previous).await;
            if let Some(shared) = self.shared.as_mut() {
                shared.apply_patch(patch);
            }
        }
    }

    async fn translate_all(
        &self,
        recipes: &[Recipe],
        target: Language,
        source: Language,
    ) -> Vec<(String, RecipePatch)> {
        let mut patches = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let patch = self.gateway.translate_recipe(recipe, target, source).await;
            patches.push((recipe.id().to_string(), patch));
        }
        patches
    }

    /// Adds or removes a cocktail from favorites. Returns whether it is a favorite now.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, AiError> {
        let recipe = self.find(id).cloned().ok_or(AiError::NotFound)?;
        Ok(self.favorites.toggle(&recipe))
    }

    /// Publishes a share record for a held cocktail.
    pub fn share(&self, id: &str) -> Result<SharedLink, AiError> {
        let recipe = self.find(id).ok_or(AiError::NotFound)?;
        let share_id = self.shares.save(&recipe.details, recipe.image_url())?;
        Ok(SharedLink {
            fragment: share_fragment(&share_id),
            id: share_id,
        })
    }

    /// Opens a shared cocktail from a link, fragment or bare id.
    pub fn open_shared(&mut self, link: &str) -> Result<Recipe, AiError> {
        let id = resolve_share_id(link).ok_or(AiError::NotFound)?;
        let recipe = self.shares.load(&id)?;
        self.shared = Some(recipe.clone());
        Ok(recipe)
    }
}

fn apply_patches(collection: &mut RecipeCollection, patches: Vec<(String, RecipePatch)>) {
    for (id, patch) in patches {
        if let Some(recipe) = collection.get_mut(&id) {
            recipe.apply_patch(patch);
        }
    }
}

//! Favorite cocktails, persisted as a JSON array under a fixed key.
//!
//! Favoriting stores a value copy of the recipe, so later changes to the
//! working list do not leak into the favorite. Image status is re-synced
//! explicitly through [`Favorites::sync_images_from`].

use std::sync::Arc;

use crate::client::{AiError, Recipe};
use crate::store::KeyValueStore;
use crate::tracker::RecipeCollection;

pub const FAVORITES_KEY: &str = "mixMasterFavorites";

pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    recipes: RecipeCollection,
}

impl Favorites {
    /// Loads saved favorites. Unreadable data is logged and treated as empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let recipes = match Self::read(store.as_ref()) {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::error!("Could not load favorites: {}", e);
                RecipeCollection::new()
            }
        };
        tracing::debug!("Loaded {} favorites", recipes.len());
        Self { store, recipes }
    }

    fn read(store: &dyn KeyValueStore) -> Result<RecipeCollection, AiError> {
        let Some(raw) = store.get(FAVORITES_KEY)? else {
            return Ok(RecipeCollection::new());
        };
        let mut recipes: Vec<Recipe> =
            serde_json::from_str(&raw).map_err(|e| AiError::Storage(e.to_string()))?;
        for recipe in recipes.iter_mut() {
            recipe.settle_image_status();
        }
        Ok(RecipeCollection::from(recipes))
    }

    pub fn recipes(&self) -> &RecipeCollection {
        &self.recipes
    }

    pub fn contains(&self, id: &str) -> bool {
        self.recipes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Removes the recipe if favorited, otherwise adds a copy of it.
    /// Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, recipe: &Recipe) -> bool {
        let favorited = if self.recipes.remove(recipe.id()).is_some() {
            tracing::info!("Removed \"{}\" from favorites", recipe.name());
            false
        } else {
            let mut copy = recipe.clone();
            if copy.image_status().is_unfinished() {
                copy.settle_image_status();
            }
            self.recipes.push(copy);
            tracing::info!("Added \"{}\" to favorites", recipe.name());
            true
        };
        self.persist();
        favorited
    }

    /// Copies image fields for favorites also held in `source`.
    pub fn sync_images_from(&mut self, source: &RecipeCollection) {
        if self.recipes.sync_images_from(source) > 0 {
            self.persist();
        }
    }

    /// Runs `edit` over the favorites and saves the result.
    pub fn update<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut RecipeCollection),
    {
        edit(&mut self.recipes);
        self.persist();
    }

    /// Writes the current list. Failures are logged, not returned.
    pub fn persist(&self) {
        let saved = serde_json::to_string(&self.recipes)
            .map_err(|e| AiError::Storage(e.to_string()))
            .and_then(|raw| self.store.set(FAVORITES_KEY, raw));
        if let Err(e) = saved {
            tracing::error!("Could not save favorites: {}", e);
        }
    }
}

//! Per-item image status tracking over a recipe collection.
//!
//! A tracker updates exactly the item with a given id and leaves the rest
//! alone. The same cocktail may be held by several collections (working list,
//! favorites, shared view); each collection is updated on its own and there
//! is no link between the copies.

use serde::{Deserialize, Serialize};

use crate::client::{ImageStatus, ImageUpdate, Recipe};

pub trait StatusTracker {
    /// Applies `update` to the item with `id`. Returns false when no item matches.
    fn apply(&mut self, id: &str, update: ImageUpdate) -> bool;

    /// Latest status of the item with `id`.
    fn status(&self, id: &str) -> Option<ImageStatus>;

    /// Marks every pending or loading item as failed (`error_quota` when
    /// `quota_exhausted`). Returns the number of items changed.
    fn fail_unfinished(&mut self, quota_exhausted: bool) -> usize;
}

/// An ordered list of recipes keyed by their id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeCollection {
    recipes: Vec<Recipe>,
}

impl RecipeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Recipe> {
        self.recipes.iter_mut().find(|r| r.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Recipe> {
        self.recipes.iter_mut()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Appends a recipe unless one with the same id is already held.
    pub fn push(&mut self, recipe: Recipe) -> bool {
        if self.contains(recipe.id()) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let index = self.recipes.iter().position(|r| r.id() == id)?;
        Some(self.recipes.remove(index))
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    /// Ids of the items currently in `status`, in order.
    pub fn ids_with_status(&self, status: ImageStatus) -> Vec<String> {
        self.recipes
            .iter()
            .filter(|r| r.image_status() == status)
            .map(|r| r.id().to_string())
            .collect()
    }

    /// Copies image fields from `source` into every item also held there.
    pub fn sync_images_from(&mut self, source: &RecipeCollection) -> usize {
        let mut synced = 0;
        for recipe in self.recipes.iter_mut() {
            if let Some(other) = source.get(recipe.id()) {
                if recipe.image_url() != other.image_url()
                    || recipe.image_status() != other.image_status()
                {
                    recipe.sync_image_from(other);
                    synced += 1;
                }
            }
        }
        synced
    }
}

impl From<Vec<Recipe>> for RecipeCollection {
    fn from(recipes: Vec<Recipe>) -> Self {
        let mut collection = Self::new();
        for recipe in recipes {
            collection.push(recipe);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a RecipeCollection {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

impl StatusTracker for RecipeCollection {
    fn apply(&mut self, id: &str, update: ImageUpdate) -> bool {
        match self.get_mut(id) {
            Some(recipe) => {
                recipe.apply_image(update);
                true
            }
            None => {
                tracing::debug!("No recipe {} in collection; status update dropped", id);
                false
            }
        }
    }

    fn status(&self, id: &str) -> Option<ImageStatus> {
        self.get(id).map(Recipe::image_status)
    }

    fn fail_unfinished(&mut self, quota_exhausted: bool) -> usize {
        let mut changed = 0;
        for recipe in self.recipes.iter_mut() {
            if recipe.image_status().is_unfinished() {
                recipe.apply_image(if quota_exhausted {
                    ImageUpdate::QuotaExceeded
                } else {
                    ImageUpdate::Failed
                });
                changed += 1;
            }
        }
        changed
    }
}

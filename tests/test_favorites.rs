mod common;

use std::sync::Arc;

use mcp_mixmaster::client::{ImageStatus, ImageUpdate, Recipe};
use mcp_mixmaster::favorites::{Favorites, FAVORITES_KEY};
use mcp_mixmaster::store::{FileStore, KeyValueStore, MemoryStore};
use mcp_mixmaster::tracker::{RecipeCollection, StatusTracker};
use pretty_assertions::assert_eq;

#[test]
fn test_toggle_adds_then_removes() {
    let store = Arc::new(MemoryStore::new());
    let mut favorites = Favorites::load(store.clone());
    let mut recipe = Recipe::new(common::sample_details("Moscow Mule"));
    recipe.apply_image(ImageUpdate::Ready("data:a".to_string()));

    assert!(favorites.toggle(&recipe));
    assert!(favorites.contains(recipe.id()));
    let raw = store.get(FAVORITES_KEY).unwrap().expect("favorites persisted");
    assert!(raw.contains("Moscow Mule"));

    assert!(!favorites.toggle(&recipe));
    assert!(favorites.is_empty());
    assert_eq!(store.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_favorite_is_a_value_copy() {
    let mut favorites = Favorites::load(Arc::new(MemoryStore::new()));
    let mut recipe = Recipe::new(common::sample_details("Moscow Mule"));
    recipe.apply_image(ImageUpdate::Ready("data:a".to_string()));
    favorites.toggle(&recipe);

    recipe.details.cocktail_name = "Renamed".to_string();

    let saved = favorites.recipes().get(recipe.id()).unwrap();
    assert_eq!(saved.name(), "Moscow Mule");
}

#[test]
fn test_unfinished_image_settles_when_favorited() {
    let mut favorites = Favorites::load(Arc::new(MemoryStore::new()));
    let recipe = Recipe::new(common::sample_details("Moscow Mule"));
    assert_eq!(recipe.image_status(), ImageStatus::Loading);

    favorites.toggle(&recipe);

    assert_eq!(
        favorites.recipes().status(recipe.id()),
        Some(ImageStatus::Error)
    );
}

#[test]
fn test_sync_images_from_working_list() {
    let mut favorites = Favorites::load(Arc::new(MemoryStore::new()));
    let recipe = Recipe::new(common::sample_details("Moscow Mule"));
    favorites.toggle(&recipe);

    let mut working = RecipeCollection::from(vec![recipe.clone()]);
    working.apply(recipe.id(), ImageUpdate::Ready("data:late".to_string()));
    favorites.sync_images_from(&working);

    let saved = favorites.recipes().get(recipe.id()).unwrap();
    assert_eq!(saved.image_status(), ImageStatus::Success);
    assert_eq!(saved.image_url(), Some("data:late"));
}

#[test]
fn test_favorites_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut recipe = Recipe::new(common::sample_details("Moscow Mule"));
    recipe.apply_image(ImageUpdate::Ready("data:a".to_string()));

    {
        let mut favorites = Favorites::load(Arc::new(FileStore::new(&path)));
        favorites.toggle(&recipe);
    }

    let reloaded = Favorites::load(Arc::new(FileStore::new(&path)));
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.recipes().get(recipe.id()), Some(&recipe));
}

#[test]
fn test_stale_loading_state_settles_on_load() {
    let store = Arc::new(MemoryStore::new());
    let recipe = Recipe::new(common::sample_details("Moscow Mule"));
    let raw = serde_json::to_string(&vec![recipe.clone()]).unwrap();
    store.set(FAVORITES_KEY, raw).unwrap();

    let favorites = Favorites::load(store);

    assert_eq!(
        favorites.recipes().status(recipe.id()),
        Some(ImageStatus::Error)
    );
}

#[test]
fn test_corrupt_favorites_load_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(FAVORITES_KEY, "not json".to_string()).unwrap();

    let favorites = Favorites::load(store);

    assert!(favorites.is_empty());
}

mod common;

use mcp_mixmaster::client::{ImageStatus, ImageUpdate, Recipe};
use mcp_mixmaster::tracker::{RecipeCollection, StatusTracker};
use pretty_assertions::assert_eq;

fn collection(names: &[&str]) -> RecipeCollection {
    names
        .iter()
        .map(|n| Recipe::new(common::sample_details(n)))
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn test_apply_updates_only_matching_item() {
    let mut recipes = collection(&["Moscow Mule", "Gimlet", "Lime Fizz"]);
    let ids: Vec<String> = recipes.iter().map(|r| r.id().to_string()).collect();

    assert!(recipes.apply(&ids[1], ImageUpdate::Ready("data:b".to_string())));

    assert_eq!(recipes.status(&ids[0]), Some(ImageStatus::Loading));
    assert_eq!(recipes.status(&ids[1]), Some(ImageStatus::Success));
    assert_eq!(recipes.status(&ids[2]), Some(ImageStatus::Loading));
}

#[test]
fn test_apply_unknown_id_is_dropped() {
    let mut recipes = collection(&["Moscow Mule"]);
    let before = recipes.clone();

    assert!(!recipes.apply("cocktail-0-missing", ImageUpdate::Failed));
    assert_eq!(recipes, before);
    assert_eq!(recipes.status("cocktail-0-missing"), None);
}

#[test]
fn test_fail_unfinished() {
    let mut recipes = collection(&["Moscow Mule", "Gimlet", "Lime Fizz"]);
    let ids: Vec<String> = recipes.iter().map(|r| r.id().to_string()).collect();
    recipes.apply(&ids[0], ImageUpdate::Ready("data:a".to_string()));
    recipes.apply(&ids[1], ImageUpdate::Pending);

    assert_eq!(recipes.fail_unfinished(true), 2);

    assert_eq!(recipes.status(&ids[0]), Some(ImageStatus::Success));
    assert_eq!(recipes.ids_with_status(ImageStatus::ErrorQuota), ids[1..].to_vec());
    assert_eq!(recipes.fail_unfinished(false), 0);
}

#[test]
fn test_push_rejects_duplicate_ids() {
    let recipe = Recipe::new(common::sample_details("Moscow Mule"));
    let mut recipes = RecipeCollection::new();

    assert!(recipes.push(recipe.clone()));
    assert!(!recipes.push(recipe.clone()));
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes.remove(recipe.id()).map(|r| r.id().to_string()), Some(recipe.id().to_string()));
    assert!(recipes.is_empty());
}

#[test]
fn test_copies_are_tracked_independently() {
    let working = collection(&["Moscow Mule"]);
    let id = working.as_slice()[0].id().to_string();
    let mut favorites = working.clone();
    let mut working = working;

    working.apply(&id, ImageUpdate::Ready("data:a".to_string()));
    assert_eq!(favorites.status(&id), Some(ImageStatus::Loading));

    assert_eq!(favorites.sync_images_from(&working), 1);
    assert_eq!(favorites.status(&id), Some(ImageStatus::Success));
    assert_eq!(favorites.get(&id).and_then(|r| r.image_url()), Some("data:a"));
    assert_eq!(favorites.sync_images_from(&working), 0);
}

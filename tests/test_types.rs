mod common;

use mcp_mixmaster::client::{Difficulty, ImageStatus, ImageUpdate, Language, Recipe, RecipePatch};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_difficulty_labels_are_bijective() {
    for level in Difficulty::ALL {
        let en = level.label(Language::En);
        let es = level.label(Language::Es);
        assert_eq!(Difficulty::from_label(en), Some(level));
        assert_eq!(Difficulty::from_label(es), Some(level));
        assert_eq!(Difficulty::translate_label(en, Language::Es), Some(es));
        assert_eq!(Difficulty::translate_label(es, Language::En), Some(en));
    }

    let mut spanish: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label(Language::Es)).collect();
    spanish.sort();
    spanish.dedup();
    assert_eq!(spanish.len(), 5);
}

#[test]
fn test_difficulty_lookup() {
    assert_eq!(Difficulty::translate_label("Fácil", Language::En), Some("Easy"));
    assert_eq!(Difficulty::translate_label("Very Easy", Language::Es), Some("Muy Fácil"));
    assert_eq!(Difficulty::from_label("  expert "), Some(Difficulty::Expert));
    assert_eq!(Difficulty::from_label("Sencillo"), None);
}

#[test]
fn test_difficulty_serde_accepts_either_language() {
    let level: Difficulty = serde_json::from_value(json!("Difícil")).unwrap();
    assert_eq!(level, Difficulty::Hard);
    assert_eq!(serde_json::to_value(level).unwrap(), json!("Hard"));
    assert!(serde_json::from_value::<Difficulty>(json!("Imposible")).is_err());
}

#[test]
fn test_language_parsing() {
    assert_eq!("en".parse::<Language>(), Ok(Language::En));
    assert_eq!("ES".parse::<Language>(), Ok(Language::Es));
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(Language::default(), Language::Es);
    assert_eq!(Language::En.to_string(), "en");
}

#[test]
fn test_new_recipe_starts_loading_with_unique_id() {
    let a = Recipe::new(common::sample_details("Moscow Mule"));
    let b = Recipe::new(common::sample_details("Moscow Mule"));

    assert!(a.id().starts_with("cocktail-"));
    assert_ne!(a.id(), b.id());
    assert_eq!(a.image_status(), ImageStatus::Loading);
    assert_eq!(a.image_url(), None);
}

#[test]
fn test_success_always_carries_image() {
    let mut recipe = Recipe::new(common::sample_details("Moscow Mule"));
    recipe.apply_image(ImageUpdate::Ready("data:image/jpeg;base64,AAAA".to_string()));
    assert_eq!(recipe.image_status(), ImageStatus::Success);
    assert_eq!(recipe.image_url(), Some("data:image/jpeg;base64,AAAA"));

    // A stored record claiming success without an image is downgraded
    let mut stored = serde_json::to_value(Recipe::new(common::sample_details("Gimlet"))).unwrap();
    stored["imageState"] = json!("success");
    let restored: Recipe = serde_json::from_value(stored).unwrap();
    assert_eq!(restored.image_status(), ImageStatus::Error);
}

#[test]
fn test_recipe_json_layout() {
    let mut recipe = Recipe::new(common::sample_details("Moscow Mule"));
    recipe.apply_image(ImageUpdate::QuotaExceeded);

    let value = serde_json::to_value(&recipe).unwrap();
    assert_eq!(value["cocktailName"], json!("Moscow Mule"));
    assert_eq!(value["prepTime"], json!("5 minutes"));
    assert_eq!(value["flavorProfile"], json!("Spicy & Citrus"));
    assert_eq!(value["imageState"], json!("error_quota"));
    assert_eq!(value["ingredients"][2]["isGarnish"], json!(true));
    assert!(value.get("imageUrl").is_none());
    assert_eq!(value["id"], json!(recipe.id()));
}

#[test]
fn test_restore_derives_status_from_image() {
    let details = common::sample_details("Moscow Mule");
    let with_image = Recipe::restore("abc123xyz", details.clone(), Some("data:x".to_string()));
    let without = Recipe::restore("abc123xyz", details, None);

    assert_eq!(with_image.image_status(), ImageStatus::Success);
    assert_eq!(without.image_status(), ImageStatus::Error);
    assert_eq!(with_image.id(), "abc123xyz");
}

#[test]
fn test_empty_patch_is_a_no_op() {
    let recipe = Recipe::new(common::sample_details("Moscow Mule"));
    let mut patched = recipe.clone();
    patched.apply_patch(RecipePatch::default());
    assert_eq!(patched, recipe);

    patched.apply_patch(RecipePatch {
        cocktail_name: Some("Mula de Moscú".to_string()),
        ..Default::default()
    });
    assert_eq!(patched.name(), "Mula de Moscú");
    assert_eq!(patched.details.glassware, recipe.details.glassware);
    assert_eq!(patched.id(), recipe.id());
}

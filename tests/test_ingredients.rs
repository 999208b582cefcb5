use mcp_mixmaster::client::Language;
use mcp_mixmaster::ingredients::{translate_ingredient, Catalog, IngredientSet, CATALOG_EN, CATALOG_ES};
use pretty_assertions::assert_eq;

#[test]
fn test_catalogs_are_index_aligned() {
    let en = CATALOG_EN.all();
    let es = CATALOG_ES.all();
    assert_eq!(en.len(), es.len());
    for (english, spanish) in en.iter().zip(es.iter()) {
        assert_eq!(translate_ingredient(english, Language::En, Language::Es), *spanish);
        assert_eq!(translate_ingredient(spanish, Language::Es, Language::En), *english);
    }
}

#[test]
fn test_unknown_ingredient_is_kept() {
    assert_eq!(
        translate_ingredient("Ginger Beer", Language::En, Language::Es),
        "Ginger Beer"
    );
    assert_eq!(translate_ingredient("gin", Language::En, Language::Es), "Ginebra");
}

#[test]
fn test_random_starter_picks_one_per_group() {
    let starter = IngredientSet::random_starter(Language::En);
    let catalog = Catalog::for_language(Language::En);
    let items = starter.as_slice();

    assert_eq!(items.len(), 3);
    assert!(catalog.spirits.contains(&items[0].as_str()));
    assert!(catalog.mixers.contains(&items[1].as_str()));
    assert!(catalog.modifiers.contains(&items[2].as_str()));
}

#[test]
fn test_add_is_case_insensitive_and_trims() {
    let mut set = IngredientSet::new();
    assert!(set.add(" Vodka "));
    assert!(!set.add("vodka"));
    assert!(!set.add("   "));
    assert_eq!(set.as_slice(), &["Vodka".to_string()]);
}

#[test]
fn test_add_input_splits_on_commas() {
    let mut set = IngredientSet::from_iter(["Vodka"]);
    let added = set.add_input("vodka, Lime Juice,, Ginger Beer ");

    assert_eq!(added, vec!["Lime Juice", "Ginger Beer"]);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_remove_requires_exact_name() {
    let mut set: IngredientSet = ["Vodka", "Lime Juice"].into_iter().collect();

    assert!(!set.remove("vodka"));
    assert!(set.remove("Vodka"));
    assert_eq!(set.as_slice(), &["Lime Juice".to_string()]);
}

#[test]
fn test_translate_set() {
    let mut set: IngredientSet = ["Gin", "Tonic Water", "Ginger Beer"].into_iter().collect();

    set.translate(Language::En, Language::Es);
    assert_eq!(set.as_slice(), &["Ginebra", "Agua Tónica", "Ginger Beer"]);

    set.translate(Language::Es, Language::En);
    assert_eq!(set.as_slice(), &["Gin", "Tonic Water", "Ginger Beer"]);
}

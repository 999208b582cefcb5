//! The user's bar ingredients and the bilingual starter catalog.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::client::Language;

/// Starter catalog, grouped by role. English and Spanish lists are index-aligned.
pub struct Catalog {
    pub spirits: [&'static str; 6],
    pub mixers: [&'static str; 6],
    pub modifiers: [&'static str; 5],
}

pub const CATALOG_EN: Catalog = Catalog {
    spirits: ["Vodka", "Gin", "Rum", "Tequila", "Whiskey", "Brandy"],
    mixers: [
        "Lime Juice",
        "Lemon Juice",
        "Tonic Water",
        "Soda Water",
        "Orange Juice",
        "Simple Syrup",
    ],
    modifiers: ["Triple Sec", "Vermouth", "Bitters", "Mint Leaves", "Agave Nectar"],
};

pub const CATALOG_ES: Catalog = Catalog {
    spirits: ["Vodka", "Ginebra", "Ron", "Tequila", "Whisky", "Brandy"],
    mixers: [
        "Jugo de Lima",
        "Jugo de Limón",
        "Agua Tónica",
        "Agua con Gas",
        "Jugo de Naranja",
        "Jarabe Simple",
    ],
    modifiers: [
        "Triple Seco",
        "Vermut",
        "Amargo de Angostura",
        "Hojas de Menta",
        "Néctar de Agave",
    ],
};

impl Catalog {
    pub fn for_language(language: Language) -> &'static Catalog {
        match language {
            Language::En => &CATALOG_EN,
            Language::Es => &CATALOG_ES,
        }
    }

    /// All entries in a fixed order shared by both languages.
    pub fn all(&self) -> Vec<&'static str> {
        self.spirits
            .iter()
            .chain(self.mixers.iter())
            .chain(self.modifiers.iter())
            .copied()
            .collect()
    }
}

/// Maps a catalog ingredient between languages. Unknown names come back unchanged.
pub fn translate_ingredient(name: &str, from: Language, to: Language) -> String {
    if from == to {
        return name.to_string();
    }
    let wanted = name.to_lowercase();
    let source = Catalog::for_language(from).all();
    let target = Catalog::for_language(to).all();
    source
        .iter()
        .position(|entry| entry.to_lowercase() == wanted)
        .and_then(|index| target.get(index))
        .map(|entry| entry.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Ingredient names, unique ignoring case, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientSet {
    items: Vec<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One spirit, one mixer and one modifier picked at random from the catalog.
    pub fn random_starter(language: Language) -> Self {
        let catalog = Catalog::for_language(language);
        let mut rng = rand::rng();
        let mut set = Self::new();
        for group in [
            &catalog.spirits[..],
            &catalog.mixers[..],
            &catalog.modifiers[..],
        ] {
            if let Some(pick) = group.choose(&mut rng) {
                set.add(pick);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.items.iter().any(|i| i.to_lowercase() == wanted)
    }

    /// Adds a trimmed name unless it is blank or already present (ignoring case).
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.items.push(name.to_string());
        true
    }

    /// Adds each name, returning the ones actually added.
    pub fn add_many<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref().trim();
                self.add(name).then(|| name.to_string())
            })
            .collect()
    }

    /// Adds every entry of a comma-separated input line.
    pub fn add_input(&mut self, line: &str) -> Vec<String> {
        self.add_many(line.split(','))
    }

    /// Removes the entry equal to `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i != name);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces catalog entries with their equivalent in `to`.
    pub fn translate(&mut self, from: Language, to: Language) {
        let translated: Vec<String> = self
            .items
            .iter()
            .map(|i| translate_ingredient(i, from, to))
            .collect();
        self.items.clear();
        self.add_many(translated);
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_many(iter);
        set
    }
}

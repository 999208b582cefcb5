//! Prompts and response schemas for each AI call site.
//!
//! Schemas use the OpenAPI subset understood by `responseSchema`
//! (`"type": "ARRAY"`, `"OBJECT"`, `"STRING"`, `"BOOLEAN"`).

use serde_json::{json, Value};

use crate::client::types::{CocktailDetails, Language, Recipe};

/// Number of recipes requested per generation call.
pub const RECIPES_PER_BATCH: usize = 3;

/// Aspect ratio requested for cocktail images.
pub const IMAGE_ASPECT_RATIO: &str = "16:9";

/// Output format requested for cocktail images.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

pub fn recipes_prompt(ingredients: &[String], language: Language) -> String {
    format!(
        "You are an expert mixologist. Your task is to generate {count} unique cocktail recipes based on these ingredients: {ingredients}. Respond entirely in {language}.
- The first two recipes must STRICTLY use ONLY the provided ingredients.
- The third recipe can be more creative and add 1-2 common bar staples (like simple syrup, bitters, or a common garnish). For any added staple ingredient, set its 'isGarnish' property if it's a garnish.
- Be creative and ensure the cocktail names and descriptions are appealing.
- Provide all the information required by the JSON schema.",
        count = RECIPES_PER_BATCH,
        ingredients = ingredients.join(", "),
        language = language.name(),
    )
}

pub fn recipes_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "cocktailName": { "type": "STRING", "description": "The name of the cocktail." },
                "description": { "type": "STRING", "description": "A short, enticing description of the drink." },
                "prepTime": { "type": "STRING", "description": "Estimated preparation time, e.g., '5 minutes'." },
                "difficulty": { "type": "STRING", "description": "Difficulty, must be one of: 'Very Easy', 'Easy', 'Medium', 'Hard', 'Expert'." },
                "glassware": { "type": "STRING", "description": "The recommended type of glass, e.g., 'Martini glass'." },
                "garnish": { "type": "STRING", "description": "The suggested garnish, e.g., 'Orange peel twist'." },
                "flavorProfile": { "type": "STRING", "description": "The primary flavor profile, e.g., 'Sweet & Sour', 'Smoky & Strong'." },
                "ingredients": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "quantity": { "type": "STRING", "description": "The amount/measurement, e.g., '2 oz', '1/2 lime'." },
                            "name": { "type": "STRING", "description": "The name of the ingredient, e.g., 'Gin', 'Simple Syrup'." },
                            "isGarnish": { "type": "BOOLEAN", "description": "Set to true if this is primarily a garnish ingredient." }
                        },
                        "required": ["quantity", "name"]
                    }
                },
                "instructions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            },
            "required": [
                "cocktailName", "description", "prepTime", "difficulty", "glassware",
                "garnish", "flavorProfile", "ingredients", "instructions"
            ]
        }
    })
}

pub fn image_prompt(details: &CocktailDetails) -> String {
    format!(
        "A professional, moody, photorealistic image of a single cocktail named \"{name}\". This is a mixed beverage, do not interpret the name literally (e.g., as a landscape or object). The cocktail is perfectly served in a {glassware}. The garnish is {garnish}. The setting is a chic, dark, high-end night bar with subtle neon lighting in the background (pinks and blues), creating a sophisticated and modern ambiance. The image must be a close-up, sharp focus on ONLY the cocktail in its glass. Absolutely no people, hands, or other distracting objects.",
        name = details.cocktail_name,
        glassware = details.glassware,
        garnish = details.garnish,
    )
}

pub fn identify_prompt(language: Language) -> String {
    format!(
        "Analyze this image and identify all usable cocktail ingredients present (spirits, mixers, fruits, herbs). List only the names of the ingredients. Respond entirely in {}. The response must be a JSON array of strings.",
        language.name()
    )
}

pub fn ingredients_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "STRING",
            "description": "The name of an identified ingredient."
        }
    })
}

/// The translatable subset of a recipe, as sent to the model.
pub fn translatable_part(recipe: &Recipe) -> Value {
    let details = &recipe.details;
    json!({
        "cocktailName": details.cocktail_name,
        "description": details.description,
        "ingredients": details
            .ingredients
            .iter()
            .map(|i| json!({ "name": i.name, "quantity": i.quantity }))
            .collect::<Vec<_>>(),
        "instructions": details.instructions,
        "prepTime": details.prep_time,
        "difficulty": details.difficulty,
        "glassware": details.glassware,
        "garnish": details.garnish,
        "flavorProfile": details.flavor_profile,
    })
}

pub fn translation_prompt(recipe: &Recipe, target: Language, source: Language) -> String {
    let content = serde_json::to_string_pretty(&translatable_part(recipe)).unwrap_or_default();
    format!(
        "Translate the following cocktail content from {source} to {target}.
- Translate all text values, including ingredient names, quantities (e.g., 'oz', 'cup' to 'taza'), instructions, and time units (e.g., 'minutes' to 'minutos').
- For the 'difficulty' field, translate the value to its {target} equivalent. The possible English values are: 'Very Easy', 'Easy', 'Medium', 'Hard', 'Expert'. The Spanish equivalents are: 'Muy Fácil', 'Fácil', 'Medio', 'Difícil', 'Experto'.
- Respond ONLY with a JSON object matching the provided schema.

Content to translate:
{content}",
        source = source.name(),
        target = target.name(),
        content = content,
    )
}

pub fn translation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cocktailName": { "type": "STRING" },
            "description": { "type": "STRING" },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "quantity": { "type": "STRING" }
                    },
                    "required": ["name", "quantity"]
                }
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "prepTime": { "type": "STRING" },
            "difficulty": { "type": "STRING" },
            "glassware": { "type": "STRING" },
            "garnish": { "type": "STRING" },
            "flavorProfile": { "type": "STRING" }
        },
        "required": [
            "cocktailName", "description", "ingredients", "instructions", "prepTime",
            "difficulty", "glassware", "garnish", "flavorProfile"
        ]
    })
}

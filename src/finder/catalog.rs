use crate::finder::tokenizer::unique_tokens;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;
use tracing::debug;

/// Recipe record as it appears in the catalog document.
///
/// Every field is optional and loosely typed; [`normalize`] decides what
/// survives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecipe {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub ingredients: Value,
    #[serde(default)]
    pub steps: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub name: String,
    pub image: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(skip)]
    name_lower: String,
    #[serde(skip)]
    ingredient_tokens: Vec<String>,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        ingredients: Vec<String>,
        steps: Vec<String>,
    ) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        let ingredient_tokens = unique_tokens(ingredients.iter().map(String::as_str));

        Self {
            name,
            image: image.into(),
            ingredients,
            steps,
            name_lower,
            ingredient_tokens,
        }
    }

    pub fn name_lower(&self) -> &str {
        &self.name_lower
    }

    /// Distinct tokens across all ingredients, in first-appearance order
    pub fn ingredient_tokens(&self) -> &[String] {
        &self.ingredient_tokens
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Read-only, ordered recipe list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn get(&self, id: usize) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Recipes that can only ever match by name
    pub fn without_ingredients(&self) -> impl Iterator<Item = (usize, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.ingredient_tokens.is_empty())
    }
}

impl Deref for Catalog {
    type Target = [Recipe];

    fn deref(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl FromIterator<Recipe> for Catalog {
    fn from_iter<T: IntoIterator<Item = Recipe>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build a catalog from raw records without failing on missing or odd fields
pub fn normalize(raw: &[RawRecipe]) -> Catalog {
    raw.iter()
        .enumerate()
        .map(|(idx, record)| {
            let recipe = Recipe::new(
                coerce_string(&record.name),
                coerce_string(&record.image),
                coerce_list(&record.ingredients),
                coerce_list(&record.steps),
            );

            if recipe.ingredient_tokens.is_empty() {
                debug!(
                    "Recipe #{} ({:?}) has no ingredients and only matches by name",
                    idx, recipe.name
                );
            }

            recipe
        })
        .collect()
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn coerce_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

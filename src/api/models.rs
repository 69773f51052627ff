use crate::finder::{Recipe, ScoredRecipe};
use serde::{Deserialize, Serialize};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter at least one ingredient.";
pub const NO_RESULTS_MESSAGE: &str =
    "No recipes found. Try adding more ingredients or lowering the match percentage.";

/// Search request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Minimum match percentage; the configured default when absent
    pub min_match: Option<f64>,
}

/// Search response, tagged by outcome
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchResponse {
    Ok {
        results: Vec<RecipeCard>,
        total: usize,
        min_match: f64,
    },
    NoResults {
        message: String,
        min_match: f64,
    },
    EmptyQuery {
        message: String,
    },
}

/// Recipe card for search results
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCard {
    pub id: usize,
    pub name: String,
    pub image: String,
    #[serde(rename = "match")]
    pub match_percent: f64,
    pub match_rounded: u8,
}

impl From<&ScoredRecipe<'_>> for RecipeCard {
    fn from(scored: &ScoredRecipe<'_>) -> Self {
        Self {
            id: scored.id,
            name: scored.recipe.name.clone(),
            image: scored.recipe.image.clone(),
            match_percent: scored.match_percent,
            match_rounded: scored.rounded_percent(),
        }
    }
}

/// Full recipe details
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: usize,
    #[serde(flatten)]
    pub recipe: Recipe,
}

/// Catalog status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// "loading", "ready" or "failed"
    pub state: String,
    pub total_recipes: usize,
    pub recipes_without_ingredients: usize,
    pub loaded_at: Option<String>,
    pub error: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub catalog: String,
}

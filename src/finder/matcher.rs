use crate::finder::catalog::Recipe;
use std::collections::HashSet;

/// Match percentage of `recipe` for a query.
///
/// `raw_query` must already be trimmed and lowercased. A query contained in the
/// recipe name scores 100; otherwise the score is the share of the recipe's
/// distinct ingredient tokens found in `user_tokens`. Recipes without
/// ingredient tokens score 0.
pub fn score(recipe: &Recipe, user_tokens: &HashSet<String>, raw_query: &str) -> f64 {
    if !raw_query.is_empty() && recipe.name_lower().contains(raw_query) {
        return 100.0;
    }

    let recipe_tokens = recipe.ingredient_tokens();
    if recipe_tokens.is_empty() {
        return 0.0;
    }

    let matches = recipe_tokens
        .iter()
        .filter(|token| user_tokens.contains(*token))
        .count();

    (matches as f64 / recipe_tokens.len() as f64) * 100.0
}

use crate::error::{Error, Result};
use crate::finder::catalog::{Catalog, Recipe};
use crate::finder::matcher::score;
use crate::finder::tokenizer::token_set;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// User input prepared for matching
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Trimmed, lowercased input
    pub raw: String,
    pub tokens: HashSet<String>,
}

impl Query {
    pub fn parse(raw_input: &str) -> Self {
        let raw = raw_input.trim().to_lowercase();
        let tokens = token_set(&raw);
        Self { raw, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Minimum match percentage, always within `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    pub const NONE: Threshold = Threshold(0.0);

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&value) {
            return Err(Error::Validation(format!(
                "Minimum match must be between 0 and 100, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecipe<'a> {
    /// Position in the catalog
    pub id: usize,
    pub recipe: &'a Recipe,
    pub match_percent: f64,
}

impl ScoredRecipe<'_> {
    /// Percentage rounded for display
    pub fn rounded_percent(&self) -> u8 {
        self.match_percent.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Input had no usable tokens; nothing was searched
    EmptyQuery,
    /// Recipes at or above the threshold, best first. May be empty.
    Matches(Vec<ScoredRecipe<'a>>),
}

impl<'a> SearchOutcome<'a> {
    pub fn is_empty_query(&self) -> bool {
        matches!(self, SearchOutcome::EmptyQuery)
    }

    pub fn matches(&self) -> &[ScoredRecipe<'a>] {
        match self {
            SearchOutcome::EmptyQuery => &[],
            SearchOutcome::Matches(found) => found,
        }
    }
}

/// Score every recipe against `raw_input` and keep those reaching `threshold`.
///
/// Results are sorted by match descending; equal matches keep catalog order.
pub fn search<'a>(catalog: &'a Catalog, raw_input: &str, threshold: Threshold) -> SearchOutcome<'a> {
    let query = Query::parse(raw_input);

    if query.is_empty() {
        debug!("Search skipped: no tokens in {:?}", raw_input);
        return SearchOutcome::EmptyQuery;
    }

    let mut found: Vec<ScoredRecipe<'a>> = catalog
        .iter()
        .enumerate()
        .map(|(id, recipe)| ScoredRecipe {
            id,
            recipe,
            match_percent: score(recipe, &query.tokens, &query.raw),
        })
        .filter(|scored| scored.match_percent >= threshold.value())
        .collect();

    // sort_by is stable
    found.sort_by(|a, b| b.match_percent.total_cmp(&a.match_percent));

    debug!(
        "Search {:?} (min {}%): {} of {} recipes matched",
        query.raw,
        threshold.value(),
        found.len(),
        catalog.len()
    );

    SearchOutcome::Matches(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(
            name,
            "",
            ingredients.iter().map(|s| s.to_string()).collect(),
            vec![],
        )
    }

    fn names<'a>(outcome: &'a SearchOutcome<'_>) -> Vec<&'a str> {
        outcome
            .matches()
            .iter()
            .map(|s| s.recipe.name.as_str())
            .collect()
    }

    #[test]
    fn test_query_parse() {
        let query = Query::parse("  Eggs, MILK eggs ");
        assert_eq!(query.raw, "eggs, milk eggs");
        assert_eq!(query.tokens.len(), 2);
        assert!(query.tokens.contains("milk"));
        assert!(Query::parse(" /// ").is_empty());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(100.0).is_ok());
        assert!(Threshold::new(-0.5).is_err());
        assert!(Threshold::new(100.5).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // "egg" hits 1 of 2 tokens: exactly 50
        let catalog = Catalog::new(vec![recipe("Omelette", &["egg", "butter"])]);

        let at = search(&catalog, "egg", Threshold::new(50.0).unwrap());
        assert_eq!(names(&at), vec!["Omelette"]);
        assert_eq!(at.matches()[0].match_percent, 50.0);

        let above = search(&catalog, "egg", Threshold::new(50.01).unwrap());
        assert_eq!(above, SearchOutcome::Matches(vec![]));
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let catalog = Catalog::new(vec![
            recipe("Low", &["egg", "flour", "milk", "sugar"]),
            recipe("A", &["egg", "flour", "milk", "salt", "yeast"]),
            recipe("Full", &["egg"]),
            recipe("B", &["egg", "flour", "milk", "salt", "oil"]),
        ]);

        // Low: 75%, A: 80%, Full: 100%, B: 80%
        let outcome = search(&catalog, "egg flour milk salt", Threshold::NONE);
        assert_eq!(names(&outcome), vec!["Full", "A", "B", "Low"]);
        let ids: Vec<usize> = outcome.matches().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_whitespace_only_is_empty_query() {
        let catalog = Catalog::new(vec![recipe("Toast", &["bread"])]);
        assert!(search(&catalog, "   ", Threshold::NONE).is_empty_query());
        assert!(search(&catalog, " , / ", Threshold::NONE).is_empty_query());
    }

    #[test]
    fn test_no_results_is_not_empty_query() {
        let catalog = Catalog::new(vec![recipe("Toast", &["bread"])]);
        let outcome = search(&catalog, "caviar", Threshold::new(10.0).unwrap());
        assert!(!outcome.is_empty_query());
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn test_name_match_uses_trimmed_lowercase_input() {
        let catalog = Catalog::new(vec![recipe("Tomato Pasta", &["flour"])]);
        let outcome = search(&catalog, "  TOMATO Pasta ", Threshold::new(100.0).unwrap());
        assert_eq!(outcome.matches()[0].match_percent, 100.0);
    }

    #[test]
    fn test_search_is_idempotent() {
        let catalog = Catalog::new(vec![
            recipe("Soup", &["leek", "potato", "cream"]),
            recipe("Mash", &["potato", "butter", "milk"]),
        ]);
        let threshold = Threshold::NONE;

        let first = search(&catalog, "potato milk", threshold);
        let second = search(&catalog, "potato milk", threshold);
        assert_eq!(first, second);

        let bits = |o: &SearchOutcome<'_>| -> Vec<u64> {
            o.matches().iter().map(|s| s.match_percent.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_rounded_percent() {
        let r = recipe("x", &["a"]);
        let scored = ScoredRecipe {
            id: 0,
            recipe: &r,
            match_percent: 200.0 / 3.0,
        };
        assert_eq!(scored.rounded_percent(), 67);
    }
}

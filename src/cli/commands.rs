use crate::api::models::{EMPTY_QUERY_MESSAGE, NO_RESULTS_MESSAGE};
use crate::config::LoaderConfig;
use crate::finder::{search as run_search, Catalog, Recipe, ScoredRecipe, SearchOutcome, Threshold};
use crate::loader::load_catalog;
use crate::{Error, Result};
use std::fmt::Write as _;

/// Search the catalog and print ranked matches
pub async fn search(config: &LoaderConfig, query: &str, threshold: Threshold) -> Result<()> {
    let catalog = load_catalog(config).await?;
    print!("{}", render_outcome(&run_search(&catalog, query, threshold), threshold));
    Ok(())
}

/// Print a single recipe's ingredients and steps
pub async fn show(config: &LoaderConfig, key: &str) -> Result<()> {
    let catalog = load_catalog(config).await?;
    let (id, recipe) = find_recipe(&catalog, key)
        .ok_or_else(|| Error::NotFound(format!("No recipe matching {key:?}")))?;

    print!("{}", render_detail(id, recipe));
    Ok(())
}

/// Load the catalog and report recipes that can only match by name
pub async fn validate(config: &LoaderConfig) -> Result<()> {
    let catalog = load_catalog(config).await?;

    println!("✓ Catalog is valid: {} recipes", catalog.len());

    let unmatched: Vec<_> = catalog.without_ingredients().collect();
    if !unmatched.is_empty() {
        println!(
            "\n{} recipes have no ingredients and only match by name:",
            unmatched.len()
        );
        for (id, recipe) in unmatched {
            println!("  {:<5} {}", id, display_name(recipe));
        }
    }

    let unnamed = catalog.iter().filter(|r| r.name.is_empty()).count();
    if unnamed > 0 {
        println!("\n{unnamed} recipes have no name");
    }

    Ok(())
}

/// Look a recipe up by ID, exact name, then partial name (case-insensitive)
pub fn find_recipe<'a>(catalog: &'a Catalog, key: &str) -> Option<(usize, &'a Recipe)> {
    if let Ok(id) = key.trim().parse::<usize>() {
        if let Some(recipe) = catalog.get(id) {
            return Some((id, recipe));
        }
    }

    let needle = key.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    catalog
        .iter()
        .enumerate()
        .find(|(_, r)| r.name_lower() == needle)
        .or_else(|| {
            catalog
                .iter()
                .enumerate()
                .find(|(_, r)| r.name_lower().contains(&needle))
        })
}

pub fn render_outcome(outcome: &SearchOutcome<'_>, threshold: Threshold) -> String {
    match outcome {
        SearchOutcome::EmptyQuery => format!("⚠ {EMPTY_QUERY_MESSAGE}\n"),
        SearchOutcome::Matches(found) if found.is_empty() => format!("✗ {NO_RESULTS_MESSAGE}\n"),
        SearchOutcome::Matches(found) => render_results(found, threshold),
    }
}

fn render_results(found: &[ScoredRecipe<'_>], threshold: Threshold) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nFound {} recipes (minimum match {}%):\n",
        found.len(),
        threshold.value()
    );
    let _ = writeln!(out, "{:<5} {:<50} {:>6}", "ID", "Name", "Match");
    let _ = writeln!(out, "{}", "-".repeat(63));

    for scored in found {
        let _ = writeln!(
            out,
            "{:<5} {:<50} {:>5}%",
            scored.id,
            truncate(display_name(scored.recipe), 48),
            scored.rounded_percent()
        );
    }

    let _ = writeln!(out, "\nTo see a recipe: recipe-finder show <ID>");
    out
}

pub fn render_detail(id: usize, recipe: &Recipe) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{} (#{id})", display_name(recipe));
    if !recipe.image.is_empty() {
        let _ = writeln!(out, "Image: {}", recipe.image);
    }

    let _ = writeln!(out, "\nIngredients:");
    if recipe.ingredients.is_empty() {
        let _ = writeln!(out, "  (none listed)");
    }
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  • {ingredient}");
    }

    let _ = writeln!(out, "\nSteps:");
    if recipe.steps.is_empty() {
        let _ = writeln!(out, "  (none listed)");
    }
    for (n, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", n + 1);
    }

    out
}

fn display_name(recipe: &Recipe) -> &str {
    if recipe.name.is_empty() {
        "(unnamed)"
    } else {
        &recipe.name
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Recipe::new(
                "Tomato Pasta",
                "",
                vec!["tomato".into(), "pasta".into()],
                vec!["Boil".into(), "Mix".into()],
            ),
            Recipe::new("Pasta", "", vec!["pasta".into()], vec![]),
            Recipe::new("", "", vec![], vec![]),
        ])
    }

    #[test]
    fn test_find_recipe_by_id_and_name() {
        let catalog = catalog();
        assert_eq!(find_recipe(&catalog, "0").map(|(id, _)| id), Some(0));
        // Exact name wins over an earlier partial match
        assert_eq!(find_recipe(&catalog, "PASTA").map(|(id, _)| id), Some(1));
        assert_eq!(find_recipe(&catalog, "tomato").map(|(id, _)| id), Some(0));
        assert!(find_recipe(&catalog, "curry").is_none());
        assert!(find_recipe(&catalog, "  ").is_none());
    }

    #[test]
    fn test_render_outcome_messages() {
        let catalog = catalog();

        let empty = run_search(&catalog, " ", Threshold::NONE);
        assert!(render_outcome(&empty, Threshold::NONE).contains(EMPTY_QUERY_MESSAGE));

        let threshold = Threshold::new(90.0).unwrap();
        let none = run_search(&catalog, "rice", threshold);
        assert!(render_outcome(&none, threshold).contains(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_render_results_table() {
        let catalog = catalog();
        let outcome = run_search(&catalog, "tomato", Threshold::NONE);
        let text = render_outcome(&outcome, Threshold::NONE);

        assert!(text.contains("Found 3 recipes"));
        assert!(text.contains("Tomato Pasta"));
        assert!(text.contains("100%"));
        assert!(text.contains("(unnamed)"));
    }

    #[test]
    fn test_render_detail() {
        let catalog = catalog();
        let text = render_detail(0, &catalog[0]);
        assert!(text.contains("Tomato Pasta (#0)"));
        assert!(text.contains("  • tomato"));
        assert!(text.contains("  2. Mix"));

        let text = render_detail(2, &catalog[2]);
        assert!(text.contains("(unnamed) (#2)"));
        assert!(text.contains("(none listed)"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("crème brûlée", 20), "crème brûlée");
        assert_eq!(truncate("crème brûlée", 8), "crème...");
    }
}

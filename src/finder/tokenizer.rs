use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Runs of whitespace, commas, slashes, hyphens and parentheses
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,/()\-]+").expect("delimiter pattern is valid"));

/// Split free text into lowercase word tokens.
///
/// Tokens come out in the order they appear in the input; duplicates are kept.
/// Empty input, or input made only of delimiters, yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    DELIMITERS
        .split(&lower)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Tokenize and collapse into a set
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Tokenize every text and union the results, keeping first-appearance order
pub fn unique_tokens<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for text in texts {
        for token in tokenize(text) {
            if seen.insert(token.clone()) {
                tokens.push(token);
            }
        }
    }

    tokens
}

// Recipe matching core
// Tokenizing, catalog normalization, scoring and the search pipeline

pub mod catalog;
pub mod matcher;
pub mod search;
pub mod session;
pub mod tokenizer;

// Re-exports
pub use catalog::{normalize, Catalog, RawRecipe, Recipe};
pub use matcher::score;
pub use search::{search, Query, ScoredRecipe, SearchOutcome, Threshold};
pub use session::{CatalogEvents, CatalogState, Session, SharedSession};
pub use tokenizer::{token_set, tokenize, unique_tokens};

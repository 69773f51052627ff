pub mod config;
pub mod error;

// Matching core
pub mod finder;

// Catalog loading
pub mod loader;

// Presentation layers
pub mod api;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};

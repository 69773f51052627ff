// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-finder")]
#[command(about = "Recipe Finder - match recipes against the ingredients you have", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Find recipes matching a list of ingredients or a recipe name
    Search {
        /// Ingredients separated by commas or spaces, or a recipe name
        query: String,

        /// Minimum match percentage (0-100)
        #[arg(short, long)]
        min_match: Option<f64>,

        /// Catalog file path or URL
        #[arg(short, long, env = "CATALOG_SOURCE")]
        catalog: Option<String>,
    },

    /// Show ingredients and steps of one recipe
    Show {
        /// Recipe ID or name
        recipe: String,

        /// Catalog file path or URL
        #[arg(short, long, env = "CATALOG_SOURCE")]
        catalog: Option<String>,
    },

    /// Load the catalog and report problems
    Validate {
        /// Catalog file path or URL
        #[arg(short, long, env = "CATALOG_SOURCE")]
        catalog: Option<String>,
    },
}

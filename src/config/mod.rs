use crate::error::{Error, Result};
use crate::finder::search::Threshold;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub loader: LoaderConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// File path or http(s) URL of the catalog document
    pub source: String,
    pub max_catalog_size: usize,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_min_match: f64,
}

impl SearchConfig {
    pub fn default_threshold(&self) -> Result<Threshold> {
        Threshold::new(self.default_min_match)
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let source =
            std::env::var("CATALOG_SOURCE").unwrap_or_else(|_| "recipes.json".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Settings {
            server: ServerConfig {
                host,
                port: env_or("PORT", "3000")?,
                api_rate_limit: env_or("API_RATE_LIMIT", "100")?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "1048576")?,
            },
            loader: LoaderConfig {
                source,
                max_catalog_size: env_or("MAX_CATALOG_SIZE", "5242880")?,
                timeout_seconds: env_or("FETCH_TIMEOUT", "30")?,
                max_retries: env_or("FETCH_MAX_RETRIES", "3")?,
                user_agent: format!("Recipe-Finder/{}", env!("CARGO_PKG_VERSION")),
            },
            search: SearchConfig {
                default_min_match: env_or("DEFAULT_MIN_MATCH", "50")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.loader.source.trim().is_empty() {
            return Err(Error::Config("CATALOG_SOURCE must not be empty".to_string()));
        }

        if self.loader.max_catalog_size == 0 {
            return Err(Error::Config(
                "Maximum catalog size must be non-zero".to_string(),
            ));
        }

        if self.loader.timeout_seconds == 0 {
            return Err(Error::Config("FETCH_TIMEOUT must be non-zero".to_string()));
        }

        self.search
            .default_threshold()
            .map_err(|_| Error::Config("DEFAULT_MIN_MATCH must be between 0 and 100".to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_rate_limit: 100,
            max_request_body_size: 1048576,
        },
        loader: LoaderConfig {
            source: "tests/fixtures/recipes.json".to_string(),
            max_catalog_size: 5242880,
            timeout_seconds: 5,
            max_retries: 0,
            user_agent: "test".to_string(),
        },
        search: SearchConfig {
            default_min_match: 50.0,
        },
    }
}

// Catalog loading
// Reads the recipe document from disk or over HTTP and normalizes it

pub mod fetcher;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::finder::catalog::{normalize, Catalog, RawRecipe};
use crate::finder::session::SharedSession;
use crate::utils::resolve_image_url;
use fetcher::{check_size, Fetcher};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Where the catalog document lives
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    Remote(Url),
}

impl CatalogSource {
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(Error::Config("Catalog source must not be empty".to_string()));
        }

        let lower = source.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(CatalogSource::Remote(Url::parse(source)?))
        } else {
            Ok(CatalogSource::File(PathBuf::from(source)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Fetch, parse and normalize the catalog.
///
/// Every failure comes back as [`Error::CatalogLoad`].
pub async fn load_catalog(config: &LoaderConfig) -> Result<Catalog> {
    let source = CatalogSource::parse(&config.source)
        .map_err(|e| Error::CatalogLoad(e.log_safe()))?;
    info!("Loading catalog from {}", source);

    let content = match &source {
        CatalogSource::File(path) => read_file(path, config.max_catalog_size).await,
        CatalogSource::Remote(url) => fetch_remote(url, config).await,
    }
    .map_err(into_load_error)?;

    let mut catalog = parse_catalog(&content)?;

    if let CatalogSource::Remote(url) = &source {
        catalog = resolve_images(catalog, url);
    }

    info!(
        "Catalog ready: {} recipes ({} without ingredients)",
        catalog.len(),
        catalog.without_ingredients().count()
    );
    Ok(catalog)
}

/// Load the catalog and report the result to a shared session
pub async fn load_into(session: &SharedSession, config: &LoaderConfig) {
    let result = load_catalog(config).await;
    session.finish_load(result).await;
}

/// Parse a catalog document: a JSON array of recipe records
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| Error::CatalogLoad(format!("Invalid JSON: {e}")))?;

    if !value.is_array() {
        return Err(Error::CatalogLoad(
            "Catalog must be a JSON array of recipes".to_string(),
        ));
    }

    let raw: Vec<RawRecipe> = serde_json::from_value(value)
        .map_err(|e| Error::CatalogLoad(format!("Invalid recipe record: {e}")))?;
    debug!("Parsed {} raw recipe records", raw.len());

    Ok(normalize(&raw))
}

async fn fetch_remote(url: &Url, config: &LoaderConfig) -> Result<String> {
    Fetcher::new(config)?.fetch(url.as_str()).await
}

async fn read_file(path: &Path, max_size: usize) -> Result<String> {
    let metadata = tokio::fs::metadata(path).await?;
    check_size(metadata.len() as usize, max_size)?;

    let bytes = tokio::fs::read(path).await?;
    check_size(bytes.len(), max_size)?;

    String::from_utf8(bytes)
        .map_err(|e| Error::CatalogLoad(format!("Invalid UTF-8 in {}: {e}", path.display())))
}

fn resolve_images(catalog: Catalog, base: &Url) -> Catalog {
    catalog
        .iter()
        .cloned()
        .map(|recipe| {
            if recipe.image.is_empty() {
                return recipe;
            }
            match resolve_image_url(&recipe.image, base.as_str()) {
                Some(resolved) => recipe.with_image(resolved),
                None => recipe,
            }
        })
        .collect()
}

fn into_load_error(err: Error) -> Error {
    match err {
        Error::CatalogLoad(_) => err,
        Error::Io(e) => Error::CatalogLoad(format!("Could not read catalog: {e}")),
        other => Error::CatalogLoad(other.log_safe()),
    }
}

use crate::error::{Error, Result};
use crate::finder::catalog::{Catalog, Recipe};
use crate::finder::search::{search, SearchOutcome, Threshold};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Notifications emitted when the catalog load settles
pub trait CatalogEvents {
    fn on_catalog_loaded(&mut self, catalog: Catalog);
    fn on_catalog_load_failed(&mut self, error: &Error);
}

#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    NotLoaded,
    Loaded {
        catalog: Arc<Catalog>,
        loaded_at: DateTime<Utc>,
    },
    LoadFailed {
        message: String,
    },
}

/// Owns the catalog for the lifetime of a session.
///
/// Searches are rejected until the catalog has loaded. Once loaded the
/// catalog never changes.
#[derive(Debug, Default)]
pub struct Session {
    state: CatalogState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CatalogState::Loaded { .. })
    }

    /// Loaded catalog, or the reason searching is unavailable
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        match &self.state {
            CatalogState::Loaded { catalog, .. } => Ok(Arc::clone(catalog)),
            CatalogState::NotLoaded => Err(Error::CatalogNotLoaded),
            CatalogState::LoadFailed { message } => Err(Error::CatalogLoad(message.clone())),
        }
    }

    pub fn search<'a>(
        &'a self,
        raw_input: &str,
        threshold: Threshold,
    ) -> Result<SearchOutcome<'a>> {
        match &self.state {
            CatalogState::Loaded { catalog, .. } => Ok(search(catalog, raw_input, threshold)),
            CatalogState::NotLoaded => Err(Error::CatalogNotLoaded),
            CatalogState::LoadFailed { message } => Err(Error::CatalogLoad(message.clone())),
        }
    }

    /// Detail lookup by catalog position
    pub fn recipe(&self, id: usize) -> Result<&Recipe> {
        match &self.state {
            CatalogState::Loaded { catalog, .. } => catalog
                .get(id)
                .ok_or_else(|| Error::NotFound(format!("Recipe {id} not found"))),
            CatalogState::NotLoaded => Err(Error::CatalogNotLoaded),
            CatalogState::LoadFailed { message } => Err(Error::CatalogLoad(message.clone())),
        }
    }
}

impl CatalogEvents for Session {
    fn on_catalog_loaded(&mut self, catalog: Catalog) {
        if self.is_loaded() {
            warn!("Ignoring catalog load: catalog already loaded for this session");
            return;
        }

        info!("Catalog loaded: {} recipes", catalog.len());
        self.state = CatalogState::Loaded {
            catalog: Arc::new(catalog),
            loaded_at: Utc::now(),
        };
    }

    fn on_catalog_load_failed(&mut self, err: &Error) {
        if self.is_loaded() {
            warn!("Ignoring load failure: catalog already loaded for this session");
            return;
        }

        let message = match err {
            Error::CatalogLoad(msg) => msg.clone(),
            other => other.log_safe(),
        };
        error!("Catalog load failed: {}", message);
        self.state = CatalogState::LoadFailed { message };
    }
}

/// Session shared between request handlers and the background loader
#[derive(Debug, Clone, Default)]
pub struct SharedSession(Arc<RwLock<Session>>);

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> CatalogState {
        self.0.read().await.state().clone()
    }

    pub async fn catalog(&self) -> Result<Arc<Catalog>> {
        self.0.read().await.catalog()
    }

    /// Apply the outcome of a catalog load through the session's [`CatalogEvents`]
    pub async fn finish_load(&self, result: Result<Catalog>) {
        let mut session = self.0.write().await;
        match result {
            Ok(catalog) => session.on_catalog_loaded(catalog),
            Err(e) => session.on_catalog_load_failed(&e),
        }
    }
}

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::debug;

use crate::{
    api::models::*,
    config::Settings,
    finder::{search, CatalogState, SearchOutcome, SharedSession, Threshold},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub settings: Settings,
}

/// GET /api/search - Match recipes against a list of ingredients or a name
pub async fn search_recipes(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(params) = params.map_err(|e| Error::Validation(e.body_text()))?;
    debug!("Search request: {:?}", params);

    let threshold = match params.min_match {
        Some(value) => Threshold::new(value)?,
        None => state.settings.search.default_threshold()?,
    };

    // Release the lock before searching; the catalog is immutable
    let catalog = state.session.catalog().await?;

    let response = match search(&catalog, &params.q, threshold) {
        SearchOutcome::EmptyQuery => SearchResponse::EmptyQuery {
            message: EMPTY_QUERY_MESSAGE.to_string(),
        },
        SearchOutcome::Matches(found) if found.is_empty() => SearchResponse::NoResults {
            message: NO_RESULTS_MESSAGE.to_string(),
            min_match: threshold.value(),
        },
        SearchOutcome::Matches(found) => SearchResponse::Ok {
            total: found.len(),
            results: found.iter().map(RecipeCard::from).collect(),
            min_match: threshold.value(),
        },
    };

    Ok(Json(response))
}

/// GET /api/recipes/:id - Get recipe details
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> Result<Json<RecipeDetail>> {
    debug!("Get recipe request: {}", id);

    let catalog = state.session.catalog().await?;
    let recipe = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Recipe {id} not found")))?;

    Ok(Json(RecipeDetail { id, recipe }))
}

/// GET /api/status - Catalog load state
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    let status = match state.session.state().await {
        CatalogState::NotLoaded => StatusResponse {
            state: "loading".to_string(),
            total_recipes: 0,
            recipes_without_ingredients: 0,
            loaded_at: None,
            error: None,
        },
        CatalogState::Loaded { catalog, loaded_at } => StatusResponse {
            state: "ready".to_string(),
            total_recipes: catalog.len(),
            recipes_without_ingredients: catalog.without_ingredients().count(),
            loaded_at: Some(loaded_at.to_rfc3339()),
            error: None,
        },
        CatalogState::LoadFailed { message } => StatusResponse {
            state: "failed".to_string(),
            total_recipes: 0,
            recipes_without_ingredients: 0,
            loaded_at: None,
            error: Some(format!("Recipes could not be loaded: {message}")),
        },
    };

    Ok(Json(status))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let (ready, catalog) = match state.session.state().await {
        CatalogState::NotLoaded => (false, "loading"),
        CatalogState::Loaded { .. } => (true, "ok"),
        CatalogState::LoadFailed { .. } => (false, "error"),
    };

    Ok(Json(ReadinessResponse {
        ready,
        catalog: catalog.to_string(),
    }))
}

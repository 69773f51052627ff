use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

#[cfg(not(test))]
use {
    axum::extract::ConnectInfo,
    std::net::IpAddr,
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;

/// Create the router with all endpoints
#[cfg_attr(test, allow(unused_variables))]
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    // Public API routes - read-only
    #[cfg_attr(test, allow(unused_mut))]
    let mut api_routes = Router::new()
        .route("/search", get(api_handlers::search_recipes))
        .route("/recipes/:id", get(api_handlers::get_recipe))
        .route("/status", get(api_handlers::get_status))
        .with_state(state.clone());

    // Rate limiting is skipped in tests, where requests carry no peer address
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> Result<Self::Key, tower_governor::GovernorError> {
                if let Some(ConnectInfo(addr)) =
                    req.extensions().get::<ConnectInfo<std::net::SocketAddr>>()
                {
                    return Ok(addr.ip());
                }

                Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
            }
        }

        let per_second = settings.server.api_rate_limit.max(1);
        let burst = u32::try_from(per_second.saturating_mul(2)).unwrap_or(u32::MAX);

        match GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(per_second)
            .burst_size(burst)
            .finish()
        {
            Some(config) => {
                api_routes = api_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!("Invalid rate limit configuration, rate limiting disabled"),
        }
    }

    let api_routes = api_routes;

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.server.max_request_body_size,
        ))
        .layer(
            // CORS - allow all origins for the read-only API
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::{Catalog, Recipe, SharedSession};
    use crate::Error;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            session: SharedSession::new(),
            settings: crate::config::test_settings(),
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Recipe::new(
                "Tomato Pasta",
                "img/pasta.jpg",
                vec!["tomato".into(), "pasta".into(), "cheese".into()],
                vec!["Boil pasta".into(), "Add sauce".into()],
            ),
            Recipe::new("Cheese Toast", "", vec!["bread".into(), "cheese".into()], vec![]),
        ])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_unavailable_before_load() {
        let state = test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = get_json(app, "/api/search?q=cheese").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_search_after_load() {
        let state = test_state();
        state.session.finish_load(Ok(sample_catalog())).await;
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = get_json(app, "/api/search?q=cheese,%20bread&min_match=0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["total"], 2);
        assert_eq!(body["results"][0]["name"], "Cheese Toast");
        assert_eq!(body["results"][0]["match"], 100.0);
        assert_eq!(body["results"][1]["match_rounded"], 33);
    }

    #[tokio::test]
    async fn test_search_outcomes_are_distinct() {
        let state = test_state();
        state.session.finish_load(Ok(sample_catalog())).await;

        let app = create_router(state.clone(), &state.settings);
        let (status, body) = get_json(app, "/api/search?q=%20%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "empty_query");

        let app = create_router(state.clone(), &state.settings);
        let (_, body) = get_json(app, "/api/search?q=caviar").await;
        assert_eq!(body["status"], "no_results");
        assert_eq!(body["min_match"], 50.0);
    }

    #[tokio::test]
    async fn test_invalid_min_match() {
        let state = test_state();
        state.session.finish_load(Ok(sample_catalog())).await;
        let app = create_router(state.clone(), &state.settings);

        let (status, _) = get_json(app, "/api/search?q=cheese&min_match=150").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_min_match_is_json_error() {
        let state = test_state();
        state.session.finish_load(Ok(sample_catalog())).await;
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = get_json(app, "/api/search?q=cheese&min_match=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("query string"));
    }

    #[tokio::test]
    async fn test_recipe_detail() {
        let state = test_state();
        state.session.finish_load(Ok(sample_catalog())).await;

        let app = create_router(state.clone(), &state.settings);
        let (status, body) = get_json(app, "/api/recipes/0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 0);
        assert_eq!(body["name"], "Tomato Pasta");
        assert_eq!(body["steps"][1], "Add sauce");

        let app = create_router(state.clone(), &state.settings);
        let (status, _) = get_json(app, "/api/recipes/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_and_readiness() {
        let state = test_state();

        let app = create_router(state.clone(), &state.settings);
        let (_, body) = get_json(app, "/api/status").await;
        assert_eq!(body["state"], "loading");

        state
            .session
            .finish_load(Err(Error::CatalogLoad("HTTP 500".to_string())))
            .await;

        let app = create_router(state.clone(), &state.settings);
        let (_, body) = get_json(app, "/api/status").await;
        assert_eq!(body["state"], "failed");
        assert_eq!(body["error"], "Recipes could not be loaded: HTTP 500");

        let app = create_router(state.clone(), &state.settings);
        let (_, body) = get_json(app, "/ready").await;
        assert_eq!(body["ready"], false);
    }

    #[tokio::test]
    async fn test_health_route() {
        let state = test_state();
        let app = create_router(state.clone(), &state.settings);

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}

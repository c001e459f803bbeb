//! API layer - HTTP entry points.

pub mod http;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::App;

/// Full router with tracing and, when configured, CORS.
pub fn router(app: Arc<App>) -> Router {
    let cors = build_cors_layer(app.config.cors_allowed_origins.as_deref());
    let mut router = http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors {
        router = router.layer(cors);
    }
    router
}

/// CORS layer for a comma-separated origin list, or any origin for `*`.
///
/// Returns `None` when nothing usable is configured.
pub fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // Game clients post JSON, which triggers CORS preflights.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_disabled_without_origins() {
        assert!(build_cors_layer(None).is_none());
        assert!(build_cors_layer(Some("  ")).is_none());
        assert!(build_cors_layer(Some(" , ")).is_none());
    }

    #[test]
    fn cors_enabled_for_wildcard_and_lists() {
        assert!(build_cors_layer(Some("*")).is_some());
        assert!(build_cors_layer(Some("http://localhost:3000, http://game.local")).is_some());
    }
}

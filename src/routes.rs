//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                      - Health check (not rate limited)
//! - `POST /create-payment-order`        - Checkout sessions
//! - `POST /api/domain/*`                - Custom-domain verification
//! - `POST /analyze-meal-image`          - Meal photo analysis
//!
//! # Middleware
//!
//! - **CORS** - Any origin; the endpoints are called from browser storefronts
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, RateLimitError};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// # Errors
///
/// Returns [`RateLimitError`] if the rate limiter cannot be configured.
pub fn app_router(state: AppState, behind_proxy: bool) -> Result<NormalizePath<Router>, RateLimitError> {
    let api_router = if behind_proxy {
        api::routes::routes().layer(rate_limit::proxy_layer()?)
    } else {
        api::routes::routes().layer(rate_limit::layer()?)
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api_router)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with per-dependency checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always answers 200 while the process is up; `status` is `degraded`
/// when a credential is missing or the credential store is unreachable.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "payments": { "status": "ok", "message": "Stripe key configured" },
///     "vision": { "status": "ok", "message": "OpenAI key configured" },
///     "credential_store": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let payments = if state.checkout_service.is_configured() {
        CheckStatus::ok("Stripe key configured")
    } else {
        CheckStatus::error("Stripe key not configured")
    };

    let vision = if state.meal_service.is_configured() {
        CheckStatus::ok("OpenAI key configured")
    } else {
        CheckStatus::error("OpenAI key not configured")
    };

    let credential_store = if state.credential_store.health_check().await {
        CheckStatus::ok("Reachable")
    } else {
        CheckStatus::error("Connection failed")
    };

    let all_healthy = payments.is_ok() && vision.is_ok() && credential_store.is_ok();

    Json(HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            payments,
            vision,
            credential_store,
        },
    })
}

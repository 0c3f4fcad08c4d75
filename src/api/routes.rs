//! API route configuration.

use crate::api::handlers::{
    analyze_meal_image_handler, check_dns_handler, create_payment_order_handler,
    generate_cname_handler, verify_domain_handler,
};
use crate::state::AppState;
use axum::{Router, routing::post};

/// All public API routes, without middleware.
///
/// # Endpoints
///
/// - `POST /create-payment-order`        - Create a hosted checkout session
/// - `POST /api/domain/verify`           - Resolve a domain and list its records
/// - `POST /api/domain/check-dns`        - Check a store's CNAME configuration
/// - `POST /api/domain/generate-cname`   - Generate a store's CNAME record
/// - `POST /analyze-meal-image`          - Analyze a meal photo
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-order", post(create_payment_order_handler))
        .route("/api/domain/verify", post(verify_domain_handler))
        .route("/api/domain/check-dns", post(check_dns_handler))
        .route("/api/domain/generate-cname", post(generate_cname_handler))
        .route("/analyze-meal-image", post(analyze_meal_image_handler))
}

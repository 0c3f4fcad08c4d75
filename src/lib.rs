//! # goodiex-api
//!
//! Thin JSON endpoints that Goodiex storefronts call to reach third-party
//! services: Stripe Checkout, DNS verification of custom store domains, and
//! meal photo analysis with an OpenAI vision model.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, port traits and the model response normalizer
//! - **Application Layer** ([`application`]) - Services and reloadable API credentials
//! - **Infrastructure Layer** ([`infrastructure`]) - Stripe, DNS, OpenAI and Redis adapters
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export STRIPE_SECRET_KEY="sk_test_..."
//! export OPENAI_API_KEY="sk-..."
//! export REDIS_URL="redis://localhost:6379"  # Optional credential store
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::credentials::ApiCredential;
    pub use crate::application::services::{
        CheckoutService, CheckoutUrls, DomainVerificationService, MealAnalysisService,
    };
    pub use crate::domain::ports::{CredentialStore, DnsLookup, PaymentGateway, VisionModel};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}

//! Application layer: services and the credentials they run with.
//!
//! Services depend only on the port traits in [`crate::domain::ports`], so
//! handlers and tests can wire them to real adapters or fakes.
//!
//! # Available Services
//!
//! - [`services::CheckoutService`] - hosted checkout sessions
//! - [`services::DomainVerificationService`] - custom-domain DNS checks
//! - [`services::MealAnalysisService`] - meal photo analysis

pub mod credentials;
pub mod services;

//! Infrastructure layer for external integrations.
//!
//! This layer implements the ports defined by the domain layer, providing
//! concrete clients for the services the API proxies.
//!
//! # Modules
//!
//! - [`credentials`] - API key stores (Redis and no-op implementations)
//! - [`dns`] - System resolver and hickory DNS record lookups
//! - [`payments`] - Stripe Checkout gateway
//! - [`vision`] - OpenAI-compatible vision model client

pub mod credentials;
pub mod dns;
pub mod payments;
pub mod vision;

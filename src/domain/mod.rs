//! Domain layer containing business entities and logic.
//!
//! This module holds everything that does not depend on a particular
//! provider, framework or transport.
//!
//! # Architecture
//!
//! - [`entities`] - Checkout, DNS and meal-analysis data structures
//! - [`ports`] - Traits for the payment provider, DNS, vision model and credential store
//! - [`response_normalizer`] - Repairs vision-model text into a JSON analysis
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Port traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod ports;
pub mod response_normalizer;

//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs use Serde for deserialization and validator where field
//! rules are declarative. Response DTOs are built from domain entities.

pub mod domain;
pub mod health;
pub mod meal;
pub mod payment;

//! Utility functions shared by services and handlers.
//!
//! - [`domain_name`] - Domain syntax validation and DNS name comparison
//! - [`urls`] - URL scheme checks and query-string construction
//! - [`secrets`] - Masking secrets for logs and terminal output

pub mod domain_name;
pub mod secrets;
pub mod urls;

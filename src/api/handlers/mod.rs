//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod domain;
pub mod health;
pub mod meal;
pub mod payment;

pub use domain::{check_dns_handler, generate_cname_handler, verify_domain_handler};
pub use health::health_handler;
pub use meal::analyze_meal_image_handler;
pub use payment::create_payment_order_handler;

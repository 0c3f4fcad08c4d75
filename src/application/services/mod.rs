//! Services orchestrating the domain ports.

pub mod checkout_service;
pub mod domain_verification_service;
pub mod meal_analysis_service;

pub use checkout_service::{CheckoutService, CheckoutUrls};
pub use domain_verification_service::DomainVerificationService;
pub use meal_analysis_service::{AnalysisFailure, MealAnalysisService, MealImage};

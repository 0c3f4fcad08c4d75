//! Shared application state for request handlers.

use crate::application::services::{CheckoutService, DomainVerificationService, MealAnalysisService};
use crate::domain::ports::CredentialStore;
use std::sync::Arc;

/// Services and collaborators shared by all handlers.
///
/// Cloned per request; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub checkout_service: Arc<CheckoutService>,
    pub domain_service: Arc<DomainVerificationService>,
    pub meal_service: Arc<MealAnalysisService>,
    pub credential_store: Arc<dyn CredentialStore>,
}

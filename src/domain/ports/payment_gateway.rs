//! Port for the hosted-checkout payment provider.

use crate::domain::entities::{CheckoutSession, NewCheckoutSession};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The provider rejected the request (bad key, invalid parameters, ...).
    #[error("{message}")]
    Provider {
        status: u16,
        message: String,
    },

    /// The provider could not be reached.
    #[error("Payment provider request failed: {0}")]
    Transport(String),

    /// The provider answered with something other than a session.
    #[error("Unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// Creates hosted checkout sessions.
///
/// # Implementations
///
/// - [`crate::infrastructure::payments::StripeGateway`] - Stripe Checkout REST API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a checkout session authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] when the provider is unreachable or rejects
    /// the request.
    async fn create_checkout_session(
        &self,
        api_key: &str,
        session: &NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentError>;
}

//! Stripe Checkout over the Stripe REST API.

use crate::domain::entities::{CheckoutSession, NewCheckoutSession};
use crate::domain::ports::{PaymentError, PaymentGateway};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Creates Checkout Sessions with `POST /v1/checkout/sessions`.
///
/// Stripe takes form-encoded bodies with bracketed keys for nested fields,
/// e.g. `line_items[0][price_data][currency]=usd`.
pub struct StripeGateway {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

impl StripeGateway {
    /// Creates a gateway talking to `api_base` (normally [`DEFAULT_STRIPE_API_BASE`]).
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }
}

/// Flattens a session into Stripe's bracketed form fields.
pub(crate) fn form_fields(session: &NewCheckoutSession) -> Vec<(&'static str, String)> {
    vec![
        ("payment_method_types[0]", "card".to_string()),
        (
            "line_items[0][price_data][currency]",
            session.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            session.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            session.unit_amount.to_string(),
        ),
        ("line_items[0][quantity]", session.quantity.to_string()),
        ("mode", "payment".to_string()),
        ("success_url", session.success_url.clone()),
        ("cancel_url", session.cancel_url.clone()),
        ("customer_email", session.customer_email.clone()),
    ]
}

fn error_message(body: &Value) -> String {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .unwrap_or("Stripe request failed")
        .to_string()
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        api_key: &str,
        session: &NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentError> {
        debug!(
            currency = %session.currency,
            unit_amount = session.unit_amount,
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(self.sessions_url())
            .bearer_auth(api_key)
            .form(&form_fields(session))
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), "Stripe rejected checkout session: {}", message);
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SessionResponse = serde_json::from_value(body)
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let url = parsed.url.ok_or_else(|| {
            PaymentError::InvalidResponse(format!("session {} has no hosted URL", parsed.id))
        })?;

        debug!(session_id = %parsed.id, "Stripe checkout session created");

        Ok(CheckoutSession { id: parsed.id, url })
    }
}

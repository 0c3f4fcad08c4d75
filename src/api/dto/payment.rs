//! DTOs for checkout session creation.

use crate::domain::entities::CheckoutOrder;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, json};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use std::borrow::Cow;
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// An order total: the parsed amount plus the text the client sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Number")]
pub struct Amount {
    pub value: f64,
    pub raw: String,
}

impl From<Number> for Amount {
    fn from(number: Number) -> Self {
        Self {
            value: number.as_f64().unwrap_or(f64::NAN),
            raw: number.to_string(),
        }
    }
}

impl FromStr for Amount {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            value: s.trim().parse()?,
            raw: s.to_string(),
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn validate_total(total: &Amount) -> Result<(), ValidationError> {
    if total.value < 0.0 {
        return Err(ValidationError::new("range").with_message(Cow::Borrowed("must not be negative")));
    }
    Ok(())
}

/// Request to create a hosted checkout session.
///
/// `total` is accepted as a JSON number or a numeric string.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentOrderRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub order: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[validate(custom(function = "validate_total"))]
    pub total: Amount,

    #[validate(length(min = 1, message = "is required"))]
    pub name: String,

    /// Three-letter currency code; anything else falls back to `usd`.
    #[serde(default)]
    pub currency: Option<String>,
}

impl CreatePaymentOrderRequest {
    /// Converts a validated request into a checkout order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `total` is not a finite number,
    /// which a numeric string such as `"NaN"` can produce.
    pub fn into_order(self) -> Result<CheckoutOrder, AppError> {
        if !self.total.value.is_finite() {
            return Err(AppError::bad_request(
                "Invalid request: total must be a finite amount",
                json!({"total": self.total.raw}),
            ));
        }

        Ok(CheckoutOrder::new(
            self.order,
            self.email,
            self.total.value,
            self.name,
            self.currency.as_deref(),
        )
        .with_total_text(self.total.raw))
    }
}

/// Response carrying the hosted checkout page URL.
#[derive(Debug, Serialize)]
pub struct CreatePaymentOrderResponse {
    #[serde(rename = "sessionUrl")]
    pub session_url: String,
    pub status: &'static str,
}

impl CreatePaymentOrderResponse {
    pub fn success(session_url: String) -> Self {
        Self {
            session_url,
            status: "success",
        }
    }
}

//! Domain entities for hosted checkout sessions.

/// Currency used when the client sends none or an invalid code.
pub const DEFAULT_CURRENCY: &str = "usd";

/// A validated order ready to be turned into a hosted checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub order: String,
    pub email: String,
    pub total: f64,
    /// `total` as the client wrote it, echoed back on the success URL.
    pub total_text: String,
    pub name: String,
    pub currency: String,
}

impl CheckoutOrder {
    /// Creates an order, normalizing the currency code.
    ///
    /// See [`normalize_currency`] for the currency rules.
    pub fn new(
        order: String,
        email: String,
        total: f64,
        name: String,
        currency: Option<&str>,
    ) -> Self {
        Self {
            order,
            email,
            total,
            total_text: total.to_string(),
            name,
            currency: normalize_currency(currency),
        }
    }

    /// Replaces the echoed total text, e.g. to keep `"19.90"` as sent.
    pub fn with_total_text(mut self, total_text: impl Into<String>) -> Self {
        self.total_text = total_text.into();
        self
    }

    /// Order total in minor currency units (cents).
    ///
    /// The amount is truncated, not rounded: `19.999` becomes `1999`.
    pub fn unit_amount(&self) -> i64 {
        to_minor_units(self.total)
    }

    /// Product name shown on the hosted checkout page.
    pub fn product_name(&self) -> String {
        format!("Order {}", self.order)
    }
}

/// Lowercases a currency code and falls back to [`DEFAULT_CURRENCY`]
/// unless the result is exactly three characters long.
pub fn normalize_currency(currency: Option<&str>) -> String {
    let lowered = currency.unwrap_or(DEFAULT_CURRENCY).to_lowercase();

    if lowered.chars().count() == 3 {
        lowered
    } else {
        DEFAULT_CURRENCY.to_string()
    }
}

/// Converts a major-unit amount into truncated minor units.
pub fn to_minor_units(total: f64) -> i64 {
    (total * 100.0).trunc() as i64
}

/// Parameters sent to the payment provider to open a checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckoutSession {
    pub product_name: String,
    pub currency: String,
    pub unit_amount: i64,
    pub quantity: u32,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A checkout session created by the payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the customer is redirected to.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_amount_truncates() {
        let order = CheckoutOrder::new(
            "A-1".to_string(),
            "buyer@example.com".to_string(),
            19.999,
            "Dana".to_string(),
            None,
        );

        assert_eq!(order.unit_amount(), 1999);
    }

    #[test]
    fn test_unit_amount_whole_values() {
        assert_eq!(to_minor_units(25.0), 2500);
        assert_eq!(to_minor_units(0.5), 50);
        assert_eq!(to_minor_units(0.0), 0);
    }

    #[test]
    fn test_currency_lowercased() {
        assert_eq!(normalize_currency(Some("EUR")), "eur");
        assert_eq!(normalize_currency(Some("ils")), "ils");
    }

    #[test]
    fn test_currency_fallback() {
        assert_eq!(normalize_currency(None), "usd");
        assert_eq!(normalize_currency(Some("")), "usd");
        assert_eq!(normalize_currency(Some("dollars")), "usd");
        assert_eq!(normalize_currency(Some("us")), "usd");
    }

    #[test]
    fn test_product_name() {
        let order = CheckoutOrder::new(
            "1042".to_string(),
            "buyer@example.com".to_string(),
            10.0,
            "Dana".to_string(),
            Some("USD"),
        );

        assert_eq!(order.product_name(), "Order 1042");
        assert_eq!(order.currency, "usd");
        assert_eq!(order.total_text, "10");
    }
}

//! Hosted checkout session creation.

use crate::application::credentials::ApiCredential;
use crate::domain::entities::{CheckoutOrder, CheckoutSession, NewCheckoutSession};
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use crate::utils::urls::with_query;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Returned as-is to clients when no Stripe key can be found.
pub const MISSING_KEY_MESSAGE: &str =
    "Stripe API key not configured. Please configure via environment variables";

/// Where the payment provider sends the customer afterwards.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Receives `order`, `email`, `total`, `name` and `currency` as query parameters.
    pub success_url: String,
    pub cancel_url: String,
}

/// Service turning orders into hosted checkout sessions.
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    credential: Arc<ApiCredential>,
    urls: CheckoutUrls,
}

impl CheckoutService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        credential: Arc<ApiCredential>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            gateway,
            credential,
            urls,
        }
    }

    /// Whether a Stripe key is currently held in memory.
    pub fn is_configured(&self) -> bool {
        self.credential.is_configured()
    }

    /// Returns the Stripe key, reloading it from the credential store once if
    /// it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ServiceUnavailable`] if no key can be found.
    pub async fn require_api_key(&self) -> Result<String, AppError> {
        self.credential
            .get_or_reload()
            .await
            .ok_or_else(|| AppError::service_unavailable(MISSING_KEY_MESSAGE, Value::Null))
    }

    /// Creates a checkout session for a single-line order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the success URL cannot be built or
    /// the payment provider fails.
    pub async fn create_session(
        &self,
        api_key: &str,
        order: &CheckoutOrder,
    ) -> Result<CheckoutSession, AppError> {
        let session = NewCheckoutSession {
            product_name: order.product_name(),
            currency: order.currency.clone(),
            unit_amount: order.unit_amount(),
            quantity: 1,
            customer_email: order.email.clone(),
            success_url: self.success_url(order)?,
            cancel_url: self.urls.cancel_url.clone(),
        };

        let created = self
            .gateway
            .create_checkout_session(api_key, &session)
            .await?;

        info!(
            session_id = %created.id,
            order = %order.order,
            currency = %session.currency,
            unit_amount = session.unit_amount,
            "Checkout session created"
        );

        Ok(created)
    }

    fn success_url(&self, order: &CheckoutOrder) -> Result<String, AppError> {
        with_query(
            &self.urls.success_url,
            &[
                ("order", order.order.as_str()),
                ("email", order.email.as_str()),
                ("total", order.total_text.as_str()),
                ("name", order.name.as_str()),
                ("currency", order.currency.as_str()),
            ],
        )
        .map_err(|e| AppError::internal(e.to_string(), json!({"setting": "CHECKOUT_SUCCESS_URL"})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::credentials::STRIPE_SECRET_KEY;
    use crate::domain::ports::{MockCredentialStore, MockPaymentGateway, PaymentError};

    fn urls() -> CheckoutUrls {
        CheckoutUrls {
            success_url: "https://goodiex.vercel.app/payment-success".to_string(),
            cancel_url: "https://api.theholylabs.com/error".to_string(),
        }
    }

    fn credential(initial: Option<&str>, store: MockCredentialStore) -> Arc<ApiCredential> {
        Arc::new(ApiCredential::new(
            STRIPE_SECRET_KEY,
            initial.map(str::to_string),
            Arc::new(store),
        ))
    }

    fn order(total: f64, currency: Option<&str>) -> CheckoutOrder {
        CheckoutOrder::new(
            "1042".to_string(),
            "buyer@example.com".to_string(),
            total,
            "Dana".to_string(),
            currency,
        )
    }

    #[tokio::test]
    async fn test_create_session_builds_line_item() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_checkout_session()
            .withf(|key, session| {
                key == "sk_test_123"
                    && session.unit_amount == 1999
                    && session.currency == "eur"
                    && session.product_name == "Order 1042"
                    && session.quantity == 1
                    && session.customer_email == "buyer@example.com"
                    && session.cancel_url == "https://api.theholylabs.com/error"
                    && session.success_url.starts_with(
                        "https://goodiex.vercel.app/payment-success?order=1042&email=buyer%40example.com&total=19.999&name=Dana&currency=eur",
                    )
            })
            .times(1)
            .returning(|_, _| {
                Ok(CheckoutSession {
                    id: "cs_test_1".to_string(),
                    url: "https://checkout.stripe.com/c/pay/cs_test_1".to_string(),
                })
            });

        let service = CheckoutService::new(
            Arc::new(gateway),
            credential(Some("sk_test_123"), MockCredentialStore::new()),
            urls(),
        );

        let session = service
            .create_session("sk_test_123", &order(19.999, Some("EUR")))
            .await
            .unwrap();

        assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_1");
    }

    #[tokio::test]
    async fn test_require_api_key_missing() {
        let mut store = MockCredentialStore::new();
        store.expect_load().times(1).returning(|_| Ok(None));

        let service = CheckoutService::new(
            Arc::new(MockPaymentGateway::new()),
            credential(None, store),
            urls(),
        );

        let err = service.require_api_key().await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable { .. }));
        assert_eq!(err.to_string(), MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_require_api_key_reloads() {
        let mut store = MockCredentialStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|_| Ok(Some("sk_test_reloaded".to_string())));

        let service = CheckoutService::new(
            Arc::new(MockPaymentGateway::new()),
            credential(None, store),
            urls(),
        );

        assert!(!service.is_configured());
        assert_eq!(service.require_api_key().await.unwrap(), "sk_test_reloaded");
        assert!(service.is_configured());
    }

    #[tokio::test]
    async fn test_provider_error_is_internal() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_checkout_session().returning(|_, _| {
            Err(PaymentError::Provider {
                status: 400,
                message: "Invalid currency: xyz".to_string(),
            })
        });

        let service = CheckoutService::new(
            Arc::new(gateway),
            credential(Some("sk_test_123"), MockCredentialStore::new()),
            urls(),
        );

        let err = service
            .create_session("sk_test_123", &order(5.0, Some("xyz")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(err.to_string(), "Invalid currency: xyz");
    }

    #[tokio::test]
    async fn test_invalid_success_url_is_internal() {
        let service = CheckoutService::new(
            Arc::new(MockPaymentGateway::new()),
            credential(Some("sk_test_123"), MockCredentialStore::new()),
            CheckoutUrls {
                success_url: "payment-success".to_string(),
                cancel_url: "https://api.theholylabs.com/error".to_string(),
            },
        );

        let err = service
            .create_session("sk_test_123", &order(5.0, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_success_url_echoes_total_as_sent() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_checkout_session()
            .withf(|_, session| {
                session.unit_amount == 2550 && session.success_url.contains("&total=25.50&")
            })
            .times(1)
            .returning(|_, _| {
                Ok(CheckoutSession {
                    id: "cs_test_2".to_string(),
                    url: "https://checkout.stripe.com/c/pay/cs_test_2".to_string(),
                })
            });

        let service = CheckoutService::new(
            Arc::new(gateway),
            credential(Some("sk_test_123"), MockCredentialStore::new()),
            urls(),
        );

        let order = order(25.5, None).with_total_text("25.50");
        service.create_session("sk_test_123", &order).await.unwrap();
    }
}

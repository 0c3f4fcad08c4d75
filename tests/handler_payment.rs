mod common;

use axum::http::StatusCode;
use common::{FakePaymentGateway, InMemoryCredentialStore, TestDeps, create_test_server};
use goodiex_api::application::credentials::STRIPE_SECRET_KEY;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn order_body() -> Value {
    json!({
        "order": "1042",
        "email": "buyer@example.com",
        "total": "19.999",
        "name": "Dana Levi",
        "currency": "ILS"
    })
}

#[tokio::test]
async fn test_create_payment_order_success() {
    let deps = TestDeps::default();
    let server = create_test_server(&deps);

    let response = server.post("/create-payment-order").json(&order_body()).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "success");
    assert_eq!(
        json["sessionUrl"],
        "https://checkout.stripe.com/c/pay/cs_test_fake"
    );

    let calls = deps.payments.calls();
    assert_eq!(calls.len(), 1);
    let (key, session) = &calls[0];
    assert_eq!(key, "sk_test_fake");
    assert_eq!(session.unit_amount, 1999);
    assert_eq!(session.currency, "ils");
    assert_eq!(session.product_name, "Order 1042");
    assert_eq!(session.quantity, 1);
    assert_eq!(session.customer_email, "buyer@example.com");
    assert_eq!(session.cancel_url, common::CANCEL_URL);
    assert!(session.success_url.starts_with(&format!(
        "{}?order=1042&email=buyer%40example.com&total=19.999&name=Dana+Levi&currency=ils",
        common::SUCCESS_URL
    )));
}

#[tokio::test]
async fn test_create_payment_order_defaults_currency() {
    let deps = TestDeps::default();
    let server = create_test_server(&deps);

    let mut body = order_body();
    body["currency"] = json!("euro");
    body["total"] = json!(25);

    server
        .post("/create-payment-order")
        .json(&body)
        .await
        .assert_status_ok();

    let (_, session) = &deps.payments.calls()[0];
    assert_eq!(session.currency, "usd");
    assert_eq!(session.unit_amount, 2500);
}

#[tokio::test]
async fn test_success_url_keeps_total_text() {
    let deps = TestDeps::default();
    let server = create_test_server(&deps);

    let mut body = order_body();
    body["total"] = json!("25.50");

    server
        .post("/create-payment-order")
        .json(&body)
        .await
        .assert_status_ok();

    let (_, session) = &deps.payments.calls()[0];
    assert_eq!(session.unit_amount, 2550);
    assert!(session.success_url.contains("&total=25.50&"));
}

#[tokio::test]
async fn test_create_payment_order_without_key() {
    let deps = TestDeps {
        stripe_key: None,
        ..Default::default()
    };
    let server = create_test_server(&deps);

    let response = server.post("/create-payment-order").json(&order_body()).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(
        json["error"],
        "Stripe API key not configured. Please configure via environment variables"
    );
    assert_eq!(deps.store.loads.load(Ordering::SeqCst), 1);
    assert!(deps.payments.calls().is_empty());
}

#[tokio::test]
async fn test_create_payment_order_reloads_key_from_store() {
    let deps = TestDeps {
        stripe_key: None,
        store: Arc::new(InMemoryCredentialStore::with(
            STRIPE_SECRET_KEY,
            "sk_test_from_store",
        )),
        ..Default::default()
    };
    let server = create_test_server(&deps);

    server
        .post("/create-payment-order")
        .json(&order_body())
        .await
        .assert_status_ok();
    server
        .post("/create-payment-order")
        .json(&order_body())
        .await
        .assert_status_ok();

    let calls = deps.payments.calls();
    assert_eq!(calls[0].0, "sk_test_from_store");
    // Loaded once, then held in memory.
    assert_eq!(deps.store.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_key_checked_before_payload() {
    let deps = TestDeps {
        stripe_key: None,
        ..Default::default()
    };
    let server = create_test_server(&deps);

    let response = server
        .post("/create-payment-order")
        .json(&json!({"order": "1"}))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_create_payment_order_invalid_payload() {
    let deps = TestDeps::default();
    let server = create_test_server(&deps);

    let mut body = order_body();
    body["email"] = json!("not-an-email");

    let response = server.post("/create-payment-order").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["code"], "validation_error");
    assert!(json["error"].as_str().unwrap().contains("email"));
    assert!(deps.payments.calls().is_empty());
}

#[tokio::test]
async fn test_create_payment_order_missing_field() {
    let deps = TestDeps::default();
    let server = create_test_server(&deps);

    let response = server
        .post("/create-payment-order")
        .json(&json!({"order": "1", "email": "a@example.com", "name": "A"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_create_payment_order_provider_error() {
    let deps = TestDeps {
        payments: Arc::new(FakePaymentGateway::failing(
            400,
            "Invalid currency: ils",
        )),
        ..Default::default()
    };
    let server = create_test_server(&deps);

    let response = server.post("/create-payment-order").json(&order_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<Value>();
    assert_eq!(json["error"], "Invalid currency: ils");
    assert_eq!(json["details"]["provider_status"], 400);
}

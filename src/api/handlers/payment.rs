//! Handler for checkout session creation.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::payment::{CreatePaymentOrderRequest, CreatePaymentOrderResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a hosted checkout session for an order.
///
/// # Endpoint
///
/// `POST /create-payment-order`
///
/// # Request Body
///
/// ```json
/// { "order": "1042", "email": "buyer@example.com", "total": "19.99", "name": "Dana", "currency": "ils" }
/// ```
///
/// # Response
///
/// ```json
/// { "sessionUrl": "https://checkout.stripe.com/c/pay/cs_...", "status": "success" }
/// ```
///
/// # Errors
///
/// The Stripe key is checked before the payload is looked at.
///
/// - **503**: no Stripe key in memory or in the credential store
/// - **400**: unreadable or invalid payload
/// - **500**: the payment provider rejected the request or was unreachable
pub async fn create_payment_order_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentOrderRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentOrderResponse>, AppError> {
    let api_key = state.checkout_service.require_api_key().await?;

    let Json(payload) = payload?;
    payload.validate()?;
    let order = payload.into_order()?;

    let session = state
        .checkout_service
        .create_session(&api_key, &order)
        .await?;

    Ok(Json(CreatePaymentOrderResponse::success(session.url)))
}

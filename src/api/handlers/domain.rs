//! Handlers for custom-domain verification endpoints.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::api::dto::domain::{
    CheckDnsRequest, CnameResponse, DnsCheckResponse, DomainVerificationResponse,
    GenerateCnameRequest, VerifyDomainRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a domain and lists its A, CNAME and MX records.
///
/// # Endpoint
///
/// `POST /api/domain/verify`
///
/// # Errors
///
/// Returns 400 if the domain is missing or malformed. DNS failures are
/// reported in the body, not as errors.
pub async fn verify_domain_handler(
    State(state): State<AppState>,
    payload: Result<Json<VerifyDomainRequest>, JsonRejection>,
) -> Result<Json<DomainVerificationResponse>, AppError> {
    let Json(payload) = payload?;

    let verification = state
        .domain_service
        .verify(payload.domain.as_deref())
        .await?;

    Ok(Json(verification.into()))
}

/// Checks whether a store's domain points at its expected CNAME.
///
/// # Endpoint
///
/// `POST /api/domain/check-dns`
///
/// `status` is `active` only when the CNAME matches and the domain resolves.
///
/// # Errors
///
/// Returns 400 if `domain`, `store_id` or `expected_cname` is missing, or
/// the domain is malformed.
pub async fn check_dns_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckDnsRequest>, JsonRejection>,
) -> Result<Json<DnsCheckResponse>, AppError> {
    let Json(payload) = payload?;

    let status = state
        .domain_service
        .check_dns(
            payload.domain.as_deref(),
            payload.store_id.as_deref(),
            payload.expected_cname.as_deref(),
        )
        .await?;

    Ok(Json(status.into()))
}

/// Returns the CNAME record a store owner should create.
///
/// # Endpoint
///
/// `POST /api/domain/generate-cname`
///
/// # Errors
///
/// Returns 400 if `store_id` is missing or not a valid DNS label fragment.
pub async fn generate_cname_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCnameRequest>, JsonRejection>,
) -> Result<Json<CnameResponse>, AppError> {
    let Json(payload) = payload?;

    let instruction = state
        .domain_service
        .generate_cname(payload.store_id.as_deref())?;

    Ok(Json(instruction.into()))
}

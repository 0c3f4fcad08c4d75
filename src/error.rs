//! Error type returned at the HTTP handler boundary.
//!
//! Every handler returns `Result<_, AppError>`; [`IntoResponse`] is the single
//! place where error kinds become status codes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::ports::PaymentError;

/// JSON body of every error response.
///
/// ```json
/// { "error": "Invalid domain format", "code": "validation_error", "details": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request fields (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A required upstream credential is not configured (503).
    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },

    /// Upstream or unexpected failure (500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::ServiceUnavailable { .. } => "service_unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let (AppError::Validation { message, details }
        | AppError::ServiceUnavailable { message, details }
        | AppError::Internal { message, details }) = self;

        ErrorBody {
            error: message.clone(),
            code: self.code(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Internal { .. }) {
            tracing::error!("Request failed: {}", self);
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();

        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request(format!("Invalid request: {}", fields.join(", ")), details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        let details = match &err {
            PaymentError::Provider { status, .. } => json!({ "provider_status": status }),
            _ => Value::Null,
        };
        AppError::internal(err.to_string(), details)
    }
}

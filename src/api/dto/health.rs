//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each external dependency.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub payments: CheckStatus,
    pub vision: CheckStatus,
    pub credential_store: CheckStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

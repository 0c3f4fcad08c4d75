//! Port for the backing store that holds third-party API keys.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the credential store.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Credential store connection error: {0}")]
    Connection(String),

    #[error("Credential store operation error: {0}")]
    Operation(String),

    #[error("Credential store is not configured")]
    Unavailable,
}

/// Named secrets that survive process restarts.
///
/// Keys are loaded lazily: when a credential is missing at request time the
/// service asks the store once before giving up.
///
/// # Implementations
///
/// - [`crate::infrastructure::credentials::RedisCredentialStore`] - Redis hash
/// - [`crate::infrastructure::credentials::NullCredentialStore`] - always empty
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads a secret by name. `Ok(None)` when the store has no such entry.
    async fn load(&self, name: &str) -> Result<Option<String>, CredentialStoreError>;

    /// Stores or replaces a secret.
    async fn save(&self, name: &str, value: &str) -> Result<(), CredentialStoreError>;

    /// Removes a secret. Returns whether it existed.
    async fn remove(&self, name: &str) -> Result<bool, CredentialStoreError>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}

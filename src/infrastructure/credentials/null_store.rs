//! Credential store that holds nothing.

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use async_trait::async_trait;
use tracing::debug;

/// A credential store with no backend.
///
/// Used when `REDIS_URL` is not set: keys must then come from environment
/// variables, and reloads always come back empty.
pub struct NullCredentialStore;

impl NullCredentialStore {
    /// Creates a new NullCredentialStore instance.
    pub fn new() -> Self {
        debug!("Using NullCredentialStore (no credential backend)");
        Self
    }
}

impl Default for NullCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for NullCredentialStore {
    async fn load(&self, _name: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(None)
    }

    async fn save(&self, _name: &str, _value: &str) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable)
    }

    async fn remove(&self, _name: &str) -> Result<bool, CredentialStoreError> {
        Err(CredentialStoreError::Unavailable)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

//! Lazily reloadable API credentials.

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::utils::secrets::mask_secret;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Store field holding the Stripe secret key.
pub const STRIPE_SECRET_KEY: &str = "stripe_secret_key";

/// Store field holding the OpenAI API key.
pub const OPENAI_API_KEY: &str = "openai_api_key";

/// One third-party API key, seeded from configuration and reloadable from a
/// [`CredentialStore`].
///
/// Services receive an `Arc<ApiCredential>` instead of reading process-wide
/// state. When the key is missing at request time, [`get_or_reload`] gives
/// the backing store one chance to supply it.
///
/// [`get_or_reload`]: ApiCredential::get_or_reload
pub struct ApiCredential {
    name: &'static str,
    value: RwLock<Option<String>>,
    store: Arc<dyn CredentialStore>,
}

impl ApiCredential {
    /// Creates a credential. Empty initial values are treated as missing.
    pub fn new(
        name: &'static str,
        initial: Option<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            name,
            value: RwLock::new(initial.filter(|v| !v.trim().is_empty())),
            store,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the key currently held in memory.
    pub fn current(&self) -> Option<String> {
        match self.value.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.current().is_some()
    }

    /// Replaces the held key with the store's value, if the store has one.
    ///
    /// Returns the key held after the reload.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the held value is left untouched.
    pub async fn reload(&self) -> Result<Option<String>, CredentialStoreError> {
        if let Some(fresh) = self.store.load(self.name).await? {
            info!(credential = self.name, key = %mask_secret(&fresh), "Credential reloaded from store");
            self.set(Some(fresh));
        }

        Ok(self.current())
    }

    /// Returns the held key, or tries one reload from the store when none is held.
    ///
    /// Store errors are logged and reported as a missing key.
    pub async fn get_or_reload(&self) -> Option<String> {
        if let Some(value) = self.current() {
            return Some(value);
        }

        match self.reload().await {
            Ok(value) => {
                if value.is_none() {
                    warn!(credential = self.name, "Credential missing after reload");
                }
                value
            }
            Err(e) => {
                warn!(credential = self.name, "Credential reload failed: {}", e);
                None
            }
        }
    }

    fn set(&self, value: Option<String>) {
        match self.value.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("configured", &self.is_configured())
            .finish()
    }
}

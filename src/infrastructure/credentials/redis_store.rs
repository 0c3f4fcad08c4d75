//! Redis-backed credential store.

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info};

/// Hash holding every API key, one field per key name.
pub const DEFAULT_HASH_KEY: &str = "goodiex:api_keys";

/// Stores API keys as fields of a single Redis hash.
///
/// Uses `ConnectionManager` so that a dropped connection is re-established
/// transparently on the next command.
pub struct RedisCredentialStore {
    client: ConnectionManager,
    hash_key: String,
}

impl RedisCredentialStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, CredentialStoreError> {
        info!("Connecting to credential store");

        let client = Client::open(redis_url).map_err(|e| {
            CredentialStoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CredentialStoreError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CredentialStoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to credential store");

        Ok(Self {
            client: manager,
            hash_key: DEFAULT_HASH_KEY.to_string(),
        })
    }

    /// Overrides the hash the keys are stored under.
    pub fn with_hash_key(mut self, hash_key: impl Into<String>) -> Self {
        self.hash_key = hash_key.into();
        self
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    async fn load(&self, name: &str) -> Result<Option<String>, CredentialStoreError> {
        let mut conn = self.client.clone();

        let value: Option<String> = conn.hget(&self.hash_key, name).await.map_err(|e| {
            error!("Redis HGET error for {}: {}", name, e);
            CredentialStoreError::Operation(e.to_string())
        })?;

        debug!(
            "Credential {} {}",
            name,
            if value.is_some() { "found" } else { "not found" }
        );

        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), CredentialStoreError> {
        let mut conn = self.client.clone();

        conn.hset::<_, _, _, ()>(&self.hash_key, name, value)
            .await
            .map_err(|e| {
                error!("Redis HSET error for {}: {}", name, e);
                CredentialStoreError::Operation(e.to_string())
            })?;

        info!("Credential {} saved", name);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, CredentialStoreError> {
        let mut conn = self.client.clone();

        let removed: i64 = conn.hdel(&self.hash_key, name).await.map_err(|e| {
            error!("Redis HDEL error for {}: {}", name, e);
            CredentialStoreError::Operation(e.to_string())
        })?;

        Ok(removed > 0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}

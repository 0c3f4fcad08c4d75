//! Backing stores for third-party API keys.
//!
//! Provides two [`CredentialStore`](crate::domain::ports::CredentialStore) implementations:
//! - [`RedisCredentialStore`] - Production store in a Redis hash
//! - [`NullCredentialStore`] - Empty store used when Redis is not configured

mod null_store;
mod redis_store;

pub use null_store::NullCredentialStore;
pub use redis_store::RedisCredentialStore;

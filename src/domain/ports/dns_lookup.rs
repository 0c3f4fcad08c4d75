//! Port for hostname resolution and DNS record queries.

use crate::domain::entities::RecordKind;
use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

/// Errors raised by DNS lookups.
#[derive(Debug, Error)]
pub enum DnsLookupError {
    /// The name does not exist or has no records of the requested type.
    #[error("No {kind} records for {domain}")]
    NotFound { domain: String, kind: String },

    /// Any other failure: timeouts, refused queries, resolver errors.
    #[error("DNS lookup failed for {domain}: {message}")]
    Lookup { domain: String, message: String },
}

impl DnsLookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DnsLookupError::NotFound { .. })
    }
}

/// Resolves hostnames and queries DNS records.
///
/// # Implementations
///
/// - [`crate::infrastructure::dns::HickoryDnsLookup`] - system resolver plus hickory DNS client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Resolves a hostname the way the operating system would.
    async fn resolve_host(&self, domain: &str) -> Result<IpAddr, DnsLookupError>;

    /// Queries records of one type, rendered as strings.
    ///
    /// `A` records render as dotted IPv4, `CNAME` as the fully qualified
    /// target (trailing dot included) and `MX` as `"<preference> <exchange>"`.
    async fn lookup(&self, domain: &str, kind: RecordKind) -> Result<Vec<String>, DnsLookupError>;
}

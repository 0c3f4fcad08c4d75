//! [`DnsLookup`] backed by the system resolver and `hickory-resolver`.

use crate::domain::entities::RecordKind;
use crate::domain::ports::{DnsLookup, DnsLookupError};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Resolves hostnames through the operating system and queries records
/// with a hickory stub resolver.
///
/// Hostname resolution goes through `getaddrinfo` (via
/// [`tokio::net::lookup_host`]) so that `/etc/hosts` and the platform's
/// resolver configuration apply, exactly as for any other client on the host.
/// Record queries are sent to the configured nameservers as fully qualified
/// names, so search domains never get appended.
#[derive(Clone)]
pub struct HickoryDnsLookup {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsLookup {
    /// Wraps an existing resolver.
    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }

    /// Builds a resolver from `/etc/resolv.conf` (or the platform equivalent),
    /// falling back to public nameservers when the system configuration
    /// cannot be read.
    pub fn from_system_conf() -> Self {
        match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => {
                debug!("DNS resolver built from system configuration");
                Self::new(resolver)
            }
            Err(e) => {
                warn!(
                    "Failed to read system DNS configuration: {}. Using default nameservers.",
                    e
                );
                Self::new(TokioAsyncResolver::tokio(
                    ResolverConfig::default(),
                    ResolverOpts::default(),
                ))
            }
        }
    }

    async fn query(&self, fqdn: &str, kind: RecordKind) -> Result<Vec<String>, ResolveError> {
        let records = match kind {
            RecordKind::A => self
                .resolver
                .ipv4_lookup(fqdn)
                .await?
                .iter()
                .map(|a| a.to_string())
                .collect(),
            RecordKind::Cname => self
                .resolver
                .lookup(fqdn, RecordType::CNAME)
                .await?
                .iter()
                .filter_map(|rdata| rdata.as_cname())
                .map(|cname| cname.to_string())
                .collect(),
            RecordKind::Mx => self
                .resolver
                .mx_lookup(fqdn)
                .await?
                .iter()
                .map(|mx| format!("{} {}", mx.preference(), mx.exchange()))
                .collect(),
        };

        Ok(records)
    }
}

#[async_trait]
impl DnsLookup for HickoryDnsLookup {
    async fn resolve_host(&self, domain: &str) -> Result<IpAddr, DnsLookupError> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((domain, 0))
            .await
            .map_err(|e| DnsLookupError::Lookup {
                domain: domain.to_string(),
                message: e.to_string(),
            })?
            .map(|addr| addr.ip())
            .collect();

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| DnsLookupError::NotFound {
                domain: domain.to_string(),
                kind: "address".to_string(),
            })
    }

    async fn lookup(&self, domain: &str, kind: RecordKind) -> Result<Vec<String>, DnsLookupError> {
        let fqdn = to_fqdn(domain);

        self.query(&fqdn, kind)
            .await
            .map_err(|e| map_resolve_error(domain, kind, e))
    }
}

fn to_fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

fn map_resolve_error(domain: &str, kind: RecordKind, err: ResolveError) -> DnsLookupError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => DnsLookupError::NotFound {
            domain: domain.to_string(),
            kind: kind.to_string(),
        },
        _ => DnsLookupError::Lookup {
            domain: domain.to_string(),
            message: err.to_string(),
        },
    }
}

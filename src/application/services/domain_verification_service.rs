//! Custom-domain verification service.

use crate::domain::entities::{
    CnameInstruction, DnsConfigStatus, DnsRecords, DnsStatus, DomainVerification, RecordKind,
};
use crate::domain::ports::{DnsLookup, DnsLookupError};
use crate::error::AppError;
use crate::utils::domain_name::{
    STORE_ID_REGEX, is_valid_domain, names_match, normalize_domain_input,
};
use chrono::Utc;
use serde_json::{Value, json};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service checking that store owners pointed their domains at the platform.
///
/// Every operation validates its input before touching the network, so a
/// malformed domain never produces a DNS query.
pub struct DomainVerificationService {
    dns: Arc<dyn DnsLookup>,
    cname_base_domain: String,
}

impl DomainVerificationService {
    pub fn new(dns: Arc<dyn DnsLookup>, cname_base_domain: impl Into<String>) -> Self {
        Self {
            dns,
            cname_base_domain: cname_base_domain.into(),
        }
    }

    /// Resolves a domain and collects its A, CNAME and MX records.
    ///
    /// A failed resolution yields [`DnsStatus::Unresolved`]; a failed record
    /// query leaves that record list empty. Neither is an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the domain is missing or malformed.
    pub async fn verify(&self, domain: Option<&str>) -> Result<DomainVerification, AppError> {
        let domain = validate_domain(domain)?;

        let ip_address = self.resolve(&domain).await;

        let mut dns_records = DnsRecords::default();
        for kind in RecordKind::ALL {
            dns_records.set(kind, self.records(&domain, kind).await);
        }

        let dns_status = if ip_address.is_some() {
            DnsStatus::Resolved
        } else {
            DnsStatus::Unresolved
        };

        info!(
            domain = %domain,
            dns_status = dns_status.as_str(),
            a = dns_records.a.len(),
            cname = dns_records.cname.len(),
            mx = dns_records.mx.len(),
            "Domain verified"
        );

        Ok(DomainVerification {
            domain,
            dns_status,
            ip_address,
            dns_records,
            verified_at: Utc::now(),
        })
    }

    /// Checks that `domain` has a CNAME pointing at `expected_cname` and
    /// that it resolves.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any field is missing or the
    /// domain is malformed.
    pub async fn check_dns(
        &self,
        domain: Option<&str>,
        store_id: Option<&str>,
        expected_cname: Option<&str>,
    ) -> Result<DnsConfigStatus, AppError> {
        let domain = validate_domain(domain)?;
        let store_id = required(store_id, "store_id")?;
        let expected_cname = required(expected_cname, "expected_cname")?;

        let cname_configured = self
            .records(&domain, RecordKind::Cname)
            .await
            .iter()
            .any(|observed| names_match(observed, &expected_cname));

        let resolves_correctly = self.resolve(&domain).await.is_some();

        let status = DnsConfigStatus {
            domain,
            store_id,
            cname_configured,
            resolves_correctly,
            checked_at: Utc::now(),
        };

        info!(
            domain = %status.domain,
            store_id = %status.store_id,
            cname_configured,
            resolves_correctly,
            status = status.status().as_str(),
            "DNS configuration checked"
        );

        Ok(status)
    }

    /// Builds the CNAME record a store owner must create.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the store id is missing or
    /// contains characters not allowed in a DNS label.
    pub fn generate_cname(&self, store_id: Option<&str>) -> Result<CnameInstruction, AppError> {
        let store_id = required(store_id, "store_id")?;

        if !STORE_ID_REGEX.is_match(&store_id) {
            return Err(AppError::bad_request(
                "Invalid store_id format. Use letters, digits and hyphens only",
                json!({"store_id": store_id}),
            ));
        }

        Ok(CnameInstruction::new(store_id, &self.cname_base_domain))
    }

    async fn resolve(&self, domain: &str) -> Option<IpAddr> {
        match self.dns.resolve_host(domain).await {
            Ok(ip) => Some(ip),
            Err(e) => {
                log_lookup_failure(&e);
                None
            }
        }
    }

    async fn records(&self, domain: &str, kind: RecordKind) -> Vec<String> {
        self.dns.lookup(domain, kind).await.unwrap_or_else(|e| {
            log_lookup_failure(&e);
            Vec::new()
        })
    }
}

fn log_lookup_failure(err: &DnsLookupError) {
    if err.is_not_found() {
        debug!("{}", err);
    } else {
        warn!("{}", err);
    }
}

/// Trims, lowercases and validates a domain name.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the domain is missing or malformed.
pub fn validate_domain(raw: Option<&str>) -> Result<String, AppError> {
    let domain = normalize_domain_input(raw.unwrap_or_default());

    if domain.is_empty() {
        return Err(AppError::bad_request("Domain is required", Value::Null));
    }

    if !is_valid_domain(&domain) {
        return Err(AppError::bad_request(
            "Invalid domain format",
            json!({"domain": domain}),
        ));
    }

    Ok(domain)
}

fn required(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::bad_request(
            format!("{field} is required"),
            json!({"field": field}),
        )),
    }
}

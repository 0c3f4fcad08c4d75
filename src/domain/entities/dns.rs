//! Domain entities for custom-domain verification.

use chrono::{DateTime, Utc};
use std::fmt;
use std::net::IpAddr;

/// DNS record types inspected during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    A,
    Cname,
    Mx,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::A, RecordKind::Cname, RecordKind::Mx];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Cname => "CNAME",
            RecordKind::Mx => "MX",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the domain resolved through the system resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsStatus {
    Resolved,
    Unresolved,
}

impl DnsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsStatus::Resolved => "resolved",
            DnsStatus::Unresolved => "unresolved",
        }
    }
}

/// Records observed for a domain. A failed query leaves its list empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecords {
    pub a: Vec<String>,
    pub cname: Vec<String>,
    pub mx: Vec<String>,
}

impl DnsRecords {
    pub fn get(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::A => &self.a,
            RecordKind::Cname => &self.cname,
            RecordKind::Mx => &self.mx,
        }
    }

    pub fn set(&mut self, kind: RecordKind, values: Vec<String>) {
        match kind {
            RecordKind::A => self.a = values,
            RecordKind::Cname => self.cname = values,
            RecordKind::Mx => self.mx = values,
        }
    }
}

/// Outcome of `POST /api/domain/verify`.
#[derive(Debug, Clone)]
pub struct DomainVerification {
    pub domain: String,
    pub dns_status: DnsStatus,
    pub ip_address: Option<IpAddr>,
    pub dns_records: DnsRecords,
    pub verified_at: DateTime<Utc>,
}

/// Whether a store's custom domain is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Active,
    Pending,
}

impl ConfigState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigState::Active => "active",
            ConfigState::Pending => "pending",
        }
    }
}

/// Outcome of `POST /api/domain/check-dns`.
#[derive(Debug, Clone)]
pub struct DnsConfigStatus {
    pub domain: String,
    pub store_id: String,
    pub cname_configured: bool,
    pub resolves_correctly: bool,
    pub checked_at: DateTime<Utc>,
}

impl DnsConfigStatus {
    /// `Active` only when both the CNAME and the resolution checks pass.
    pub fn status(&self) -> ConfigState {
        if self.cname_configured && self.resolves_correctly {
            ConfigState::Active
        } else {
            ConfigState::Pending
        }
    }
}

/// DNS record a store owner must create to point a domain at their store.
#[derive(Debug, Clone)]
pub struct CnameInstruction {
    pub store_id: String,
    pub cname: String,
    pub dns_type: RecordKind,
    pub dns_name: String,
    pub generated_at: DateTime<Utc>,
}

impl CnameInstruction {
    /// Host label the CNAME record is created under.
    pub const HOST_LABEL: &'static str = "www";

    pub fn new(store_id: String, base_domain: &str) -> Self {
        let cname = store_cname(&store_id, base_domain);
        Self {
            store_id,
            cname,
            dns_type: RecordKind::Cname,
            dns_name: Self::HOST_LABEL.to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Value of the record, identical to the generated CNAME.
    pub fn dns_value(&self) -> &str {
        &self.cname
    }
}

/// `store-<store_id>.<base_domain>`
pub fn store_cname(store_id: &str, base_domain: &str) -> String {
    format!("store-{store_id}.{base_domain}")
}

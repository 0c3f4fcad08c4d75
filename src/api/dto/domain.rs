//! DTOs for custom-domain verification.

use crate::domain::entities::{CnameInstruction, DnsConfigStatus, DnsRecords, DomainVerification};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request for `POST /api/domain/verify`.
///
/// Fields are optional so that a missing value reaches the service and
/// gets its specific error message.
#[derive(Debug, Deserialize)]
pub struct VerifyDomainRequest {
    pub domain: Option<String>,
}

/// Request for `POST /api/domain/check-dns`.
#[derive(Debug, Deserialize)]
pub struct CheckDnsRequest {
    pub domain: Option<String>,
    pub store_id: Option<String>,
    pub expected_cname: Option<String>,
}

/// Request for `POST /api/domain/generate-cname`.
#[derive(Debug, Deserialize)]
pub struct GenerateCnameRequest {
    pub store_id: Option<String>,
}

/// Records grouped by type, keyed `A`, `CNAME` and `MX`.
#[derive(Debug, Serialize)]
pub struct DnsRecordsDto {
    #[serde(rename = "A")]
    pub a: Vec<String>,
    #[serde(rename = "CNAME")]
    pub cname: Vec<String>,
    #[serde(rename = "MX")]
    pub mx: Vec<String>,
}

impl From<DnsRecords> for DnsRecordsDto {
    fn from(records: DnsRecords) -> Self {
        Self {
            a: records.a,
            cname: records.cname,
            mx: records.mx,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DomainVerificationResponse {
    pub domain: String,
    pub dns_status: &'static str,
    pub ip_address: Option<String>,
    pub dns_records: DnsRecordsDto,
    pub verified_at: DateTime<Utc>,
}

impl From<DomainVerification> for DomainVerificationResponse {
    fn from(v: DomainVerification) -> Self {
        Self {
            domain: v.domain,
            dns_status: v.dns_status.as_str(),
            ip_address: v.ip_address.map(|ip| ip.to_string()),
            dns_records: v.dns_records.into(),
            verified_at: v.verified_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DnsCheckResponse {
    pub domain: String,
    pub store_id: String,
    pub cname_configured: bool,
    pub resolves_correctly: bool,
    pub status: &'static str,
    pub checked_at: DateTime<Utc>,
}

impl From<DnsConfigStatus> for DnsCheckResponse {
    fn from(s: DnsConfigStatus) -> Self {
        let status = s.status().as_str();
        Self {
            domain: s.domain,
            store_id: s.store_id,
            cname_configured: s.cname_configured,
            resolves_correctly: s.resolves_correctly,
            status,
            checked_at: s.checked_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CnameResponse {
    pub store_id: String,
    pub cname: String,
    pub dns_type: &'static str,
    pub dns_name: String,
    pub dns_value: String,
    pub generated_at: DateTime<Utc>,
}

impl From<CnameInstruction> for CnameResponse {
    fn from(i: CnameInstruction) -> Self {
        let dns_value = i.dns_value().to_string();
        Self {
            store_id: i.store_id,
            cname: i.cname,
            dns_type: i.dns_type.as_str(),
            dns_name: i.dns_name,
            dns_value,
            generated_at: i.generated_at,
        }
    }
}

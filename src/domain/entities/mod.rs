//! Core business entities.
//!
//! Entities are created per request and discarded once the response is sent.

pub mod checkout;
pub mod dns;
pub mod meal;

pub use checkout::{CheckoutOrder, CheckoutSession, NewCheckoutSession};
pub use dns::{
    CnameInstruction, ConfigState, DnsConfigStatus, DnsRecords, DnsStatus, DomainVerification,
    RecordKind,
};
pub use meal::{FallbackAnalysis, Healthiness, MealAnalysis, ModelOutput};

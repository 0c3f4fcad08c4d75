//! Ports to the external services this API proxies.
//!
//! Each trait is implemented by an adapter in [`crate::infrastructure`] and
//! by test doubles (`mockall` automocks in unit tests, fakes in `tests/`).

pub mod credential_store;
pub mod dns_lookup;
pub mod payment_gateway;
pub mod vision_model;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use dns_lookup::{DnsLookup, DnsLookupError};
pub use payment_gateway::{PaymentError, PaymentGateway};
pub use vision_model::{VisionError, VisionModel};

#[cfg(test)]
pub use credential_store::MockCredentialStore;
#[cfg(test)]
pub use dns_lookup::MockDnsLookup;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
#[cfg(test)]
pub use vision_model::MockVisionModel;

//! DNS lookups for custom-domain verification.

mod hickory_lookup;

pub use hickory_lookup::HickoryDnsLookup;

//! Payment provider adapters.

mod stripe;

pub use stripe::{DEFAULT_STRIPE_API_BASE, StripeGateway};

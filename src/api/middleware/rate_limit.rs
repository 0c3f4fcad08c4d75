//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use thiserror::Error;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained requests per second allowed for one client IP.
pub const PER_SECOND: u64 = 2;

/// Requests a client IP may burst above the sustained rate.
pub const BURST_SIZE: u32 = 30;

#[derive(Debug, Error)]
#[error("invalid rate limit settings: {per_second} per second, burst {burst_size}")]
pub struct RateLimitError {
    per_second: u64,
    burst_size: u32,
}

pub type PeerIpLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;
pub type ProxyIpLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires
/// the server to be started with connect info.
///
/// # Errors
///
/// Returns [`RateLimitError`] if the limits are rejected by the governor.
pub fn layer() -> Result<PeerIpLayer, RateLimitError> {
    let config = GovernorConfigBuilder::default()
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()
        .ok_or(RateLimitError {
            per_second: PER_SECOND,
            burst_size: BURST_SIZE,
        })?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

/// Creates a rate limiter keyed by `X-Forwarded-For` / `X-Real-IP`,
/// falling back to the peer address.
///
/// Only for deployments behind a trusted reverse proxy; the headers are
/// client-controlled otherwise.
///
/// # Errors
///
/// Returns [`RateLimitError`] if the limits are rejected by the governor.
pub fn proxy_layer() -> Result<ProxyIpLayer, RateLimitError> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()
        .ok_or(RateLimitError {
            per_second: PER_SECOND,
            burst_size: BURST_SIZE,
        })?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

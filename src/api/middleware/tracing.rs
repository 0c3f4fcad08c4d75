//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// **On Request:**
/// - Logs the request start at `DEBUG`
/// - Creates a span at `INFO` level with:
///   - HTTP method
///   - URI path
///   - HTTP version
///
/// **On Response:**
/// - Logs at `INFO` level with:
///   - Status code
///   - Latency in milliseconds
///
/// # Example Logs
///
/// ```text
/// DEBUG request{method=POST uri=/api/domain/verify version=HTTP/1.1}: started processing request
/// INFO request{method=POST uri=/api/domain/verify version=HTTP/1.1}: finished processing request latency=85 ms status=200
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = api::routes::routes()
///     .with_state(state)
///     .layer(tracing::layer());
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

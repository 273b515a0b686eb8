pub mod metrics;
pub mod tracing;

use axum::{Router, body::Body, middleware::from_fn};
use tower_http::trace::TraceLayer;

/// Standard HTTP stack, outermost first: request id, trace span, metrics.
///
/// The request id is assigned before the span is created so every span
/// carries it.
pub fn with_http_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(tracing::make_request_span::<Body>))
        .layer(from_fn(tracing::request_id_middleware))
}

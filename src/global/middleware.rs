//! Request tracing middleware for observability.
//!
//! Generation failures are invisible to the mobile client (they surface as a
//! 200 with fallback content), so server-side logs and metrics are the only
//! place they can be seen.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Request ID header name, echoed back on every response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that adds request tracing with a unique request ID.
///
/// - Generates a request ID and attaches it to a tracing span
/// - Logs request start and completion with duration
/// - Records request count and duration metrics
/// - Echoes the request ID in the response headers
pub async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        tracing::info!("Request started");
        let start = Instant::now();

        let mut response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status();

        tracing::info!(
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );

        record_request_metrics(method.as_ref(), &path, status.as_u16(), duration);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        response
    }
    .instrument(span)
    .await
}

/// Record metrics for HTTP requests
fn record_request_metrics(method: &str, path: &str, status: u16, duration: std::time::Duration) {
    let status_str = status.to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => normalize_path(path),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => normalize_path(path),
        "status" => status_str
    )
    .record(duration.as_secs_f64());
}

/// Normalize path for metrics to avoid high cardinality
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 2 {
        path.to_string()
    } else {
        format!("/{}/{}", segments[0], segments[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_short() {
        assert_eq!(normalize_path("/advice"), "/advice");
        assert_eq!(normalize_path("/compatibility"), "/compatibility");
    }

    #[test]
    fn test_normalize_path_long() {
        assert_eq!(normalize_path("/api/ai/advice"), "/api/ai");
    }

    #[test]
    fn test_normalize_path_root() {
        assert_eq!(normalize_path("/"), "/");
    }
}

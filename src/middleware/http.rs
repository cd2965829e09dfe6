//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit (the upload cap — enforced here, ahead of the
//!   storage bridge)
//! - Global timeout
//!
//! Notes:
//! - The body limit doubles as the upload size limiter: oversized uploads
//!   are rejected at this boundary and never reach the storage bridge.
//! - The inbound timeout must outlive the upstream call, otherwise a slow
//!   upstream would surface as a 408 race instead of a mapped error.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Apply HTTP-level middleware to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        // Generate a request id if missing, then propagate it to the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Limit request body size (this is the configured upload cap).
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        // Bound request time (must exceed the upstream timeout, see above).
        .layer(TimeoutLayer::new(
            config.upstream.timeout + Duration::from_secs(5),
        ))
        // Access log / tracing for all requests.
        .layer(TraceLayer::new_for_http());

    router
        // axum's own 2 MB default would undercut the configured cap.
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(layers)
}

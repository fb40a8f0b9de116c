//! Request/response logging wrapper.
//!
//! Logs method and path before dispatch, then buffers the full response body,
//! logs status and body, and forwards the response unchanged.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::observability::metrics;

pub async fn log_request_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    tracing::info!(method = %method, path = %path, "HTTP request");

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "Failed to buffer response body");
            return ApiError::Internal(e.to_string()).into_response();
        }
    };

    tracing::info!(
        status = parts.status.as_u16(),
        body = %String::from_utf8_lossy(&bytes),
        "HTTP response"
    );
    metrics::record_request(method.as_str(), parts.status.as_u16(), start);

    Response::from_parts(parts, Body::from(bytes))
}

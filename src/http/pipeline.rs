//! Middleware pipeline composition.
//!
//! # Data Flow
//! ```text
//! request
//!     → CatchPanicLayer      exception boundary, panics become 500 problems
//!     → SetRequestIdLayer    x-request-id assigned when absent
//!     → TraceLayer           one span per request
//!     → PropagateRequestId   x-request-id echoed on the response
//!     → auth_middleware      401 short-circuit on missing/invalid token
//!     → log_request_response request logged, response body logged on return
//!     → router → handler
//! ```
//!
//! # Design Decisions
//! - The order is one explicit list built once at startup
//! - Auth rejections are never seen by the logging wrapper; the gate logs
//!   its own warning

use axum::http::HeaderName;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::http::middleware::{auth_middleware, handle_panic, log_request_response, AuthState};
use crate::http::request::{make_request_span, UuidRequestId, X_REQUEST_ID};

/// Wrap a fully-stated router in the request pipeline.
pub fn apply(router: Router, auth: AuthState) -> Router {
    let x_request_id = HeaderName::from_static(X_REQUEST_ID);

    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(SetRequestIdLayer::new(x_request_id.clone(), UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(from_fn_with_state(auth, auth_middleware))
            .layer(from_fn(log_request_response)),
    )
}

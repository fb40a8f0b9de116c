//! Exception boundary.
//!
//! Outermost stage of the pipeline: any panic escaping the inner stages is
//! turned into the same 500 problem document the handlers produce for
//! internal errors.

use std::any::Any;

use axum::response::Response;

use crate::http::error::problem_response;

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    tracing::error!(error = %message, "Unhandled failure reached the exception boundary");
    problem_response(&message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown failure".to_string()
    }
}

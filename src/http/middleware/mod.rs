//! Middleware stages of the request pipeline.

pub mod auth;
pub mod logging;
pub mod panic;

pub use auth::{auth_middleware, AuthState};
pub use logging::log_request_response;
pub use panic::handle_panic;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → pipeline.rs (exception boundary → request id → auth → logging)
//!     → handlers.rs (route dispatch, validation, sanitization, store)
//!     → error.rs (typed failures → JSON envelopes)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

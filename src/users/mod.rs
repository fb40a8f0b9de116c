//! User domain subsystem.
//!
//! # Data Flow
//! ```text
//! UserInput (raw JSON body)
//!     → validation.rs (field rules on raw input, all violations collected)
//!     → sanitize.rs (strip markup + special characters)
//!     → UserCandidate (sanitized, the only type the store accepts)
//!     → store.rs (uniqueness check, id allocation, mutation)
//!     → User (stored record)
//! ```
//!
//! # Design Decisions
//! - Validation runs before sanitization, so a value can pass the length
//!   rules and still shrink afterwards
//! - The store checks uniqueness only; format rules live in validation.rs
//! - The store is plain data; locking is the caller's concern

pub mod model;
pub mod sanitize;
pub mod store;
pub mod validation;

pub use model::{User, UserCandidate, UserInput};
pub use sanitize::sanitize_input;
pub use store::{SharedStore, StoreError, UserStore};
pub use validation::{validate_user, ValidationErrors};

//! Typed client for the user management service.

mod client;

pub use client::{NewUser, SdkError, User, UsersClient};

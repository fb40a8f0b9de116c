//! Field validation for user payloads.
//!
//! # Design Decisions
//! - Returns all violations, not just the first
//! - A field that fails the required rule reports only that rule
//! - Runs on raw input; sanitization happens after validation passes

use thiserror::Error;

use crate::users::model::UserInput;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;

/// One or more violated field rules, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", .0.join(" "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

/// Check every field rule of a user payload.
pub fn validate_user(input: &UserInput) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    match required(input.username.as_deref()) {
        None => errors.push("Username is required.".to_string()),
        Some(username) => {
            let len = username.chars().count();
            if len < USERNAME_MIN_LEN {
                errors.push(format!(
                    "Username must be at least {USERNAME_MIN_LEN} characters."
                ));
            }
            if len > USERNAME_MAX_LEN {
                errors.push(format!(
                    "Username must be at most {USERNAME_MAX_LEN} characters."
                ));
            }
        }
    }

    match required(input.email.as_deref()) {
        None => errors.push("Email is required.".to_string()),
        Some(email) => {
            if !is_email_address(email) {
                errors.push("Email must be a valid email address.".to_string());
            }
            if email.chars().count() > EMAIL_MAX_LEN {
                errors.push(format!(
                    "Email must be at most {EMAIL_MAX_LEN} characters."
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Exactly one `@`, neither first nor last, and no line breaks.
pub fn is_email_address(value: &str) -> bool {
    if value.contains(['\r', '\n']) {
        return false;
    }

    match (value.find('@'), value.rfind('@')) {
        (Some(first), Some(last)) => first == last && first > 0 && first < value.len() - 1,
        _ => false,
    }
}

//! User record and request payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::users::sanitize::sanitize_input;

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Store-assigned identifier, never reused.
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

/// Raw user payload as received from a client.
///
/// Missing and `null` fields deserialize to `None` so that the validator can
/// report them as required. `Id` and `CreatedAt` in the body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInput {
    #[serde(default, alias = "username")]
    pub username: Option<String>,

    #[serde(default, alias = "email")]
    pub email: Option<String>,
}

impl UserInput {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
        }
    }

    /// Produce the sanitized candidate handed to the store.
    pub fn sanitize(&self) -> UserCandidate {
        UserCandidate {
            username: sanitize_input(self.username.as_deref().unwrap_or_default()),
            email: sanitize_input(self.email.as_deref().unwrap_or_default()),
        }
    }
}

/// Sanitized username and email, ready for the store.
///
/// Only constructible through [`UserInput::sanitize`], which keeps raw input
/// out of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCandidate {
    username: String,
    email: String,
}

impl UserCandidate {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn into_parts(self) -> (String, String) {
        (self.username, self.email)
    }
}

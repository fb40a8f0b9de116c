//! API error type and response envelopes.
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | validation, duplicate email, bad JSON | 400 (413/415 kept) | `{"Errors": [...]}` |
//! | missing/invalid token | 401 | `{"error": "..."}` |
//! | unknown user or route | 404 | empty |
//! | anything else | 500 | problem document |

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::users::{StoreError, ValidationErrors};

const PROBLEM_TYPE_500: &str = "https://tools.ietf.org/html/rfc9110#section-15.6.1";
const PROBLEM_TITLE_500: &str = "An error occurred while processing your request.";
const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Body of every 400-class rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsBody {
    #[serde(rename = "Errors")]
    pub errors: Vec<String>,
}

/// Body of an authentication rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
}

/// Problem document returned for unexpected failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl ProblemDetails {
    pub fn internal(message: &str) -> Self {
        Self {
            kind: PROBLEM_TYPE_500.to_string(),
            title: PROBLEM_TITLE_500.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: format!("Internal server error: {message}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Email must be unique.")]
    DuplicateEmail,

    /// Request body could not be read as JSON.
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::NotFound(id) => Self::NotFound(format!("user {id}")),
            StoreError::IdsExhausted => Self::Internal(err.to_string()),
        }
    }
}

/// Unparseable or mistyped bodies are 400; size and content-type rejections
/// keep axum's 413/415.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        Self::MalformedBody {
            status,
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::MalformedBody { status, .. } => *status,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(errors) => errors_response(status, errors.into_messages()),
            Self::DuplicateEmail => errors_response(status, vec![Self::DuplicateEmail.to_string()]),
            Self::MalformedBody { message, .. } => errors_response(status, vec![message]),
            Self::Unauthorized(error) => (status, Json(AuthErrorBody { error })).into_response(),
            Self::NotFound(_) => status.into_response(),
            Self::Internal(message) => {
                tracing::error!(error = %message, "internal server error");
                problem_response(&message)
            }
        }
    }
}

fn errors_response(status: StatusCode, errors: Vec<String>) -> Response {
    (status, Json(ErrorsBody { errors })).into_response()
}

/// Render the 500 problem document for a failure message.
pub fn problem_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
        Json(ProblemDetails::internal(message)),
    )
        .into_response()
}

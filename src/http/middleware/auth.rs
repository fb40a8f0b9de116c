//! Bearer token authentication gate.
//!
//! Every request must carry `Authorization: Bearer <token>` where `<token>`
//! equals the configured shared secret. Rejections short-circuit with 401
//! and never reach the inner stages.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::http::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Expected token, injected as middleware state.
#[derive(Clone)]
pub struct AuthState {
    token: Arc<str>,
}

impl AuthState {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingOrMalformed,
    InvalidToken,
}

impl AuthFailure {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingOrMalformed => "Unauthorized: Token missing or malformed.",
            Self::InvalidToken => "Unauthorized: Invalid token.",
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Self::MissingOrMalformed => "authorization header missing or malformed",
            Self::InvalidToken => "invalid token",
        }
    }
}

/// Check an `Authorization` header value against the expected token.
pub fn authenticate(header: Option<&HeaderValue>, expected: &str) -> Result<(), AuthFailure> {
    let provided = header
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthFailure::MissingOrMalformed)?
        .trim();

    if token_eq(provided, expected) {
        Ok(())
    } else {
        Err(AuthFailure::InvalidToken)
    }
}

fn token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        return false;
    }
    provided.ct_eq(expected).into()
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers().get(header::AUTHORIZATION), &auth.token) {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            tracing::warn!(
                reason = failure.reason(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected by authentication"
            );
            ApiError::Unauthorized(failure.message().to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn value(raw: &str) -> HeaderValue {
        HeaderValue::from_str(raw).unwrap()
    }

    #[test]
    fn accepts_matching_token() {
        assert_eq!(authenticate(Some(&value("Bearer s3cret")), "s3cret"), Ok(()));
    }

    #[test]
    fn surrounding_whitespace_in_token_is_trimmed() {
        assert_eq!(authenticate(Some(&value("Bearer   s3cret  ")), "s3cret"), Ok(()));
    }

    #[test]
    fn missing_or_non_bearer_header_is_malformed() {
        assert_eq!(authenticate(None, "s3cret"), Err(AuthFailure::MissingOrMalformed));
        assert_eq!(
            authenticate(Some(&value("Basic dXNlcjpwYXNz")), "s3cret"),
            Err(AuthFailure::MissingOrMalformed)
        );
        assert_eq!(
            authenticate(Some(&value("bearer s3cret")), "s3cret"),
            Err(AuthFailure::MissingOrMalformed)
        );
    }

    #[test]
    fn wrong_token_is_invalid() {
        assert_eq!(
            authenticate(Some(&value("Bearer nope")), "s3cret"),
            Err(AuthFailure::InvalidToken)
        );
        assert_eq!(
            authenticate(Some(&value("Bearer s3cret-but-longer")), "s3cret"),
            Err(AuthFailure::InvalidToken)
        );
        assert_eq!(
            authenticate(Some(&value("Bearer ")), "s3cret"),
            Err(AuthFailure::InvalidToken)
        );
    }

    #[test]
    fn debug_redacts_token() {
        let state = AuthState::new("s3cret");
        assert!(!format!("{state:?}").contains("s3cret"));
    }

    fn test_app(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/test",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .layer(from_fn_with_state(AuthState::new("my-secret"), auth_middleware))
    }

    async fn send(app: Router, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri("/test");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, _) = send(test_app(hits.clone()), Some("Bearer my-secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_header_rejected_before_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(test_app(hits.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized: Token missing or malformed.");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_rejected_before_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(test_app(hits.clone()), Some("Bearer wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized: Invalid token.");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

//! CRUD handlers for the `/users` resource.
//!
//! Each handler returns `Result<_, ApiError>`; failures become responses
//! right here, so the exception boundary only sees genuine panics.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::users::{validate_user, User, UserInput};

/// Users router. State is supplied by the caller.
pub fn routes(max_body_size: usize) -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_size))
}

/// Integer user identifier from the path.
///
/// A segment that is not an integer does not match the route, so it is
/// answered with 404 like any unknown path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub u64);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::NotFound(e.body_text()))?;

        raw.parse::<u64>()
            .map(UserId)
            .map_err(|_| ApiError::NotFound(format!("no route for /users/{raw}")))
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    validate_user(&input)?;

    let user = state.store.lock().create(input.sanitize())?;
    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{}", user.id))],
        Json(user),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.lock().list())
}

pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .lock()
        .get(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {id}")))
}

/// Existence is checked before validation: an unknown id is 404 even when
/// the body is invalid.
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(input) = payload?;

    if !state.store.lock().contains(id) {
        return Err(ApiError::NotFound(format!("user {id}")));
    }

    validate_user(&input)?;

    let user = state.store.lock().update(id, input.sanitize())?;
    tracing::info!(user_id = user.id, "User updated");
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<StatusCode, ApiError> {
    state.store.lock().delete(id)?;
    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no matching route".to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::ServiceConfig;
    use crate::http::HttpServer;

    fn app(max_body_size: usize) -> Router {
        let mut config = ServiceConfig::default();
        config.authentication.token = "t".into();
        config.limits.max_body_size = max_body_size;
        HttpServer::new(config).router()
    }

    fn post_users(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::AUTHORIZATION, "Bearer t")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn errors(response: axum::response::Response) -> Vec<String> {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        serde_json::from_value(body["Errors"].clone()).unwrap()
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_errors_envelope() {
        let name = "x".repeat(512);
        let body = format!(r#"{{"Username":"{name}","Email":"big@x.com"}}"#);

        let response = app(128).oneshot(post_users(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(errors(response).await.len(), 1);
    }

    #[tokio::test]
    async fn body_within_limit_is_accepted() {
        let body = r#"{"Username":"small","Email":"small@x.com"}"#;
        let response = app(128).oneshot(post_users(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn mistyped_field_is_bad_request_not_unprocessable() {
        let body = r#"{"Username":123,"Email":"a@b.com"}"#;
        let response = app(1024).oneshot(post_users(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(errors(response).await.len(), 1);
    }

    #[tokio::test]
    async fn missing_content_type_keeps_415() {
        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::AUTHORIZATION, "Bearer t")
            .body(Body::from(r#"{"Username":"abc","Email":"a@b.com"}"#))
            .unwrap();

        let response = app(1024).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(errors(response).await.len(), 1);
    }
}

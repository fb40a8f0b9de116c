use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 400 with the service's `Errors` list.
    #[error("rejected: {}", .0.join(" "))]
    Rejected(Vec<String>),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found")]
    NotFound,

    #[error("service returned {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

#[derive(Deserialize)]
struct ErrorsBody {
    #[serde(rename = "Errors")]
    errors: Vec<String>,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    error: String,
}

pub struct UsersClient {
    client: Client,
    base_url: String,
    token: String,
}

impl UsersClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies).
    pub fn with_client(client: Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, SdkError> {
        let res = self
            .authorized(self.client.post(self.users_url()))
            .json(user)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, SdkError> {
        let res = self.authorized(self.client.get(self.users_url())).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn get_user(&self, id: u64) -> Result<User, SdkError> {
        let res = self.authorized(self.client.get(self.user_url(id))).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn update_user(&self, id: u64, user: &NewUser) -> Result<User, SdkError> {
        let res = self
            .authorized(self.client.put(self.user_url(id)))
            .json(user)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), SdkError> {
        let res = self
            .authorized(self.client.delete(self.user_url(id)))
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

/// Pass successful responses through; turn failures into [`SdkError`].
async fn check(res: Response) -> Result<Response, SdkError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await?;
    Err(match status {
        StatusCode::NOT_FOUND => SdkError::NotFound,
        StatusCode::BAD_REQUEST => match serde_json::from_str::<ErrorsBody>(&body) {
            Ok(parsed) => SdkError::Rejected(parsed.errors),
            Err(_) => SdkError::Unexpected { status, body },
        },
        StatusCode::UNAUTHORIZED => match serde_json::from_str::<AuthErrorBody>(&body) {
            Ok(parsed) => SdkError::Unauthorized(parsed.error),
            Err(_) => SdkError::Unauthorized(body),
        },
        _ => SdkError::Unexpected { status, body },
    })
}

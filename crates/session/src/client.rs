//! REST client for the back-office API.
//!
//! Every request is decorated with the current user's id so the backend can
//! authorize server-side. A 401 from any call ends the session; a 403 is only
//! logged and reported to the caller.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use traveldesk_auth::User;

use crate::config::{LOGIN_PATH, SessionConfig, USER_ID_HEADER};
use crate::store::SessionStore;

pub const LOGIN_ENDPOINT: &str = "/api/login";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user account is not active")]
    AccountInactive,
    /// The session was cleared; navigate to the login page.
    #[error("unauthorized; session ended")]
    Unauthorized,
    #[error("permission denied: {0}")]
    Forbidden(String),
    #[error("API error ({0}): {1}")]
    Status(u16, String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Navigation the UI must perform after this error, if any.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized => Some(LOGIN_PATH),
            _ => None,
        }
    }
}

/// Email/password pair for the login exchange.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        Ok(())
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &SessionConfig, session: Arc<SessionStore>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request builder carrying the current user's id header.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.session.current_user() {
            Some(user) => request.header(USER_ID_HEADER, user.id.as_str()),
            None => request,
        }
    }

    /// Send a request and apply the shared status handling.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(%url, "backend rejected the session; logging out");
                self.session.logout().await;
                Err(ApiError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                let detail = error_detail(&body).unwrap_or_else(|| "forbidden".to_string());
                tracing::warn!(%url, %detail, "permission denied by backend");
                Err(ApiError::Forbidden(detail))
            }
            other => Err(ApiError::Status(other.as_u16(), body)),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Exchange credentials for a user record and start the session with it.
    ///
    /// Login failures never touch the existing session.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        credentials.validate()?;

        let resp = self
            .http
            .post(self.url(LOGIN_ENDPOINT))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {
                let user: User = resp
                    .json()
                    .await
                    .map_err(|e| ApiError::Decode(e.to_string()))?;
                self.session.login(user.clone()).await;
                Ok(user)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::InvalidCredentials),
            StatusCode::FORBIDDEN => Err(ApiError::AccountInactive),
            other => {
                let body = resp.text().await.unwrap_or_default();
                tracing::error!(status = other.as_u16(), %body, "login request failed");
                Err(ApiError::Status(other.as_u16(), body))
            }
        }
    }
}

/// `detail` field of a JSON error body, or the raw text.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        Err(_) => Some(body.to_string()),
    }
}

//! Authenticated request plumbing.
//!
//! Every authenticated request carries `Authorization: Bearer <access>`.
//! On a 401 the client performs exactly one transparent token refresh
//! (`POST /users/token/refresh/`) and retries the original request; a
//! second 401 surfaces [`AuthError::SessionExpired`] and the user must
//! log in again.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use super::token::{TokenStore, Tokens};
use crate::error::{ApiError, AuthError, CoreError, Result};
use crate::storage::Config;

const LOGIN_PATH: &str = "users/login/";
const REGISTER_PATH: &str = "users/register/";
const REFRESH_PATH: &str = "users/token/refresh/";

/// Payload for `POST /users/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Patient,
    Caregiver,
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PATIENT" => Ok(UserType::Patient),
            "CAREGIVER" => Ok(UserType::Caregiver),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// HTTP client for the MeroHealth backend.
///
/// Cheap to clone; clones share the connection pool and the token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a client from the loaded configuration.
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_base_url(&config.backend.base_url, config.request_timeout(), tokens)
    }

    /// Build a client against an explicit base URL (tests point this at a
    /// local mock server).
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        // A trailing slash matters to Url::join.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(ApiError::from)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::from(e).into())
    }

    /// Whether credentials are present in the token store.
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.tokens.load()?.is_some())
    }

    /// `POST /users/login/`. Stores both tokens on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint(LOGIN_PATH)?;
        let resp = self
            .http
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ApiError::from)?;

        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidCredentials.into());
        }
        let resp = Self::check_status(LOGIN_PATH, resp).await?;
        let body: Value = resp.json().await.map_err(ApiError::from)?;

        let access = body.get("access").and_then(Value::as_str);
        let refresh = body.get("refresh").and_then(Value::as_str);
        match (access, refresh) {
            (Some(access), Some(refresh)) => {
                self.tokens.store(&Tokens {
                    access: access.to_string(),
                    refresh: refresh.to_string(),
                })?;
                debug!("logged in, tokens stored");
                Ok(())
            }
            _ => Err(CoreError::Custom(
                "login response missing access/refresh tokens".to_string(),
            )),
        }
    }

    /// `POST /users/register/`. Unauthenticated.
    pub async fn register(&self, user: &NewUser) -> Result<()> {
        let url = self.endpoint(REGISTER_PATH)?;
        let resp = self
            .http
            .post(url)
            .json(user)
            .send()
            .await
            .map_err(ApiError::from)?;
        Self::check_status(REGISTER_PATH, resp).await?;
        Ok(())
    }

    /// Drop stored credentials. Purely local; the backend keeps no session.
    pub fn logout(&self) -> Result<()> {
        self.tokens.clear()?;
        Ok(())
    }

    // ── Request plumbing ─────────────────────────────────────────────

    async fn attempt(&self, method: &Method, url: &Url, body: Option<&Value>) -> Result<Response> {
        let mut req = self.http.request(method.clone(), url.clone());
        if let Some(tokens) = self.tokens.load()? {
            req = req.bearer_auth(&tokens.access);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await.map_err(ApiError::from)?)
    }

    /// Send an authenticated request, refreshing the access token once on
    /// a 401 and retrying.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        let mut resp = self.attempt(&method, &url, body.as_ref()).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "access token rejected, refreshing");
            self.refresh_access().await?;
            resp = self.attempt(&method, &url, body.as_ref()).await?;
            if resp.status() == StatusCode::UNAUTHORIZED {
                return Err(AuthError::SessionExpired.into());
            }
        }

        Self::check_status(path, resp).await
    }

    async fn refresh_access(&self) -> Result<()> {
        let tokens = self.tokens.load()?.ok_or(AuthError::NotLoggedIn)?;
        let url = self.endpoint(REFRESH_PATH)?;
        let resp = self
            .http
            .post(url)
            .json(&json!({ "refresh": tokens.refresh }))
            .send()
            .await
            .map_err(ApiError::from)?;

        if !resp.status().is_success() {
            warn!(status = resp.status().as_u16(), "token refresh rejected");
            return Err(AuthError::SessionExpired.into());
        }

        let body: Value = resp.json().await.map_err(ApiError::from)?;
        let access = body
            .get("access")
            .and_then(Value::as_str)
            .ok_or(AuthError::SessionExpired)?;
        self.tokens.store(&Tokens {
            access: access.to_string(),
            refresh: tokens.refresh,
        })?;
        debug!("access token refreshed");
        Ok(())
    }

    async fn check_status(path: &str, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            path: path.to_string(),
            body,
        }
        .into())
    }

    // ── Typed helpers for resource modules ───────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(Method::GET, path, None).await?;
        Ok(resp.json().await.map_err(ApiError::from)?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        Ok(resp.json().await.map_err(ApiError::from)?)
    }

    /// POST where the response body is irrelevant (e.g. mark-taken).
    pub(crate) async fn post_unit(&self, path: &str, body: Option<Value>) -> Result<()> {
        self.send(Method::POST, path, body).await?;
        Ok(())
    }

    pub(crate) async fn put_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        let resp = self.send(Method::PUT, path, Some(body)).await?;
        Ok(resp.json().await.map_err(ApiError::from)?)
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}

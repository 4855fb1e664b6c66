//! HTTP client for the identity backend. All portal session state derives
//! from the four auth endpoints plus the Discord linking handoff; this module
//! only moves bytes and never touches client-side storage.

use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{AssignmentUpdate, Principal};

// One connection pool for every ApiClient in the process.
static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status; `message` is the response
    /// `message` field verbatim when present.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("password confirmation does not match")]
    PasswordMismatch,
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSuccess {
    pub token: String,
    #[serde(default)]
    pub user: Option<Principal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: Principal,
}

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        let base = Url::parse(base).context("invalid base URL")?;
        Ok(Self { base, client: HTTP.clone() })
    }

    /// POST /api/auth/login with `{identifier, password}`; returns the bearer
    /// token and, when the backend includes it, the Principal snapshot.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginSuccess, ApiError> {
        let url = self.join("/api/auth/login")?;
        let resp = self
            .client
            .post(url)
            .json(&serde_json::json!({"identifier": identifier, "password": password}))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<LoginSuccess>().await?)
    }

    /// POST /api/auth/register. The password/confirmation equality check runs
    /// before any request is issued.
    pub async fn register(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        if req.password != req.confirm_password {
            return Err(ApiError::PasswordMismatch);
        }
        let url = self.join("/api/auth/register")?;
        let resp = self.client.post(url).json(req).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// GET /api/auth/me — the sole source of truth for the Identity Cache.
    pub async fn fetch_me(&self, token: &str) -> Result<Principal, ApiError> {
        let url = self.join("/api/auth/me")?;
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<UserEnvelope>().await?.user)
    }

    /// PUT /api/auth/profile — submits a normalized assignment and returns the
    /// canonical Principal as rewritten by the backend.
    pub async fn update_profile(
        &self,
        token: &str,
        update: &AssignmentUpdate,
    ) -> Result<Principal, ApiError> {
        let url = self.join("/api/auth/profile")?;
        let resp = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<UserEnvelope>().await?.user)
    }

    /// Redirect target for the Discord linking handoff. The credential rides
    /// along as a query parameter; the backend sends the browser back to the
    /// protected area with the completion marker in the URL.
    pub fn discord_link_url(&self, token: &str) -> Result<Url, ApiError> {
        let mut url = self.join("/api/auth/discord")?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::Rejected {
            status: 0,
            message: format!("invalid endpoint path {}: {}", path, e),
        })
    }

    /// Turn a non-2xx response into `Rejected`, lifting the backend `message`
    /// field verbatim when the body is JSON.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<serde_json::Value>().await {
            Ok(v) => v
                .get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ApiError::Rejected { status: status.as_u16(), message })
    }
}

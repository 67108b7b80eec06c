//! Session handling against the accounts backend.
//!
//! Tokens and the remembered user sit in the same key-value store as the
//! transaction state. Logging out wipes all of it, transactions included.

use async_trait::async_trait;
use std::sync::Arc;
use tx_dashboard_types::{AuthTokens, CurrentUser, LoginRequest, SignupRequest};

use crate::kv::KvStore;
use crate::store::TransactionStore;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Remote accounts API
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn signup(&self, req: &SignupRequest) -> Result<serde_json::Value, String>;

    async fn login(&self, req: &LoginRequest) -> Result<AuthTokens, String>;
}

/// Talks to the accounts REST endpoints (`/register/`, `/login/`).
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: &impl serde::Serialize) -> Result<serde_json::Value, String> {
        let url = format!("{}/{}/", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("Failed to read response from {}: {}", url, e))?;
        let payload = parse_payload(&url, &text);

        if !status.is_success() {
            return Err(format!("Accounts API returned {}: {}", status, payload));
        }
        Ok(payload)
    }
}

/// Bodies that are not JSON come back as `Null`; anything but an empty body
/// is logged first.
fn parse_payload(url: &str, body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("[Session] Non-JSON response from {}: {}", url, e);
            serde_json::Value::Null
        }
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn signup(&self, req: &SignupRequest) -> Result<serde_json::Value, String> {
        self.post("register", req).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthTokens, String> {
        let payload = self.post("login", req).await?;
        tokens_from_payload(&payload)
    }
}

fn tokens_from_payload(payload: &serde_json::Value) -> Result<AuthTokens, String> {
    let access = payload.get("access").and_then(|v| v.as_str()).unwrap_or("");
    let refresh = payload.get("refresh").and_then(|v| v.as_str()).unwrap_or("");
    if access.is_empty() || refresh.is_empty() {
        return Err("Login failed: No tokens received".to_string());
    }
    Ok(AuthTokens {
        access: access.to_string(),
        refresh: refresh.to_string(),
    })
}

pub struct Session {
    kv: Arc<dyn KvStore>,
    backend: Arc<dyn AuthBackend>,
    store: Arc<TransactionStore>,
}

impl Session {
    pub fn new(
        kv: Arc<dyn KvStore>,
        backend: Arc<dyn AuthBackend>,
        store: Arc<TransactionStore>,
    ) -> Self {
        Self { kv, backend, store }
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<serde_json::Value, String> {
        log::info!("[Session] Signing up {}", req.username);
        self.backend.signup(req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<CurrentUser, String> {
        log::info!("[Session] Attempting login for {}", req.username);
        let result = match self.backend.login(req).await {
            Ok(tokens) => self.remember(&req.username, &tokens),
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => Ok(user),
            Err(e) => {
                log::warn!("[Session] Login failed for {}: {}", req.username, e);
                self.forget();
                Err(e)
            }
        }
    }

    /// Drop tokens and the transaction state.
    pub fn logout(&self) {
        self.forget();
        self.store.clear();
        log::info!("[Session] Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.kv.get(ACCESS_TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        let raw = self.kv.get(USER_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("[Session] Ignoring unreadable user record: {}", e);
                None
            }
        }
    }

    fn remember(&self, username: &str, tokens: &AuthTokens) -> Result<CurrentUser, String> {
        let user = CurrentUser {
            username: username.to_string(),
        };
        let user_json = serde_json::to_string(&user)
            .map_err(|e| format!("Failed to serialize user: {}", e))?;
        self.kv.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.kv.set(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        self.kv.set(USER_KEY, &user_json)?;
        Ok(user)
    }

    fn forget(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.kv.remove(key) {
                log::error!("[Session] Failed to remove {}: {}", key, e);
            }
        }
    }
}

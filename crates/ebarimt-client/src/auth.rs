//! # OAuth2 Authentication
//!
//! Password-grant token acquisition against the ITC auth server, with an
//! in-process cache.
//!
//! ## Token Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bearer()                                                               │
//! │     │                                                                   │
//! │     ├── cached token valid (expiry - 60s buffer)? ──► reuse it         │
//! │     │                                                                   │
//! │     └── POST /realms/{realm}/protocol/openid-connect/token             │
//! │           grant_type=password, client_id=vatps, username, password     │
//! │              │                                                          │
//! │              ├── 200 {access_token, expires_in} ──► cache + return     │
//! │              ├── 401 ──► ClientError::Auth (bad credentials)           │
//! │              └── other ──► ClientError::Auth with the response body    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Seconds before nominal expiry at which a cached token is refreshed.
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// OAuth2 client id registered for POS integrations.
const CLIENT_ID: &str = "vatps";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds; the auth server defaults to 300.
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    300
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_BUFFER < self.expires_at
    }
}

/// In-process bearer token cache.
///
/// One cache lives inside each [`crate::EbarimtClient`]; concurrent
/// callers serialize on the mutex so the auth server sees at most one
/// token request per expiry window.
#[derive(Debug, Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        TokenCache::default()
    }

    /// Returns a valid bearer token, acquiring a new one when needed.
    pub async fn bearer(
        &self,
        http: &reqwest::Client,
        config: &ClientConfig,
    ) -> ClientResult<String> {
        let mut guard = self.inner.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let token = acquire_token(http, config).await?;
        let bearer = token.access_token.clone();
        *guard = Some(token);
        Ok(bearer)
    }

    /// Drops the cached token (credentials changed).
    pub async fn clear(&self) {
        *self.inner.lock().await = None;
    }
}

async fn acquire_token(
    http: &reqwest::Client,
    config: &ClientConfig,
) -> ClientResult<CachedToken> {
    let username = config
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ClientError::NotConfigured {
            field: "api_username",
        })?;
    let password = config
        .password
        .as_deref()
        .ok_or(ClientError::NotConfigured {
            field: "api_password",
        })?;

    let url = config.token_url();
    debug!(url = %url, "Acquiring eBarimt access token");

    let response = http
        .post(&url)
        .form(&[
            ("grant_type", "password"),
            ("client_id", CLIENT_ID),
            ("username", username),
            ("password", password),
        ])
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ClientError::Auth {
            message: "invalid credentials".to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Auth {
            message: format!("HTTP {}: {}", status.as_u16(), body),
        });
    }

    let token: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse {
                message: format!("token response: {e}"),
            })?;

    debug!(expires_in = token.expires_in, "Access token acquired");

    Ok(CachedToken {
        expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        access_token: token.access_token,
    })
}

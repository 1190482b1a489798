//! # Client Configuration
//!
//! Endpoint URLs and credentials for the eBarimt service families.
//!
//! ## Service Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pos_base   POS terminal API       receipt create/void, terminal info  │
//! │  api_base   Public API             taxpayer, barcode, tax codes        │
//! │  itc_base   ITC service API        consumer lottery, foreigner, OAT    │
//! │  auth_base  OAuth2 token endpoint  password grant, client_id "vatps"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each base resolves to the staging or production deployment from the
//! Settings record; tests override the bases to point at a stub server.

use std::time::Duration;

use ebarimt_core::{Environment, Settings};

// Production deployments.
const POS_URL_PROD: &str = "https://api.frappe.mn/rest";
const API_URL_PROD: &str = "https://api.frappe.mn/ebarimt-prod";
const ITC_URL_PROD: &str = "https://api.frappe.mn/itc-service-prod";
const AUTH_URL_PROD: &str = "https://api.frappe.mn/auth/itc";

// Staging deployments.
const POS_URL_STAGING: &str = "https://api.frappe.mn/test/rest";
const API_URL_STAGING: &str = "https://api.frappe.mn/ebarimt-staging";
const ITC_URL_STAGING: &str = "https://api.frappe.mn/itc-service-staging";
const AUTH_URL_STAGING: &str = "https://api.frappe.mn/auth/itc-staging";

/// Client configuration.
///
/// ## Example
/// ```rust
/// use ebarimt_client::ClientConfig;
/// use ebarimt_core::Environment;
/// use std::time::Duration;
///
/// let config = ClientConfig::new(Environment::Staging)
///     .credentials("operator", "secret")
///     .timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deployment this client talks to.
    pub environment: Environment,

    /// POS terminal API base URL.
    pub pos_base: String,

    /// Public API base URL.
    pub api_base: String,

    /// ITC service API base URL.
    pub itc_base: String,

    /// OAuth2 auth server base URL.
    pub auth_base: String,

    /// ITC OAuth username.
    pub username: Option<String>,

    /// ITC OAuth password.
    pub password: Option<String>,

    /// X-API-KEY for operator endpoints.
    pub api_key: Option<String>,

    /// Request timeout.
    /// Default: 30 seconds; a timeout surfaces as a TransportError.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration pointing at the given deployment.
    pub fn new(environment: Environment) -> Self {
        let (pos, api, itc, auth) = match environment {
            Environment::Production => (POS_URL_PROD, API_URL_PROD, ITC_URL_PROD, AUTH_URL_PROD),
            Environment::Staging => (
                POS_URL_STAGING,
                API_URL_STAGING,
                ITC_URL_STAGING,
                AUTH_URL_STAGING,
            ),
        };
        ClientConfig {
            environment,
            pos_base: pos.to_string(),
            api_base: api.to_string(),
            itc_base: itc.to_string(),
            auth_base: auth.to_string(),
            username: None,
            password: None,
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds a configuration from a persisted Settings record.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = ClientConfig::new(settings.environment);
        config.username = settings.api_username.clone();
        config.password = settings.api_password.clone();
        config.api_key = settings.api_key.clone();
        config
    }

    /// Sets the OAuth credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the X-API-KEY used by operator endpoints.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points every service family at one base URL (for tests).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        self.pos_base = base.clone();
        self.api_base = base.clone();
        self.itc_base = base.clone();
        self.auth_base = base;
        self
    }

    /// OAuth2 realm for the deployment.
    pub fn realm(&self) -> &'static str {
        match self.environment {
            Environment::Production => "ITC",
            Environment::Staging => "Staging",
        }
    }

    /// Full token endpoint URL.
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.auth_base,
            self.realm()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_urls() {
        let config = ClientConfig::new(Environment::Staging);
        assert_eq!(config.pos_base, "https://api.frappe.mn/test/rest");
        assert_eq!(
            config.token_url(),
            "https://api.frappe.mn/auth/itc-staging/realms/Staging/protocol/openid-connect/token"
        );
    }

    #[test]
    fn test_production_urls() {
        let config = ClientConfig::new(Environment::Production);
        assert_eq!(config.pos_base, "https://api.frappe.mn/rest");
        assert_eq!(config.realm(), "ITC");
    }

    #[test]
    fn test_base_url_override() {
        let config =
            ClientConfig::new(Environment::Staging).with_base_url("http://127.0.0.1:9999/");
        assert_eq!(config.pos_base, "http://127.0.0.1:9999");
        assert_eq!(config.api_base, config.itc_base);
    }

    #[test]
    fn test_from_settings_carries_credentials() {
        let mut settings = Settings::unconfigured();
        settings.environment = Environment::Staging;
        settings.api_username = Some("operator".into());
        settings.api_password = Some("secret".into());

        let config = ClientConfig::from_settings(&settings);
        assert_eq!(config.username.as_deref(), Some("operator"));
        assert_eq!(config.environment, Environment::Staging);
    }
}

//! # PayPal Configuration
//!
//! Configuration management for the PayPal integration.
//! Secrets are loaded from environment variables and never leave
//! `SecretString` except to build the token request.

use pay_core::{PaymentError, PaymentResult};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::str::FromStr;

const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
const LIVE_API_BASE: &str = "https://api-m.paypal.com";

/// Client id advertised to the JS SDK when none is configured
const FALLBACK_CLIENT_ID: &str = "sb";

/// PayPal environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayPalEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "sandbox",
            PayPalEnvironment::Live => "live",
        }
    }

    /// REST API host for this environment
    pub fn api_base_url(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => SANDBOX_API_BASE,
            PayPalEnvironment::Live => LIVE_API_BASE,
        }
    }
}

impl FromStr for PayPalEnvironment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PayPalEnvironment::Sandbox),
            "live" => Ok(PayPalEnvironment::Live),
            other => Err(PaymentError::Configuration(format!(
                "PAYPAL_ENV must be 'sandbox' or 'live', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PayPalEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PayPal API configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// Sandbox or live
    pub environment: PayPalEnvironment,

    /// REST client id (also the publishable id used by the JS SDK)
    pub client_id: Option<String>,

    /// REST client secret
    client_secret: Option<SecretString>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PAYPAL_ENV` (`sandbox` | `live`, default `sandbox`)
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_CLIENT_SECRET`
    /// - `PAYPAL_API_BASE` (optional override)
    ///
    /// Missing credentials are not an error here: the public config and
    /// static pages still work, and order calls fail individually.
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> PaymentResult<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match non_empty("PAYPAL_ENV") {
            Some(value) => value.parse()?,
            None => PayPalEnvironment::Sandbox,
        };

        let mut config = Self::new(environment);
        config.client_id = non_empty("PAYPAL_CLIENT_ID");
        config.client_secret = non_empty("PAYPAL_CLIENT_SECRET").map(SecretString::from);

        if let Some(base) = non_empty("PAYPAL_API_BASE") {
            config = config.with_api_base_url(base);
        }

        Ok(config)
    }

    /// Create config without credentials for the given environment
    pub fn new(environment: PayPalEnvironment) -> Self {
        Self {
            environment,
            client_id: None,
            client_secret: None,
            api_base_url: environment.api_base_url().to_string(),
        }
    }

    /// Builder: set client id and secret
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::from(client_secret.into()));
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Client id and secret, or a configuration error if either is absent
    pub fn credentials(&self) -> PaymentResult<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Ok((id.as_str(), secret.expose_secret())),
            _ => Err(PaymentError::Configuration(
                "Missing PayPal credentials in env".to_string(),
            )),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Client id safe to hand to the browser
    pub fn public_client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(FALLBACK_CLIENT_ID)
    }

    pub fn is_live(&self) -> bool {
        self.environment == PayPalEnvironment::Live
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

impl Default for PayPalConfig {
    fn default() -> Self {
        Self::new(PayPalEnvironment::Sandbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_sandbox() {
        let config = PayPalConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.environment, PayPalEnvironment::Sandbox);
        assert_eq!(config.api_base_url, "https://api-m.sandbox.paypal.com");
        assert!(!config.has_credentials());
        assert_eq!(config.public_client_id(), "sb");
    }

    #[test]
    fn test_live_environment() {
        let config = PayPalConfig::from_vars(vars(&[
            ("PAYPAL_ENV", "live"),
            ("PAYPAL_CLIENT_ID", "AbC123"),
            ("PAYPAL_CLIENT_SECRET", "s3cr3t"),
        ]))
        .unwrap();

        assert!(config.is_live());
        assert_eq!(config.api_base_url, "https://api-m.paypal.com");
        assert_eq!(config.credentials().unwrap(), ("AbC123", "s3cr3t"));
        assert_eq!(config.public_client_id(), "AbC123");
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let err = PayPalConfig::from_vars(vars(&[("PAYPAL_ENV", "staging")])).unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let config = PayPalConfig::from_vars(vars(&[("PAYPAL_CLIENT_ID", "AbC123")])).unwrap();
        let err = config.credentials().unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(_)));
        assert_eq!(err.to_string(), "Missing PayPal credentials in env");
    }

    #[test]
    fn test_api_base_override() {
        let config = PayPalConfig::from_vars(vars(&[("PAYPAL_API_BASE", "http://127.0.0.1:9000/")]))
            .unwrap();
        assert_eq!(config.url("/v1/oauth2/token"), "http://127.0.0.1:9000/v1/oauth2/token");
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = PayPalConfig::default().with_credentials("AbC123", "s3cr3t");
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }
}

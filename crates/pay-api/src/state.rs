//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment strategy, provider config and checkout URLs.

use pay_core::{BoxedPaymentStrategy, CheckoutUrls};
use pay_paypal::{PayPalConfig, PayPalOrdersStrategy};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for provider return/cancel URLs
    pub base_url: String,
    /// Directory served for static assets
    pub static_dir: PathBuf,
    /// Log line format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host: IpAddr = match lookup("HOST") {
            Some(h) => h
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid HOST '{}': {}", h, e))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port: u16 = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", p, e))?,
            None => 3000,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            base_url: lookup("BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            log_format,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub strategy: BoxedPaymentStrategy,
    /// Provider config (public client id, environment)
    pub paypal: PayPalConfig,
    /// Return/cancel URLs for the redirect flow
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState from environment variables
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let paypal = PayPalConfig::from_env()?;
        Self::from_parts(config, paypal)
    }

    /// Create state backed by the PayPal Orders strategy
    pub fn from_parts(config: AppConfig, paypal: PayPalConfig) -> anyhow::Result<Self> {
        let strategy = PayPalOrdersStrategy::new(paypal.clone())?;
        Ok(Self::with_strategy(config, paypal, Arc::new(strategy)))
    }

    /// Create state around an existing strategy
    pub fn with_strategy(
        config: AppConfig,
        paypal: PayPalConfig,
        strategy: BoxedPaymentStrategy,
    ) -> Self {
        let urls = CheckoutUrls::new(&config.base_url);
        Self {
            strategy,
            paypal,
            urls,
            config,
        }
    }
}

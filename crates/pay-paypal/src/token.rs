//! # Access Tokens
//!
//! Client-credentials exchange against `/v1/oauth2/token`, plus a small
//! cache so a burst of checkouts does not pay one token round trip each.

use crate::config::PayPalConfig;
use chrono::{DateTime, Duration, Utc};
use pay_core::{PaymentError, PaymentResult};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

/// Tokens are dropped this long before the provider says they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Short-lived token cache keyed by client id.
///
/// Shared between brokers through an `Arc`; reads vastly outnumber writes.
#[derive(Debug, Default)]
pub struct TokenCache {
    tokens: RwLock<HashMap<String, CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token for this credential if it has not expired
    pub async fn get(&self, client_id: &str) -> Option<String> {
        let guard = self.tokens.read().await;
        guard
            .get(client_id)
            .filter(|token| token.is_valid())
            .map(|token| token.access_token.clone())
    }

    /// Stores a token until `expires_at`
    pub async fn set(
        &self,
        client_id: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) {
        let mut guard = self.tokens.write().await;
        guard.insert(
            client_id.into(),
            CachedToken {
                access_token: access_token.into(),
                expires_at,
            },
        );
    }

    /// Forget every cached token
    pub async fn clear(&self) {
        self.tokens.write().await.clear();
    }
}

/// Exchanges the service credentials for a bearer token
pub struct TokenBroker {
    config: PayPalConfig,
    client: Client,
    cache: Arc<TokenCache>,
}

impl TokenBroker {
    pub fn new(config: PayPalConfig, client: Client, cache: Arc<TokenCache>) -> Self {
        Self {
            config,
            client,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Get a bearer token, from the cache when possible.
    ///
    /// # Errors
    /// - `Configuration` if client id or secret is missing
    /// - `Authentication` if the provider reply carries no `access_token`
    /// - `NetworkError` on transport failure
    #[instrument(skip(self), fields(environment = %self.config.environment))]
    pub async fn access_token(&self) -> PaymentResult<String> {
        let (client_id, client_secret) = self.config.credentials()?;

        if let Some(token) = self.cache.get(client_id).await {
            debug!("Using cached PayPal access token");
            return Ok(token);
        }

        let token = self.request_token(client_id, client_secret).await?;

        match token_expiry(token.expires_in) {
            Some(expires_at) => {
                self.cache
                    .set(client_id, token.access_token.clone(), expires_at)
                    .await;
                info!("Obtained PayPal access token, cached until {}", expires_at);
            }
            None => info!("Obtained PayPal access token (not cached)"),
        }

        Ok(token.access_token)
    }

    async fn request_token(&self, client_id: &str, client_secret: &str) -> PaymentResult<TokenGrant> {
        let url = self.config.url("/v1/oauth2/token");

        let response = self
            .client
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let parsed = serde_json::from_str::<TokenResponse>(&body).ok();

        match parsed {
            Some(TokenResponse {
                access_token: Some(access_token),
                expires_in,
            }) => Ok(TokenGrant {
                access_token,
                expires_in,
            }),
            _ => {
                error!("PayPal token error: status={}, body={}", status, body);
                Err(PaymentError::Authentication(format!(
                    "Could not get access token: {}",
                    body
                )))
            }
        }
    }
}

/// Cache deadline for a token lifetime, `None` when too short to bother
fn token_expiry(expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    let lifetime = expires_in? - EXPIRY_MARGIN_SECS;
    (lifetime > 0).then(|| Utc::now() + Duration::seconds(lifetime))
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct TokenGrant {
    access_token: String,
    expires_in: Option<i64>,
}

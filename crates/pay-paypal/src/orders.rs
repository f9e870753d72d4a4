//! # PayPal Orders
//!
//! Implementation of the PayPal Orders v2 API.
//! Creates orders (redirect or JS-SDK button flow) and captures them.

use crate::config::PayPalConfig;
use crate::token::{TokenBroker, TokenCache};
use async_trait::async_trait;
use pay_core::{
    validate_order_id, OrderRequest, PaymentError, PaymentResult, PaymentStrategy, ProviderOrder,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "paypal";

/// Orders are captured right after approval
const INTENT: &str = "CAPTURE";

/// Build the shared HTTP client
pub fn http_client() -> PaymentResult<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| PaymentError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// PayPal Orders v2 strategy
///
/// Every call obtains a bearer token through the [`TokenBroker`] first.
pub struct PayPalOrdersStrategy {
    config: PayPalConfig,
    client: Client,
    tokens: TokenBroker,
}

impl PayPalOrdersStrategy {
    /// Create a new strategy with its own token cache
    pub fn new(config: PayPalConfig) -> PaymentResult<Self> {
        Self::with_token_cache(config, Arc::new(TokenCache::new()))
    }

    /// Create a new strategy sharing an existing token cache
    pub fn with_token_cache(config: PayPalConfig, cache: Arc<TokenCache>) -> PaymentResult<Self> {
        let client = http_client()?;
        let tokens = TokenBroker::new(config.clone(), client.clone(), cache);
        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = PayPalConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    /// Translate an order request into the Orders v2 body
    fn build_order_body(request: &OrderRequest) -> PayPalOrderBody {
        PayPalOrderBody {
            intent: INTENT,
            purchase_units: vec![PayPalPurchaseUnit {
                amount: PayPalAmount {
                    currency_code: request.amount.currency.code().to_string(),
                    value: request.amount.provider_value(),
                },
            }],
            application_context: request.redirect.as_ref().map(|urls| {
                PayPalApplicationContext {
                    return_url: urls.return_url(),
                    cancel_url: urls.cancel_url(),
                }
            }),
        }
    }

    /// Read a provider reply; non-2xx statuses become provider errors
    async fn read_json(response: Response) -> PaymentResult<serde_json::Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();

        if !status.is_success() {
            error!("PayPal API error: status={}, body={}", status, body);

            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", status));

            let details = parsed.or_else(|| (!body.is_empty()).then(|| body.into()));

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
                details,
            });
        }

        parsed.ok_or_else(|| {
            PaymentError::Serialization(format!("Failed to parse PayPal response: {}", body))
        })
    }
}

#[async_trait]
impl PaymentStrategy for PayPalOrdersStrategy {
    #[instrument(skip(self, request), fields(request_id = %request.request_id, amount = %request.amount))]
    async fn create_order(&self, request: &OrderRequest) -> PaymentResult<ProviderOrder> {
        let access_token = self.tokens.access_token().await?;
        let body = Self::build_order_body(request);

        debug!(
            "Creating PayPal order: redirect={}",
            body.application_context.is_some()
        );

        let response = self
            .client
            .post(self.config.url("/v2/checkout/orders"))
            .bearer_auth(&access_token)
            .header("PayPal-Request-Id", &request.request_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let order = ProviderOrder(Self::read_json(response).await?);

        info!(
            "Created PayPal order: id={}, status={}",
            order.id().unwrap_or("unknown"),
            order.status().unwrap_or("unknown")
        );

        Ok(order)
    }

    #[instrument(skip(self))]
    async fn capture_order(&self, order_id: &str) -> PaymentResult<serde_json::Value> {
        let order_id = validate_order_id(order_id)?;
        let access_token = self.tokens.access_token().await?;

        let url = self
            .config
            .url(&format!("/v2/checkout/orders/{}/capture", order_id));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let capture = Self::read_json(response).await?;

        info!(
            "Captured PayPal order: id={}, status={}",
            order_id,
            capture
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
        );

        Ok(capture)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct PayPalOrderBody {
    intent: &'static str,
    purchase_units: Vec<PayPalPurchaseUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_context: Option<PayPalApplicationContext>,
}

#[derive(Debug, Serialize)]
struct PayPalPurchaseUnit {
    amount: PayPalAmount,
}

#[derive(Debug, Serialize)]
struct PayPalAmount {
    currency_code: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct PayPalApplicationContext {
    return_url: String,
    cancel_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::{Cart, CartItem, CheckoutUrls, Currency};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "A21AAtoken",
                "expires_in": 32400
            })))
            .mount(server)
            .await;
    }

    fn strategy(server: &MockServer) -> PayPalOrdersStrategy {
        let config = PayPalConfig::default()
            .with_credentials("client-id", "client-secret")
            .with_api_base_url(server.uri());
        PayPalOrdersStrategy::new(config).unwrap()
    }

    fn cart() -> Cart {
        Cart::new(vec![CartItem::priced(10.0), CartItem::priced(5.5)]).unwrap()
    }

    #[test]
    fn test_order_body_buttons_flow() {
        let request = OrderRequest::from_cart(&cart(), Currency::USD).unwrap();
        let body = serde_json::to_value(PayPalOrdersStrategy::build_order_body(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "intent": "CAPTURE",
                "purchase_units": [{ "amount": { "currency_code": "USD", "value": "15.50" } }]
            })
        );
    }

    #[test]
    fn test_order_body_redirect_flow() {
        let request = OrderRequest::from_cart(&cart(), Currency::USD).unwrap()
            .with_redirect(CheckoutUrls::new("https://shop.example.com"));
        let body = serde_json::to_value(PayPalOrdersStrategy::build_order_body(&request)).unwrap();

        assert_eq!(
            body["application_context"],
            json!({
                "return_url": "https://shop.example.com/capture-order",
                "cancel_url": "https://shop.example.com/checkout-cancel"
            })
        );
    }

    #[tokio::test]
    async fn test_create_order() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .and(header("authorization", "Bearer A21AAtoken"))
            .and(header_exists("paypal-request-id"))
            .and(body_json(json!({
                "intent": "CAPTURE",
                "purchase_units": [{ "amount": { "currency_code": "USD", "value": "15.50" } }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "5O190127TN364715T",
                "status": "CREATED",
                "links": [{ "href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "rel": "approve", "method": "GET" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = OrderRequest::from_cart(&cart(), Currency::USD).unwrap();
        let order = strategy(&server).create_order(&request).await.unwrap();

        assert_eq!(order.id(), Some("5O190127TN364715T"));
        assert!(order.approve_url().is_some());
    }

    #[tokio::test]
    async fn test_provider_error_keeps_details() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "name": "UNPROCESSABLE_ENTITY",
                "message": "The requested action could not be performed.",
                "debug_id": "f2b5c1a3"
            })))
            .mount(&server)
            .await;

        let request = OrderRequest::from_cart(&cart(), Currency::USD).unwrap();
        let err = strategy(&server).create_order(&request).await.unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("could not be performed"));
        assert_eq!(err.details().unwrap()["debug_id"], "f2b5c1a3");
    }

    #[tokio::test]
    async fn test_capture_order() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/5O190127TN364715T/capture"))
            .and(header("authorization", "Bearer A21AAtoken"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "5O190127TN364715T",
                "status": "COMPLETED"
            })))
            .mount(&server)
            .await;

        let capture = strategy(&server)
            .capture_order("5O190127TN364715T")
            .await
            .unwrap();
        assert_eq!(capture["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn test_capture_rejects_bad_id_before_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = strategy(&server).capture_order("  ").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_unparseable_success_body() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ABC/capture"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = strategy(&server).capture_order("ABC").await.unwrap_err();
        assert!(matches!(err, PaymentError::Serialization(_)));
    }
}

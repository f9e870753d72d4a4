//! # Order Types
//!
//! What the relay asks a provider for, and what it gets back.
//! Orders are never stored; the provider's JSON is passed through as-is.

use crate::cart::Cart;
use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Price};
use crate::strategy::CheckoutUrls;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order to be created at the provider.
///
/// Funds are captured as soon as the payer approves.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Idempotency key for the create call (generated)
    pub request_id: String,

    /// Amount to charge
    pub amount: Price,

    /// Return/cancel URLs for the redirect flow; `None` for embedded buttons
    pub redirect: Option<CheckoutUrls>,
}

impl OrderRequest {
    /// Build a capture order for the cart total
    pub fn from_cart(cart: &Cart, currency: Currency) -> PaymentResult<Self> {
        Ok(Self {
            request_id: Uuid::new_v4().to_string(),
            amount: cart.total(currency)?,
            redirect: None,
        })
    }

    /// Builder: attach return/cancel URLs
    pub fn with_redirect(mut self, urls: CheckoutUrls) -> Self {
        self.redirect = Some(urls);
        self
    }
}

/// A HATEOAS link from a provider response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLink {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// An order object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOrder(pub serde_json::Value);

impl ProviderOrder {
    /// Provider-assigned order id
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    /// Order status (`CREATED`, `APPROVED`, `COMPLETED`, ...)
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(|v| v.as_str())
    }

    /// Links with a parseable shape; malformed entries are skipped
    pub fn links(&self) -> Vec<OrderLink> {
        self.0
            .get("links")
            .and_then(|v| v.as_array())
            .map(|links| {
                links
                    .iter()
                    .filter_map(|l| serde_json::from_value(l.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// URL the payer must visit to approve the order
    pub fn approve_url(&self) -> Option<String> {
        self.links()
            .into_iter()
            .find(|l| l.rel == "approve")
            .map(|l| l.href)
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

/// Check that an order id can be placed in a provider URL path.
///
/// Provider ids are alphanumeric; `-` and `_` are tolerated.
pub fn validate_order_id(id: &str) -> PaymentResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(PaymentError::InvalidRequest("Missing order id".to_string()));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PaymentError::InvalidRequest(format!(
            "Invalid order id: {}",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use serde_json::json;

    #[test]
    fn test_order_request_from_cart() {
        let cart = Cart::new(vec![CartItem::priced(10.0), CartItem::priced(5.5)]).unwrap();
        let request = OrderRequest::from_cart(&cart, Currency::USD).unwrap();

        assert_eq!(request.amount.provider_value(), "15.50");
        assert!(request.redirect.is_none());

        let other = OrderRequest::from_cart(&cart, Currency::USD).unwrap();
        assert_ne!(request.request_id, other.request_id);
    }

    #[test]
    fn test_order_request_rejects_oversized_cart() {
        let cart = Cart::new(vec![CartItem::priced(1e17)]).unwrap();
        let err = OrderRequest::from_cart(&cart, Currency::USD).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_approve_url() {
        let order = ProviderOrder(json!({
            "id": "5O190127TN364715T",
            "status": "CREATED",
            "links": [
                { "href": "https://api.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T", "rel": "self", "method": "GET" },
                { "href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "rel": "approve", "method": "GET" }
            ]
        }));

        assert_eq!(order.id(), Some("5O190127TN364715T"));
        assert_eq!(order.status(), Some("CREATED"));
        assert_eq!(
            order.approve_url().as_deref(),
            Some("https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T")
        );
    }

    #[test]
    fn test_approve_url_missing() {
        assert!(ProviderOrder(json!({ "id": "X" })).approve_url().is_none());
        assert!(ProviderOrder(json!({ "links": [{ "rel": "approve" }] }))
            .approve_url()
            .is_none());
    }

    #[test]
    fn test_validate_order_id() {
        assert_eq!(validate_order_id(" 5O190127TN364715T ").unwrap(), "5O190127TN364715T");
        assert_eq!(validate_order_id("").unwrap_err().status_code(), 400);
        assert!(validate_order_id("../v1/oauth2/token").is_err());
        assert!(validate_order_id("abc?x=1").is_err());
    }
}

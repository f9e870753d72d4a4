//! # Payment Strategy Trait
//!
//! Seam between the HTTP layer and a payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_order()                                         │
//! │  ├── capture_order()                                        │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴────────┐
//!                    │ PayPalOrders   │
//!                    │   Strategy     │
//!                    └────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::{OrderRequest, ProviderOrder};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
///
/// Implementations own their credentials and token handling; callers only
/// see orders and capture results.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create an order at the provider.
    ///
    /// # Arguments
    /// * `request` - Amount and optional return/cancel URLs
    ///
    /// # Returns
    /// The provider's order object, untouched.
    async fn create_order(&self, request: &OrderRequest) -> PaymentResult<ProviderOrder>;

    /// Capture payment for an approved order.
    ///
    /// # Returns
    /// The provider's capture result, untouched.
    async fn capture_order(&self, order_id: &str) -> PaymentResult<serde_json::Value>;

    /// Get the provider name (for logging and error reporting).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Return/cancel URLs handed to the provider for the redirect flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Base URL of the application (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Path the payer returns to after approving
    pub return_path: String,
    /// Path the payer returns to after cancelling
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            return_path: "/capture-order".to_string(),
            cancel_path: "/checkout-cancel".to_string(),
        }
    }

    pub fn return_url(&self) -> String {
        format!("{}{}", self.base_url, self.return_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

//! # pay-paypal
//!
//! PayPal payment strategy for the storefront checkout relay.
//!
//! - **PayPalOrdersStrategy** - Orders v2 API (`/v2/checkout/orders`)
//!   - Redirect flow: order carries return/cancel URLs, payer follows the
//!     `approve` link
//!   - Button flow: order id is handed to the JS SDK, capture is called back
//! - **TokenBroker** - client-credentials exchange, backed by a `TokenCache`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_paypal::PayPalOrdersStrategy;
//! use pay_core::{Cart, Currency, OrderRequest, PaymentStrategy};
//!
//! // PAYPAL_ENV, PAYPAL_CLIENT_ID, PAYPAL_CLIENT_SECRET
//! let strategy = PayPalOrdersStrategy::from_env()?;
//!
//! let order = strategy
//!     .create_order(&OrderRequest::from_cart(&cart, Currency::USD)?)
//!     .await?;
//!
//! // ...payer approves in the PayPal popup...
//! let capture = strategy.capture_order(order.id().unwrap()).await?;
//! ```

pub mod config;
pub mod orders;
pub mod token;

// Re-exports
pub use config::{PayPalConfig, PayPalEnvironment};
pub use orders::{http_client, PayPalOrdersStrategy};
pub use token::{TokenBroker, TokenCache};

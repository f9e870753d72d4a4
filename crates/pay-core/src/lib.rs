//! # pay-core
//!
//! Core types and traits for the storefront checkout relay.
//!
//! This crate provides:
//! - `PaymentStrategy` trait for implementing payment providers
//! - `Cart` and `CartItem` for validated storefront carts
//! - `OrderRequest` and `ProviderOrder` for the order lifecycle
//! - `Currency` and `Price` for amounts
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Cart, CartItem, CheckoutUrls, Currency, OrderRequest, PaymentStrategy};
//!
//! let cart = Cart::new(vec![CartItem::priced(10.0), CartItem::priced(5.5)])?;
//! let request = OrderRequest::from_cart(&cart, Currency::USD)?
//!     .with_redirect(CheckoutUrls::new("https://shop.example.com"));
//!
//! let order = strategy.create_order(&request).await?;
//! // Redirect the payer to order.approve_url()
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use cart::{Cart, CartItem};
pub use error::{PaymentError, PaymentResult};
pub use money::{Currency, Price};
pub use order::{validate_order_id, OrderLink, OrderRequest, ProviderOrder};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};

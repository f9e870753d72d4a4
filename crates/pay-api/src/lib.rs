//! # pay-api
//!
//! HTTP API layer for the storefront checkout relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order creation and capture endpoints for the PayPal redirect and
//!   JS SDK button flows
//! - Static hosting for the storefront pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Publishable client id and environment |
//! | POST | `/create-order` | Create order, return approve URL |
//! | POST | `/api/orders` | Create order, return provider order |
//! | POST | `/api/orders/{id}/capture` | Capture order |
//! | GET | `/capture-order` | Provider return URL (HTML) |
//! | GET | `/checkout-cancel` | Provider cancel URL (HTML) |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};

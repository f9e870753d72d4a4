//! # Routes
//!
//! Axum router configuration for the checkout relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Redirect flow:
///   - POST /create-order - Create order, return approve URL
///   - GET  /capture-order - Provider return URL, captures and renders a page
///   - GET  /checkout-cancel - Provider cancel URL
///
/// - JS SDK buttons:
///   - POST /api/orders - Create order, return provider order
///   - POST /api/orders/{id}/capture - Capture order
///   - GET  /config - Publishable client id and environment
///
/// - Anything else is served from `STATIC_DIR`
pub fn create_router(state: AppState) -> Router {
    // The storefront may be hosted elsewhere than the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    let api_routes = Router::new()
        .route("/orders", post(handlers::create_order))
        .route("/orders/{order_id}/capture", post(handlers::capture_order));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::public_config))
        // Redirect flow
        .route("/create-order", post(handlers::create_order_redirect))
        .route("/capture-order", get(handlers::capture_order_callback))
        .route("/checkout-cancel", get(handlers::checkout_cancel))
        // Buttons flow
        .nest("/api", api_routes)
        // Storefront pages and assets
        .fallback_service(static_files)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

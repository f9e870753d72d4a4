//! # Request Handlers
//!
//! Axum request handlers for the checkout relay.
//! JSON endpoints serve the storefront scripts; the capture and cancel
//! pages are where PayPal sends the payer back in the redirect flow.

use crate::state::AppState;
use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use pay_core::{Cart, CartItem, Currency, OrderRequest, PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Checkout currency
const CURRENCY: Currency = Currency::USD;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request (both flows)
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Items in the storefront cart
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
}

/// Redirect-flow response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Where to send the payer
    pub approve_url: String,
    /// Raw provider order
    pub order: serde_json::Value,
}

/// Publishable provider settings for the JS SDK
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfigResponse {
    pub paypal_client_id: String,
    pub env: String,
}

/// Query of the provider's return redirect
#[derive(Debug, Deserialize)]
pub struct CaptureQuery {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "orderID")]
    pub order_id: Option<String>,
}

impl CaptureQuery {
    /// `token` wins over `orderID`; blank values count as absent
    pub fn order_token(&self) -> Option<&str> {
        [self.token.as_deref(), self.order_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let PaymentError::ProviderError {
        details: Some(details),
        ..
    } = err
    {
        response = response.with_details(details);
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Log and convert; every failure is logged server-side
fn fail(context: &str, err: PaymentError) -> ApiError {
    if err.status_code() < 500 {
        warn!("{}: {}", context, err);
    } else {
        error!("{}: {}", context, err);
    }
    payment_error_to_response(err)
}

/// Validate the body of a create-order call.
///
/// Body rejections (not JSON, wrong shape, missing price) are client errors.
fn parse_cart(body: Result<Json<CreateOrderRequest>, JsonRejection>) -> PaymentResult<Cart> {
    let Json(request) = body.map_err(|rejection| {
        PaymentError::InvalidRequest(format!("Malformed cart: {}", rejection.body_text()))
    })?;
    Cart::from_request(request.cart)
}

// =============================================================================
// Pages
// =============================================================================

#[derive(Template)]
#[template(path = "capture_success.html")]
struct CaptureSuccessPage<'a> {
    order_id: &'a str,
    capture_json: String,
}

#[derive(Template)]
#[template(path = "checkout_cancel.html")]
struct CheckoutCancelPage;

fn render(page: &impl Template) -> PaymentResult<Html<String>> {
    page.render()
        .map(Html)
        .map_err(|e| PaymentError::Internal(format!("Failed to render page: {}", e)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Publishable client id and environment; never the secret
pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfigResponse> {
    Json(PublicConfigResponse {
        paypal_client_id: state.paypal.public_client_id().to_string(),
        env: state.paypal.environment.to_string(),
    })
}

/// Create an order for the redirect flow and return its approve link
#[instrument(skip(state, body))]
pub async fn create_order_redirect(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let cart = parse_cart(body).map_err(|e| fail("Rejected cart", e))?;

    let request = OrderRequest::from_cart(&cart, CURRENCY)
        .map_err(|e| fail("Rejected cart", e))?
        .with_redirect(state.urls.clone());

    info!(
        "Creating redirect order: {} items, total={}",
        cart.len(),
        request.amount
    );

    let order = state
        .strategy
        .create_order(&request)
        .await
        .map_err(|e| fail("Failed to create order", e))?;

    let Some(approve_url) = order.approve_url() else {
        return Err(fail(
            "Order without approve link",
            PaymentError::ProviderError {
                provider: state.strategy.provider_name().to_string(),
                message: "No approve link".to_string(),
                details: Some(order.into_inner()),
            },
        ));
    };

    Ok(Json(CreateOrderResponse {
        approve_url,
        order: order.into_inner(),
    }))
}

/// Create an order for the JS SDK buttons and return it as-is
#[instrument(skip(state, body))]
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cart = parse_cart(body).map_err(|e| fail("Rejected cart", e))?;

    let request =
        OrderRequest::from_cart(&cart, CURRENCY).map_err(|e| fail("Rejected cart", e))?;

    info!(
        "Creating button order: {} items, total={}",
        cart.len(),
        request.amount
    );

    let order = state
        .strategy
        .create_order(&request)
        .await
        .map_err(|e| fail("Failed to create order", e))?;

    Ok(Json(order.into_inner()))
}

/// Capture an approved order (buttons flow)
#[instrument(skip(state))]
pub async fn capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let capture = state
        .strategy
        .capture_order(&order_id)
        .await
        .map_err(|e| fail("Failed to capture order", e))?;

    Ok(Json(capture))
}

/// Provider return URL: capture and show a success page
#[instrument(skip(state, query))]
pub async fn capture_order_callback(
    State(state): State<AppState>,
    Query(query): Query<CaptureQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let Some(order_id) = query.order_token() else {
        warn!("Capture callback without order token");
        return Err((StatusCode::BAD_REQUEST, "Missing order token".to_string()));
    };

    capture_page(&state, order_id).await.map_err(|e| {
        error!("Capture callback failed: {}", e);
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, format!("Capture error: {}", e))
    })
}

async fn capture_page(state: &AppState, order_id: &str) -> PaymentResult<Html<String>> {
    let capture = state.strategy.capture_order(order_id).await?;
    let capture_json = serde_json::to_string_pretty(&capture)
        .map_err(|e| PaymentError::Serialization(e.to_string()))?;
    render(&CaptureSuccessPage {
        order_id,
        capture_json,
    })
}

/// Provider cancel URL
pub async fn checkout_cancel() -> Result<Html<String>, (StatusCode, String)> {
    render(&CheckoutCancelPage).map_err(|e| {
        error!("{}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

//! # Payment Error Types
//!
//! Typed error handling for the checkout relay.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing credentials, invalid environment)
    #[error("{0}")]
    Configuration(String),

    /// Invalid request data (empty cart, bad price, missing order id)
    #[error("{0}")]
    InvalidRequest(String),

    /// Provider refused to issue an access token
    #[error("{0}")]
    Authentication(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        message: String,
        /// Raw provider body, surfaced to the client for diagnostics
        details: Option<serde_json::Value>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Shorthand for a provider error without an attached body
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Only validation failures are the caller's fault; everything else,
    /// upstream failures included, is reported as a server error.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Configuration(_)
            | PaymentError::Authentication(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::Internal(_)
            | PaymentError::Serialization(_) => 500,
        }
    }

    /// Provider body attached to the error, if any
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            PaymentError::ProviderError { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PaymentError::InvalidRequest("Cart required".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::Configuration("Missing PayPal credentials in env".into()).status_code(),
            500
        );
        assert_eq!(PaymentError::provider("paypal", "boom").status_code(), 500);
        assert_eq!(
            PaymentError::Authentication("denied".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_messages_are_surfaced_verbatim() {
        let err = PaymentError::Authentication("Could not get access token: {}".into());
        assert_eq!(err.to_string(), "Could not get access token: {}");

        let err = PaymentError::provider("paypal", "No approve link");
        assert_eq!(err.to_string(), "Provider error [paypal]: No approve link");
    }

    #[test]
    fn test_details() {
        let err = PaymentError::ProviderError {
            provider: "paypal".into(),
            message: "No approve link".into(),
            details: Some(serde_json::json!({ "id": "5O190127TN364715T" })),
        };
        assert_eq!(err.details().unwrap()["id"], "5O190127TN364715T");
        assert!(PaymentError::NetworkError("reset".into()).details().is_none());
    }
}

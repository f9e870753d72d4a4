//! # Cart Types
//!
//! The storefront posts its cart as `{ "cart": [{ "price": 10 }, ...] }`.
//! Only `price` matters to the backend; display fields (name, image, ...)
//! are carried along untouched.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};

/// A single cart entry as sent by the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Unit price in major currency units (e.g. dollars)
    pub price: f64,

    /// Display fields the frontend keeps on the item
    #[serde(flatten)]
    pub display: serde_json::Map<String, serde_json::Value>,
}

impl CartItem {
    /// Create an item with only a price
    pub fn priced(price: f64) -> Self {
        Self {
            price,
            display: serde_json::Map::new(),
        }
    }
}

/// A validated, non-empty cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Validate a list of items into a cart.
    ///
    /// Rejects an empty list and any price that is negative or not finite.
    pub fn new(items: Vec<CartItem>) -> PaymentResult<Self> {
        if items.is_empty() {
            return Err(PaymentError::InvalidRequest("Cart required".to_string()));
        }

        if let Some((index, item)) = items
            .iter()
            .enumerate()
            .find(|(_, item)| !item.price.is_finite() || item.price < 0.0)
        {
            return Err(PaymentError::InvalidRequest(format!(
                "Invalid price for cart item {}: {}",
                index, item.price
            )));
        }

        Ok(Self { items })
    }

    /// Validate the optional `cart` field of a request body
    pub fn from_request(cart: Option<Vec<CartItem>>) -> PaymentResult<Self> {
        match cart {
            Some(items) => Self::new(items),
            None => Err(PaymentError::InvalidRequest("Cart required".to_string())),
        }
    }

    /// Sum of item prices, rounded once to the currency's smallest unit.
    ///
    /// Fails when the sum does not fit the currency's smallest unit.
    pub fn total(&self, currency: Currency) -> PaymentResult<Price> {
        let sum: f64 = self.items.iter().map(|item| item.price).sum();
        Price::new(sum, currency)
            .map_err(|_| PaymentError::InvalidRequest(format!("Cart total out of range: {}", sum)))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed cart
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(prices: &[f64]) -> Cart {
        Cart::new(prices.iter().copied().map(CartItem::priced).collect()).unwrap()
    }

    #[test]
    fn test_total_two_decimals() {
        let total = cart(&[10.0, 5.5]).total(Currency::USD).unwrap();
        assert_eq!(total.amount, 1550);
        assert_eq!(total.provider_value(), "15.50");
    }

    #[test]
    fn test_total_rounds_once() {
        let total = |prices: &[f64]| cart(prices).total(Currency::USD).unwrap().provider_value();

        assert_eq!(total(&[0.1, 0.2]), "0.30");
        assert_eq!(total(&[19.999]), "20.00");
        assert_eq!(total(&[0.005, 0.01]), "0.01");
        assert_eq!(total(&[1.005]), "1.00");
    }

    #[test]
    fn test_oversized_total_rejected() {
        let err = cart(&[1e17]).total(Currency::USD).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("Cart total out of range"));

        // Each price is finite but the sum is not
        assert!(cart(&[f64::MAX, f64::MAX]).total(Currency::USD).is_err());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = Cart::new(Vec::new()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Cart required");

        assert!(Cart::from_request(None).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = Cart::new(vec![CartItem::priced(5.0), CartItem::priced(-1.0)]).unwrap_err();
        assert!(err.to_string().contains("cart item 1"));
    }

    #[test]
    fn test_display_fields_kept() {
        let items: Vec<CartItem> = serde_json::from_value(serde_json::json!([
            { "price": 12.5, "name": "Mug", "image": "/img/mug.png" }
        ]))
        .unwrap();
        let cart = Cart::new(items).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].display["name"], "Mug");
    }

    #[test]
    fn test_missing_price_is_malformed() {
        let parsed: Result<Vec<CartItem>, _> =
            serde_json::from_value(serde_json::json!([{ "name": "Mug" }]));
        assert!(parsed.is_err());
    }
}

//! # Money Types
//!
//! Currency and price types shared by the cart and the provider strategies.

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Checkout currency (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code, as the provider expects it
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::USD => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents).
    ///
    /// The exact binary value of `amount` is rounded half away from zero,
    /// so `0.015` (stored just below the half cent) becomes 1 cent and
    /// `0.125` becomes 13. Amounts that do not fit in an `i64` of cents
    /// are rejected.
    pub fn to_smallest_unit(&self, amount: f64) -> PaymentResult<i64> {
        let places = self.decimal_places();
        let scale = Decimal::from(10_i64.pow(places));

        Decimal::from_f64_retain(amount)
            .map(|exact| {
                exact.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
            })
            .and_then(|rounded| rounded.checked_mul(scale))
            .and_then(|units| units.to_i64())
            .ok_or_else(|| PaymentError::InvalidRequest(format!("Amount out of range: {}", amount)))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> PaymentResult<Self> {
        Ok(Self {
            amount: currency.to_smallest_unit(amount)?,
            currency,
        })
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Decimal string with exactly the currency's decimal places
    /// (`"15.50"`), the format the provider's `amount.value` takes.
    pub fn provider_value(&self) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        format!(
            "{sign}{}.{:0width$}",
            abs / divisor,
            abs % divisor,
            width = places as usize
        )
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.provider_value(), self.currency)
    }
}

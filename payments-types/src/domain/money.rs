//! Monetary value with embedded currency code.

use serde::{Deserialize, Serialize};

/// Money representation with an embedded currency code.
///
/// Amount is stored in the smallest unit of the currency (cents, pence, etc.)
/// to avoid floating-point precision issues. The currency code is carried as-is;
/// whether it names a real currency is for the bank to decide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: String,
}

impl Money {
    /// Creates a new Money value.
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Returns the amount in smallest currency unit.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

//! Payment domain model.

use serde::{Deserialize, Serialize};

use super::customer::Customer;
use super::merchant::{Merchant, MerchantId};
use super::money::Money;

/// Unique identifier for a Payment.
///
/// Assigned by the payment service at creation time, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    /// Creates a PaymentId from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PaymentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A payment as submitted by a merchant, before it has been charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    pub merchant_id: MerchantId,
    pub customer: Customer,
    pub price: Money,
}

/// A charged payment.
///
/// Identity and merchant binding never change once created. The only
/// permitted mutation is the refund transition (see [`Payment::mark_refunded`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Merchant id plus the account snapshot taken at charge time
    pub merchant: Merchant,
    pub customer: Customer,
    pub price: Money,
    /// Opaque id assigned by the bank
    pub bank_transaction_id: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
    pub refunded: bool,
    /// Milliseconds since epoch, 0 until refunded
    pub refund_timestamp: i64,
}

impl Payment {
    /// Builds the record for a payment the bank has just charged.
    pub fn charged(
        new: NewPayment,
        id: PaymentId,
        merchant: Merchant,
        bank_transaction_id: String,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            merchant,
            customer: new.customer,
            price: new.price,
            bank_transaction_id,
            timestamp,
            refunded: false,
            refund_timestamp: 0,
        }
    }

    /// Reconstructs a payment from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentId,
        merchant: Merchant,
        customer: Customer,
        price: Money,
        bank_transaction_id: String,
        timestamp: i64,
        refunded: bool,
        refund_timestamp: i64,
    ) -> Self {
        Self {
            id,
            merchant,
            customer,
            price,
            bank_transaction_id,
            timestamp,
            refunded,
            refund_timestamp,
        }
    }

    /// Marks the payment as refunded at `at` (milliseconds since epoch).
    ///
    /// Not idempotent: refunding again overwrites the refund timestamp.
    pub fn mark_refunded(&mut self, at: i64) {
        self.refunded = true;
        self.refund_timestamp = at;
    }
}

/// Read-only view of a payment without card details or bank transaction id.
///
/// This is the only representation handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub id: PaymentId,
    pub merchant_id: MerchantId,
    pub customer_id: String,
    pub price: Money,
    pub timestamp: i64,
    pub refunded: bool,
    pub refund_timestamp: i64,
}

impl From<&Payment> for PaymentDetails {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.clone(),
            merchant_id: payment.merchant.id.clone(),
            customer_id: payment.customer.id.clone(),
            price: payment.price.clone(),
            timestamp: payment.timestamp,
            refunded: payment.refunded,
            refund_timestamp: payment.refund_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountDetails, CardDetails};

    fn new_payment() -> NewPayment {
        NewPayment {
            merchant_id: MerchantId::from("m1"),
            customer: Customer {
                id: "c1".to_string(),
                card_details: CardDetails {
                    holder_name: "Test Customer".to_string(),
                    number: "1234123412341234".to_string(),
                    security_code: 123,
                    expiration_date: "12/23".to_string(),
                },
            },
            price: Money::new(1000, "USD"),
        }
    }

    fn merchant() -> Merchant {
        Merchant {
            id: MerchantId::from("m1"),
            account_details: AccountDetails {
                holder_name: "Test Merchant".to_string(),
                iban: "DE89370400440532013000".to_string(),
                bic: "COBADEFFXXX".to_string(),
                currency: "EUR".to_string(),
            },
        }
    }

    #[test]
    fn test_charged_payment_starts_unrefunded() {
        let payment = Payment::charged(
            new_payment(),
            PaymentId::from("p1"),
            merchant(),
            "tx-1".to_string(),
            100_000,
        );

        assert_eq!(payment.id.as_str(), "p1");
        assert_eq!(payment.merchant, merchant());
        assert_eq!(payment.bank_transaction_id, "tx-1");
        assert!(!payment.refunded);
        assert_eq!(payment.refund_timestamp, 0);
    }

    #[test]
    fn test_mark_refunded_overwrites_timestamp() {
        let mut payment = Payment::charged(
            new_payment(),
            PaymentId::from("p1"),
            merchant(),
            "tx-1".to_string(),
            100,
        );

        payment.mark_refunded(200);
        assert!(payment.refunded);
        assert_eq!(payment.refund_timestamp, 200);

        payment.mark_refunded(300);
        assert!(payment.refunded);
        assert_eq!(payment.refund_timestamp, 300);
    }

    #[test]
    fn test_details_strip_sensitive_fields() {
        let payment = Payment::charged(
            new_payment(),
            PaymentId::from("p1"),
            merchant(),
            "tx-1".to_string(),
            100,
        );

        let details = PaymentDetails::from(&payment);
        assert_eq!(details.id.as_str(), "p1");
        assert_eq!(details.merchant_id.as_str(), "m1");
        assert_eq!(details.customer_id, "c1");
        assert_eq!(details.price, Money::new(1000, "USD"));

        let json = serde_json::to_string(&details).unwrap();
        assert!(!json.contains("1234123412341234"));
        assert!(!json.contains("tx-1"));
    }
}

//! Customer and card details.

use serde::{Deserialize, Serialize};

/// Card used to pay for a single payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub holder_name: String,
    /// 16 digit card number
    pub number: String,
    /// 3 digit CVV, 100..=999
    pub security_code: u16,
    /// Expiration date as entered (e.g. "12/23"), never parsed here
    pub expiration_date: String,
}

/// The paying customer.
///
/// Customers are not stored on their own; they only exist embedded in a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub card_details: CardDetails,
}

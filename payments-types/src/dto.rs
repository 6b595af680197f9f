//! Data Transfer Objects (DTOs) for inbound requests.

use serde::{Deserialize, Serialize};

use crate::domain::{CardDetails, Customer, MerchantId, Money, NewPayment};
use crate::error::DomainError;

/// Request to charge a customer's card for a merchant.
///
/// The merchant is not part of the body; it comes from the caller's
/// authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePaymentRequest {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    pub customer_name: String,
    pub card_number: String,
    #[serde(rename = "CardCVV")]
    pub card_cvv: u16,
    pub card_expiry_date: String,
    /// Price in smallest currency unit
    pub price: i64,
    pub currency: String,
}

impl CreatePaymentRequest {
    /// Checks every field of the request.
    ///
    /// Each failing field contributes its first problem. A single failure is
    /// returned as is; several are returned together as [`DomainError::Invalid`].
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        if self.customer_id.is_empty() {
            errors.push(DomainError::MissingField("CustomerID"));
        } else if self.customer_id.contains('#') {
            // '#' delimits packed storage fields
            errors.push(DomainError::ReservedCharacter {
                field: "CustomerID",
            });
        }
        if self.customer_name.is_empty() {
            errors.push(DomainError::MissingField("CustomerName"));
        }
        if self.card_number.is_empty() {
            errors.push(DomainError::MissingField("CardNumber"));
        } else if self.card_number.len() != 16
            || !self.card_number.bytes().all(|b| b.is_ascii_digit())
        {
            errors.push(DomainError::InvalidCardNumber);
        }
        if !(100..=999).contains(&self.card_cvv) {
            errors.push(DomainError::InvalidSecurityCode(self.card_cvv));
        }
        if self.card_expiry_date.is_empty() {
            errors.push(DomainError::MissingField("CardExpiryDate"));
        }
        // Negative amounts are well-formed
        if self.price == 0 {
            errors.push(DomainError::ZeroAmount);
        }
        if self.currency.is_empty() {
            errors.push(DomainError::MissingField("Currency"));
        } else if self.currency.contains('#') {
            errors.push(DomainError::ReservedCharacter { field: "Currency" });
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(DomainError::Invalid(errors)),
        }
    }

    /// Validates the request and turns it into a payment for `merchant_id`.
    pub fn into_new_payment(self, merchant_id: MerchantId) -> Result<NewPayment, DomainError> {
        self.validate()?;
        if merchant_id.as_str().is_empty() {
            return Err(DomainError::MissingField("MerchantID"));
        }
        if merchant_id.as_str().contains('#') {
            return Err(DomainError::ReservedCharacter {
                field: "MerchantID",
            });
        }

        Ok(NewPayment {
            merchant_id,
            customer: Customer {
                id: self.customer_id,
                card_details: CardDetails {
                    holder_name: self.customer_name,
                    number: self.card_number,
                    security_code: self.card_cvv,
                    expiration_date: self.card_expiry_date,
                },
            },
            price: Money::new(self.price, self.currency),
        })
    }
}

//! Merchant domain model.

use serde::{Deserialize, Serialize};

/// Unique identifier for a Merchant.
///
/// Merchant ids come from the authenticated identity of the caller
/// (e.g. `test@merchant`) and are treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(String);

impl MerchantId {
    /// Creates a MerchantId from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MerchantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MerchantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MerchantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Settlement account of a merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub holder_name: String,
    pub iban: String,
    pub bic: String,
    pub currency: String,
}

/// A merchant and the account its payments settle into.
///
/// Merchants are onboarded elsewhere; the payment core only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: MerchantId,
    pub account_details: AccountDetails,
}

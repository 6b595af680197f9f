//! Bank client port.
//!
//! This trait defines the interface to the bank that charges customers.
//! Implementations can be a simulator, a real bank integration, mocks, etc.

use crate::domain::{AccountDetails, CardDetails, Money};
use crate::error::BankError;

/// Port trait for the bank collaborator.
#[async_trait::async_trait]
pub trait BankClient: Send + Sync + 'static {
    /// Asks the bank whether the card can be charged. No money moves.
    async fn validate_card_information(&self, card: &CardDetails) -> Result<(), BankError>;

    /// Charges the card and settles into `account`.
    /// Returns the bank's opaque transaction id.
    async fn process_transaction(
        &self,
        account: &AccountDetails,
        card: &CardDetails,
        money: &Money,
    ) -> Result<String, BankError>;

    /// Reverts a previously processed transaction, identified by its id alone.
    async fn revert_transaction(&self, transaction_id: &str) -> Result<(), BankError>;
}

//! Simulated bank for development and testing.
//!
//! Stands in for a real bank integration behind the [`BankClient`] port.
//! The simulator never talks to the network; it logs every request and
//! either approves or declines it depending on how it was built.
//!
//! # Example
//! ```
//! use bank_simulator::BankSimulator;
//!
//! let approving = BankSimulator::new();
//! let declining = BankSimulator::declining("card reported stolen");
//! assert!(approving.is_approving());
//! assert!(!declining.is_approving());
//! ```
//!
//! Reverts are accepted for any transaction id: the simulator assumes the
//! bank can revert a charge by its id alone.

use async_trait::async_trait;
use payments_types::{AccountDetails, BankClient, BankError, CardDetails, Money};

/// Prefix of every transaction id handed out by the simulator.
pub const TRANSACTION_ID_PREFIX: &str = "sim_";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Approve,
    Decline(String),
}

/// Bank client that approves (or declines) everything without moving money.
#[derive(Debug, Clone)]
pub struct BankSimulator {
    mode: Mode,
}

impl BankSimulator {
    /// Creates a simulator that approves every request.
    pub fn new() -> Self {
        Self {
            mode: Mode::Approve,
        }
    }

    /// Creates a simulator that declines every request with `reason`.
    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            mode: Mode::Decline(reason.into()),
        }
    }

    /// Returns true if this simulator approves requests.
    pub fn is_approving(&self) -> bool {
        self.mode == Mode::Approve
    }

    fn check(&self, reject: fn(String) -> BankError) -> Result<(), BankError> {
        match &self.mode {
            Mode::Approve => Ok(()),
            Mode::Decline(reason) => {
                tracing::warn!(%reason, "simulated bank declined request");
                Err(reject(reason.clone()))
            }
        }
    }
}

impl Default for BankSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BankClient for BankSimulator {
    async fn validate_card_information(&self, card: &CardDetails) -> Result<(), BankError> {
        tracing::info!(
            holder = %card.holder_name,
            "requesting bank to validate card information"
        );
        self.check(BankError::CardRejected)
    }

    async fn process_transaction(
        &self,
        account: &AccountDetails,
        _card: &CardDetails,
        money: &Money,
    ) -> Result<String, BankError> {
        // a real bank charges the card, then transfers to the merchant account
        tracing::info!(
            iban = %account.iban,
            amount = money.amount(),
            currency = %money.currency(),
            "requesting bank to process transaction"
        );
        self.check(BankError::TransactionDeclined)?;

        Ok(format!(
            "{}{}",
            TRANSACTION_ID_PREFIX,
            uuid::Uuid::new_v4().simple()
        ))
    }

    async fn revert_transaction(&self, transaction_id: &str) -> Result<(), BankError> {
        tracing::info!(%transaction_id, "requesting bank to revert transaction");
        self.check(BankError::RevertRejected)
    }
}

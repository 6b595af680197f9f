//! Repository port trait.
//!
//! This is the primary storage port in our hexagonal architecture.
//! Adapters (in-memory map, single-table key-value store) implement this trait.

use crate::domain::{Merchant, MerchantId, Payment, PaymentId};
use crate::error::RepoError;

/// The repository port for merchant and payment records.
///
/// Payments are always addressed by `(merchant id, payment id)`. Lookups of
/// missing records return `RepoError::NotFound`, never a default value.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Gets a merchant and its settlement account.
    async fn get_merchant_details(&self, merchant_id: &MerchantId) -> Result<Merchant, RepoError>;

    /// Writes a new payment record.
    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Persists the full current state of a payment.
    async fn update_payment(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Gets a payment owned by `merchant_id`.
    async fn get_payment(
        &self,
        merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<Payment, RepoError>;
}

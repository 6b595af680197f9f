//! Payment Application Service
//!
//! Orchestrates the payment lifecycle through the bank and repository ports.
//! Contains NO infrastructure logic - pure business orchestration.
//!
//! Failures are logged and returned as they are. Nothing is retried and no
//! completed step is compensated: a charge whose record fails to persist stays
//! charged, and a revert whose update fails leaves the payment unmarked.

use std::sync::Arc;

use payments_types::{
    AppError, BankClient, Clock, IdGenerator, MerchantId, NewPayment, Payment, PaymentDetails,
    PaymentId, PaymentRepository, RepoError, SystemClock, UuidGenerator,
};

/// Application service for payment operations.
///
/// Generic over `R: PaymentRepository` and `B: BankClient` - the adapters are
/// injected at compile time. Time and payment ids come from injected sources so
/// tests can pin them.
pub struct PaymentService<R: PaymentRepository, B: BankClient> {
    repo: R,
    bank: B,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<R: PaymentRepository, B: BankClient> PaymentService<R, B> {
    /// Creates a payment service using the system clock and UUID payment ids.
    pub fn new(repo: R, bank: B) -> Self {
        Self::with_dependencies(repo, bank, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Creates a payment service with explicit time and id sources.
    pub fn with_dependencies(
        repo: R,
        bank: B,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repo,
            bank,
            clock,
            ids,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the bank client.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Charges a new payment and records it.
    ///
    /// Steps run in order and the first failure stops the rest:
    /// validate card, load merchant, charge, persist.
    #[tracing::instrument(skip_all, fields(merchant_id = %payment.merchant_id, customer_id = %payment.customer.id))]
    pub async fn create_payment(&self, payment: NewPayment) -> Result<PaymentId, AppError> {
        let card = &payment.customer.card_details;

        if let Err(e) = self.bank.validate_card_information(card).await {
            tracing::error!(error = %e, "card validation failed");
            return Err(e.into());
        }

        let merchant = self
            .repo
            .get_merchant_details(&payment.merchant_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load merchant details");
                not_found_as(e, || format!("Merchant {}", payment.merchant_id))
            })?;

        let transaction_id = self
            .bank
            .process_transaction(&merchant.account_details, card, &payment.price)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "bank transaction failed");
                AppError::from(e)
            })?;

        let id = self.ids.next_payment_id();
        let record = Payment::charged(
            payment,
            id.clone(),
            merchant,
            transaction_id,
            self.clock.now_millis(),
        );

        if let Err(e) = self.repo.create_payment(&record).await {
            // The charge has gone through; it is not reverted here.
            tracing::error!(
                error = %e,
                payment_id = %id,
                bank_transaction_id = %record.bank_transaction_id,
                "failed to persist charged payment"
            );
            return Err(e.into());
        }

        tracing::info!(payment_id = %id, "payment created");
        Ok(id)
    }

    /// Gets the caller-facing view of a payment owned by `merchant_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get_payment_details(
        &self,
        merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<PaymentDetails, AppError> {
        let payment = self.load_payment(merchant_id, payment_id).await?;

        tracing::info!("payment details read");
        Ok(PaymentDetails::from(&payment))
    }

    /// Reverts the bank transaction of a payment and marks it refunded.
    ///
    /// Refunding an already refunded payment reverts again and overwrites
    /// the refund timestamp.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(
        &self,
        merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<(), AppError> {
        let mut payment = self.load_payment(merchant_id, payment_id).await?;

        if let Err(e) = self
            .bank
            .revert_transaction(&payment.bank_transaction_id)
            .await
        {
            tracing::error!(
                error = %e,
                bank_transaction_id = %payment.bank_transaction_id,
                "bank revert failed"
            );
            return Err(e.into());
        }

        payment.mark_refunded(self.clock.now_millis());

        if let Err(e) = self.repo.update_payment(&payment).await {
            tracing::error!(
                error = %e,
                bank_transaction_id = %payment.bank_transaction_id,
                "failed to persist refund after revert"
            );
            return Err(e.into());
        }

        tracing::info!(refund_timestamp = payment.refund_timestamp, "payment refunded");
        Ok(())
    }

    async fn load_payment(
        &self,
        merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<Payment, AppError> {
        self.repo
            .get_payment(merchant_id, payment_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load payment");
                not_found_as(e, || format!("Payment {}", payment_id))
            })
    }
}

/// Converts a repository error, naming the missing entity on `NotFound`.
fn not_found_as(err: RepoError, what: impl FnOnce() -> String) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound(what()),
        other => other.into(),
    }
}

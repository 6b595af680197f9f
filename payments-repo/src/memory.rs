//! In-memory payment repository for tests and dry runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use payments_types::{
    AccountDetails, Merchant, MerchantId, Payment, PaymentId, PaymentRepository, RepoError,
};

/// Payments keyed by payment id alone.
///
/// Not merchant-scoped: `get_payment` ignores the merchant id, so it must not
/// be relied on for tenant isolation. Every merchant id resolves to the same
/// fixed test settlement account.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settlement account returned for every merchant.
    pub fn test_account() -> AccountDetails {
        AccountDetails {
            holder_name: "Test Merchant".to_string(),
            iban: "DE89370400440532013000".to_string(),
            bic: "COBADEFFXXX".to_string(),
            currency: "EUR".to_string(),
        }
    }
}

#[async_trait]
impl PaymentRepository for MemoryRepository {
    async fn get_merchant_details(&self, merchant_id: &MerchantId) -> Result<Merchant, RepoError> {
        Ok(Merchant {
            id: merchant_id.clone(),
            account_details: Self::test_account(),
        })
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(RepoError::Conflict(format!(
                "payment {} already exists",
                payment.id
            )));
        }
        payments.insert(payment.id.clone(), payment.clone());
        Ok(())
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id.clone(), payment.clone());
        Ok(())
    }

    async fn get_payment(
        &self,
        _merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<Payment, RepoError> {
        let payments = self.payments.read().await;
        payments.get(payment_id).cloned().ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use payments_types::{CardDetails, Customer, Money};

    use super::*;

    fn payment(merchant_id: &str, payment_id: &str) -> Payment {
        Payment::from_parts(
            PaymentId::from(payment_id),
            Merchant {
                id: MerchantId::from(merchant_id),
                account_details: MemoryRepository::test_account(),
            },
            Customer {
                id: "testCustomerID".to_string(),
                card_details: CardDetails {
                    holder_name: "Test Customer".to_string(),
                    number: "1234567890123456".to_string(),
                    security_code: 123,
                    expiration_date: "12/23".to_string(),
                },
            },
            Money::new(100, "USD"),
            "sim_tx".to_string(),
            123,
            false,
            0,
        )
    }

    #[tokio::test]
    async fn test_any_merchant_gets_test_account() {
        let repo = MemoryRepository::new();

        let merchant = repo
            .get_merchant_details(&MerchantId::from("testMerchantID"))
            .await
            .unwrap();

        assert_eq!(merchant.id.as_str(), "testMerchantID");
        assert_eq!(merchant.account_details.bic, "COBADEFFXXX");
    }

    #[tokio::test]
    async fn test_create_and_get_payment() {
        let repo = MemoryRepository::new();
        let payment = payment("m1", "p1");
        repo.create_payment(&payment).await.unwrap();

        let got = repo
            .get_payment(&MerchantId::from("m1"), &PaymentId::from("p1"))
            .await
            .unwrap();

        assert_eq!(got, payment);
    }

    #[tokio::test]
    async fn test_missing_payment_not_found() {
        let repo = MemoryRepository::new();

        let result = repo
            .get_payment(&MerchantId::from("m1"), &PaymentId::from("nope"))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_reads_are_not_merchant_scoped() {
        let repo = MemoryRepository::new();
        repo.create_payment(&payment("A", "p1")).await.unwrap();

        let got = repo
            .get_payment(&MerchantId::from("B"), &PaymentId::from("p1"))
            .await
            .unwrap();

        assert_eq!(got.merchant.id.as_str(), "A");
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let repo = MemoryRepository::new();
        repo.create_payment(&payment("A", "p1")).await.unwrap();

        let result = repo.create_payment(&payment("A", "p1")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_payment() {
        let repo = MemoryRepository::new();
        let mut payment = payment("A", "p1");
        repo.create_payment(&payment).await.unwrap();

        payment.mark_refunded(999);
        repo.update_payment(&payment).await.unwrap();

        let got = repo
            .get_payment(&MerchantId::from("A"), &PaymentId::from("p1"))
            .await
            .unwrap();
        assert!(got.refunded);
        assert_eq!(got.refund_timestamp, 999);
    }
}

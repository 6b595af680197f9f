//! Payment repository over a single key-value table.
//!
//! All of a merchant's rows live in the merchant's partition, so a payment
//! can only be read back through the merchant that owns it.

use std::sync::Arc;

use async_trait::async_trait;

use payments_types::{Merchant, MerchantId, Payment, PaymentId, PaymentRepository, RepoError};

use crate::table::{KeyValueStore, MemoryTable};
use crate::types::{MerchantItem, PaymentItem, merchant_key, payment_key};

/// Repository storing merchants and payments in one key-value table.
#[derive(Clone)]
pub struct KeyValueRepository {
    table: Arc<dyn KeyValueStore>,
}

impl KeyValueRepository {
    /// Creates a repository over the given table.
    pub fn new(table: Arc<dyn KeyValueStore>) -> Self {
        Self { table }
    }

    /// Creates a repository over a fresh in-memory table.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTable::new()))
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &dyn KeyValueStore {
        self.table.as_ref()
    }

    /// Writes (or replaces) a merchant row.
    ///
    /// Merchants are onboarded outside the payment flow; this is the seeding hook.
    pub async fn put_merchant(&self, merchant: &Merchant) -> Result<(), RepoError> {
        let item = MerchantItem::from_domain(merchant)?.into_item();
        self.table.put_item(item).await?;
        tracing::debug!(merchant_id = %merchant.id, "merchant row written");
        Ok(())
    }

    async fn put_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        let item = PaymentItem::from_domain(payment)?.into_item();
        self.table.put_item(item).await
    }
}

#[async_trait]
impl PaymentRepository for KeyValueRepository {
    async fn get_merchant_details(&self, merchant_id: &MerchantId) -> Result<Merchant, RepoError> {
        let item = self
            .table
            .get_item(&merchant_key(merchant_id))
            .await?
            .ok_or(RepoError::NotFound)?;

        Ok(MerchantItem::from_item(&item)?.into_domain())
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        // The table has no conditional put; this check does not guard against
        // a concurrent writer of the same id.
        let key = payment_key(&payment.merchant.id, &payment.id);
        if self.table.get_item(&key).await?.is_some() {
            return Err(RepoError::Conflict(format!(
                "payment {} already exists",
                payment.id
            )));
        }

        self.put_payment(payment).await?;
        tracing::debug!(payment_id = %payment.id, merchant_id = %payment.merchant.id, "payment row created");
        Ok(())
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        // Whole-item overwrite, last writer wins
        self.put_payment(payment).await?;
        tracing::debug!(payment_id = %payment.id, merchant_id = %payment.merchant.id, "payment row replaced");
        Ok(())
    }

    async fn get_payment(
        &self,
        merchant_id: &MerchantId,
        payment_id: &PaymentId,
    ) -> Result<Payment, RepoError> {
        let item = self
            .table
            .get_item(&payment_key(merchant_id, payment_id))
            .await?
            .ok_or(RepoError::NotFound)?;

        PaymentItem::from_item(&item)?.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use payments_types::{AccountDetails, CardDetails, Customer, Money};

    use super::*;
    use crate::table::{AttributeValue, TableKey};

    fn merchant(id: &str) -> Merchant {
        Merchant {
            id: MerchantId::from(id),
            account_details: AccountDetails {
                holder_name: "Test Merchant".to_string(),
                iban: "PL61109010140000071219812874".to_string(),
                bic: "WBKPPLPP".to_string(),
                currency: "PLN".to_string(),
            },
        }
    }

    fn payment(merchant_id: &str, payment_id: &str) -> Payment {
        Payment::from_parts(
            PaymentId::from(payment_id),
            merchant(merchant_id),
            Customer {
                id: "customerID".to_string(),
                card_details: CardDetails {
                    holder_name: "name".to_string(),
                    number: "1234123412341234".to_string(),
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
    async fn test_get_merchant_details() {
        let repo = KeyValueRepository::in_memory();
        repo.put_merchant(&merchant("merchantID")).await.unwrap();

        let got = repo
            .get_merchant_details(&MerchantId::from("merchantID"))
            .await
            .unwrap();

        assert_eq!(got, merchant("merchantID"));
    }

    #[tokio::test]
    async fn test_unknown_merchant_not_found() {
        let repo = KeyValueRepository::in_memory();

        let result = repo.get_merchant_details(&MerchantId::from("nobody")).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_and_get_payment() {
        let repo = KeyValueRepository::in_memory();
        let payment = payment("merchantID", "paymentID");

        repo.create_payment(&payment).await.unwrap();

        let raw = repo
            .table()
            .get_item(&TableKey::new("merchantID", "PAYMENT#paymentID"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw["DATA"], AttributeValue::string("USD#100"));

        let got = repo
            .get_payment(&MerchantId::from("merchantID"), &PaymentId::from("paymentID"))
            .await
            .unwrap();
        assert_eq!(got, payment);
    }

    #[tokio::test]
    async fn test_payment_scoped_to_merchant() {
        let repo = KeyValueRepository::in_memory();
        repo.create_payment(&payment("A", "p1")).await.unwrap();

        let result = repo
            .get_payment(&MerchantId::from("B"), &PaymentId::from("p1"))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_missing_payment_not_found() {
        let repo = KeyValueRepository::in_memory();

        let result = repo
            .get_payment(&MerchantId::from("A"), &PaymentId::from("missing"))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_existing_payment_conflicts() {
        let repo = KeyValueRepository::in_memory();
        let original = payment("A", "p1");
        repo.create_payment(&original).await.unwrap();

        let mut duplicate = payment("A", "p1");
        duplicate.price = Money::new(999, "USD");
        let result = repo.create_payment(&duplicate).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        let stored = repo
            .get_payment(&MerchantId::from("A"), &PaymentId::from("p1"))
            .await
            .unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_update_overwrites_whole_record() {
        let repo = KeyValueRepository::in_memory();
        let mut payment = payment("A", "p1");
        repo.create_payment(&payment).await.unwrap();

        payment.mark_refunded(500);
        repo.update_payment(&payment).await.unwrap();

        let stored = repo
            .get_payment(&MerchantId::from("A"), &PaymentId::from("p1"))
            .await
            .unwrap();
        assert!(stored.refunded);
        assert_eq!(stored.refund_timestamp, 500);
        assert_eq!(stored, payment);
    }

    #[tokio::test]
    async fn test_merchant_and_payment_rows_share_partition() {
        let repo = KeyValueRepository::in_memory();
        repo.put_merchant(&merchant("A")).await.unwrap();
        repo.create_payment(&payment("A", "p1")).await.unwrap();

        assert!(
            repo.get_merchant_details(&MerchantId::from("A"))
                .await
                .is_ok()
        );
        assert!(
            repo.get_payment(&MerchantId::from("A"), &PaymentId::from("p1"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_corrupt_row_is_backend_error() {
        let table = Arc::new(MemoryTable::new());
        let repo = KeyValueRepository::new(table.clone());
        let mut item = PaymentItem::from_domain(&payment("A", "p1"))
            .unwrap()
            .into_item();
        item.insert("DATA".to_string(), AttributeValue::string("USD"));
        table.put_item(item).await.unwrap();

        let result = repo
            .get_payment(&MerchantId::from("A"), &PaymentId::from("p1"))
            .await;

        assert!(matches!(result, Err(RepoError::InvalidRecord(_))));
    }
}

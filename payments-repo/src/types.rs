//! Item shapes of the single-table layout.
//!
//! Two kinds of rows share one table, partitioned by merchant id:
//!
//! | row      | PK          | SK                  | value attributes                          |
//! |----------|-------------|---------------------|-------------------------------------------|
//! | merchant | merchant id | `MERCHANT`          | `AccountDetails`                          |
//! | payment  | merchant id | `PAYMENT#<payment>` | `DATA` = `<currency>#<amount>`, customer, card, timestamps, refund flag |
//!
//! Payment rows also carry `BankTransactionID` and the merchant
//! `AccountDetails` snapshot; rows without them decode with empty values.
//! Ids and currency codes must not contain `#`.

use payments_types::{
    AccountDetails, CardDetails, Customer, Merchant, MerchantId, Money, Payment, PaymentId,
    RepoError,
};

use crate::table::{AttributeValue, Item, PARTITION_KEY, SORT_KEY, TableKey};

/// Sort key of the merchant row.
pub const MERCHANT_SK: &str = "MERCHANT";
/// Sort key prefix of payment rows.
pub const PAYMENT_SK_PREFIX: &str = "PAYMENT#";
/// Separator inside packed attributes.
pub const DELIMITER: char = '#';

const DATA: &str = "DATA";
const CUSTOMER_ID: &str = "CustomerID";
const CARD_DETAILS: &str = "CardDetails";
const ACCOUNT_DETAILS: &str = "AccountDetails";
const BANK_TRANSACTION_ID: &str = "BankTransactionID";
const TIMESTAMP: &str = "Timestamp";
const REFUNDED: &str = "Refunded";
const REFUND_TIMESTAMP: &str = "RefundTimestamp";

/// Key of a merchant's own row.
pub fn merchant_key(merchant_id: &MerchantId) -> TableKey {
    TableKey::new(merchant_id.as_str(), MERCHANT_SK)
}

/// Key of a payment row inside its merchant's partition.
pub fn payment_key(merchant_id: &MerchantId, payment_id: &PaymentId) -> TableKey {
    TableKey::new(
        merchant_id.as_str(),
        format!("{}{}", PAYMENT_SK_PREFIX, payment_id),
    )
}

fn ensure_no_delimiter(field: &str, value: &str) -> Result<(), RepoError> {
    if value.contains(DELIMITER) {
        return Err(RepoError::InvalidRecord(format!(
            "{} {:?} contains reserved '{}'",
            field, value, DELIMITER
        )));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Attribute access
// ─────────────────────────────────────────────────────────────────────────────

fn missing(name: &str) -> RepoError {
    RepoError::InvalidRecord(format!("missing or mistyped attribute {}", name))
}

fn get_s(item: &Item, name: &str) -> Result<String, RepoError> {
    item.get(name)
        .and_then(AttributeValue::as_s)
        .map(str::to_string)
        .ok_or_else(|| missing(name))
}

fn get_n<T: std::str::FromStr>(item: &Item, name: &str) -> Result<T, RepoError> {
    let raw = item
        .get(name)
        .and_then(AttributeValue::as_n)
        .ok_or_else(|| missing(name))?;
    raw.parse()
        .map_err(|_| RepoError::InvalidRecord(format!("{} is not a valid number: {}", name, raw)))
}

fn get_bool(item: &Item, name: &str) -> Result<bool, RepoError> {
    item.get(name)
        .and_then(AttributeValue::as_bool)
        .ok_or_else(|| missing(name))
}

fn get_m<'a>(item: &'a Item, name: &str) -> Result<&'a Item, RepoError> {
    item.get(name)
        .and_then(AttributeValue::as_m)
        .ok_or_else(|| missing(name))
}

fn attr(name: &str, value: AttributeValue) -> (String, AttributeValue) {
    (name.to_string(), value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Nested maps
// ─────────────────────────────────────────────────────────────────────────────

/// `CardDetails` map. Kept separate from the domain type so the stored
/// shape can evolve on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub name: String,
    pub number: String,
    pub security_code: u16,
    pub expiration_date: String,
}

impl CardItem {
    fn into_attribute(self) -> AttributeValue {
        AttributeValue::M(Item::from([
            attr("name", AttributeValue::S(self.name)),
            attr("number", AttributeValue::S(self.number)),
            attr("securityCode", AttributeValue::number(self.security_code)),
            attr("expirationDate", AttributeValue::S(self.expiration_date)),
        ]))
    }

    fn from_map(map: &Item) -> Result<Self, RepoError> {
        Ok(Self {
            name: get_s(map, "name")?,
            number: get_s(map, "number")?,
            security_code: get_n(map, "securityCode")?,
            expiration_date: get_s(map, "expirationDate")?,
        })
    }
}

impl From<&CardDetails> for CardItem {
    fn from(card: &CardDetails) -> Self {
        Self {
            name: card.holder_name.clone(),
            number: card.number.clone(),
            security_code: card.security_code,
            expiration_date: card.expiration_date.clone(),
        }
    }
}

impl From<CardItem> for CardDetails {
    fn from(item: CardItem) -> Self {
        Self {
            holder_name: item.name,
            number: item.number,
            security_code: item.security_code,
            expiration_date: item.expiration_date,
        }
    }
}

/// `AccountDetails` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountItem {
    pub name: String,
    pub iban: String,
    pub bic: String,
    pub currency: String,
}

impl AccountItem {
    fn into_attribute(self) -> AttributeValue {
        AttributeValue::M(Item::from([
            attr("name", AttributeValue::S(self.name)),
            attr("iban", AttributeValue::S(self.iban)),
            attr("bic", AttributeValue::S(self.bic)),
            attr("currency", AttributeValue::S(self.currency)),
        ]))
    }

    fn from_map(map: &Item) -> Result<Self, RepoError> {
        Ok(Self {
            name: get_s(map, "name")?,
            iban: get_s(map, "iban")?,
            bic: get_s(map, "bic")?,
            currency: get_s(map, "currency")?,
        })
    }
}

impl From<&AccountDetails> for AccountItem {
    fn from(account: &AccountDetails) -> Self {
        Self {
            name: account.holder_name.clone(),
            iban: account.iban.clone(),
            bic: account.bic.clone(),
            currency: account.currency.clone(),
        }
    }
}

impl From<AccountItem> for AccountDetails {
    fn from(item: AccountItem) -> Self {
        Self {
            holder_name: item.name,
            iban: item.iban,
            bic: item.bic,
            currency: item.currency,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Merchant row
// ─────────────────────────────────────────────────────────────────────────────

/// Merchant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantItem {
    pub pk: String,
    pub sk: String,
    pub account_details: AccountItem,
}

impl MerchantItem {
    pub fn from_domain(merchant: &Merchant) -> Result<Self, RepoError> {
        ensure_no_delimiter("merchant id", merchant.id.as_str())?;
        Ok(Self {
            pk: merchant.id.as_str().to_string(),
            sk: MERCHANT_SK.to_string(),
            account_details: AccountItem::from(&merchant.account_details),
        })
    }

    pub fn into_item(self) -> Item {
        Item::from([
            attr(PARTITION_KEY, AttributeValue::S(self.pk)),
            attr(SORT_KEY, AttributeValue::S(self.sk)),
            attr(ACCOUNT_DETAILS, self.account_details.into_attribute()),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self, RepoError> {
        let sk = get_s(item, SORT_KEY)?;
        if sk != MERCHANT_SK {
            return Err(RepoError::InvalidRecord(format!(
                "expected merchant row, got SK {}",
                sk
            )));
        }
        Ok(Self {
            pk: get_s(item, PARTITION_KEY)?,
            sk,
            account_details: AccountItem::from_map(get_m(item, ACCOUNT_DETAILS)?)?,
        })
    }

    pub fn into_domain(self) -> Merchant {
        Merchant {
            id: MerchantId::new(self.pk),
            account_details: self.account_details.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment row
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentItem {
    /// merchant id
    pub pk: String,
    /// `PAYMENT#<payment id>`
    pub sk: String,
    /// `<currency>#<amount>`
    pub data: String,
    pub customer_id: String,
    pub card_details: CardItem,
    pub bank_transaction_id: String,
    pub account_details: AccountItem,
    pub timestamp: i64,
    pub refunded: bool,
    pub refund_timestamp: i64,
}

impl PaymentItem {
    pub fn from_domain(payment: &Payment) -> Result<Self, RepoError> {
        ensure_no_delimiter("merchant id", payment.merchant.id.as_str())?;
        ensure_no_delimiter("payment id", payment.id.as_str())?;
        ensure_no_delimiter("currency", payment.price.currency())?;

        let key = payment_key(&payment.merchant.id, &payment.id);
        Ok(Self {
            pk: key.pk,
            sk: key.sk,
            data: format!(
                "{}{}{}",
                payment.price.currency(),
                DELIMITER,
                payment.price.amount()
            ),
            customer_id: payment.customer.id.clone(),
            card_details: CardItem::from(&payment.customer.card_details),
            bank_transaction_id: payment.bank_transaction_id.clone(),
            account_details: AccountItem::from(&payment.merchant.account_details),
            timestamp: payment.timestamp,
            refunded: payment.refunded,
            refund_timestamp: payment.refund_timestamp,
        })
    }

    pub fn into_item(self) -> Item {
        Item::from([
            attr(PARTITION_KEY, AttributeValue::S(self.pk)),
            attr(SORT_KEY, AttributeValue::S(self.sk)),
            attr(DATA, AttributeValue::S(self.data)),
            attr(CUSTOMER_ID, AttributeValue::S(self.customer_id)),
            attr(CARD_DETAILS, self.card_details.into_attribute()),
            attr(
                BANK_TRANSACTION_ID,
                AttributeValue::S(self.bank_transaction_id),
            ),
            attr(ACCOUNT_DETAILS, self.account_details.into_attribute()),
            attr(TIMESTAMP, AttributeValue::number(self.timestamp)),
            attr(REFUNDED, AttributeValue::BOOL(self.refunded)),
            attr(REFUND_TIMESTAMP, AttributeValue::number(self.refund_timestamp)),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self, RepoError> {
        let bank_transaction_id = match item.get(BANK_TRANSACTION_ID) {
            None => String::new(),
            Some(_) => get_s(item, BANK_TRANSACTION_ID)?,
        };
        let account_details = match item.get(ACCOUNT_DETAILS) {
            None => AccountItem::default(),
            Some(_) => AccountItem::from_map(get_m(item, ACCOUNT_DETAILS)?)?,
        };

        Ok(Self {
            pk: get_s(item, PARTITION_KEY)?,
            sk: get_s(item, SORT_KEY)?,
            data: get_s(item, DATA)?,
            customer_id: get_s(item, CUSTOMER_ID)?,
            card_details: CardItem::from_map(get_m(item, CARD_DETAILS)?)?,
            bank_transaction_id,
            account_details,
            timestamp: get_n(item, TIMESTAMP)?,
            refunded: get_bool(item, REFUNDED)?,
            refund_timestamp: get_n(item, REFUND_TIMESTAMP)?,
        })
    }

    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let payment_id = self
            .sk
            .strip_prefix(PAYMENT_SK_PREFIX)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                RepoError::InvalidRecord(format!("SK {} is not a payment key", self.sk))
            })?;

        let (currency, amount) = self.data.split_once(DELIMITER).ok_or_else(|| {
            RepoError::InvalidRecord(format!("DATA {} has no currency delimiter", self.data))
        })?;
        let amount: i64 = amount.parse().map_err(|_| {
            RepoError::InvalidRecord(format!("DATA {} has an invalid amount", self.data))
        })?;

        Ok(Payment::from_parts(
            PaymentId::new(payment_id),
            Merchant {
                id: MerchantId::new(self.pk),
                account_details: self.account_details.into(),
            },
            Customer {
                id: self.customer_id,
                card_details: self.card_details.into(),
            },
            Money::new(amount, currency),
            self.bank_transaction_id,
            self.timestamp,
            self.refunded,
            self.refund_timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Payment {
        Payment::from_parts(
            PaymentId::from("paymentID"),
            Merchant {
                id: MerchantId::from("merchantID"),
                account_details: AccountDetails {
                    holder_name: "Test Merchant".to_string(),
                    iban: "DE89370400440532013000".to_string(),
                    bic: "COBADEFFXXX".to_string(),
                    currency: "EUR".to_string(),
                },
            },
            Customer {
                id: "customerID".to_string(),
                card_details: CardDetails {
                    holder_name: "Test Name".to_string(),
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

    fn encode(payment: &Payment) -> Item {
        PaymentItem::from_domain(payment).unwrap().into_item()
    }

    fn decode(item: &Item) -> Result<Payment, RepoError> {
        PaymentItem::from_item(item)?.into_domain()
    }

    #[test]
    fn test_payment_row_layout() {
        let item = encode(&payment());

        assert_eq!(item["PK"], AttributeValue::string("merchantID"));
        assert_eq!(item["SK"], AttributeValue::string("PAYMENT#paymentID"));
        assert_eq!(item["DATA"], AttributeValue::string("USD#100"));
        assert_eq!(item["CustomerID"], AttributeValue::string("customerID"));
        assert_eq!(item["Timestamp"], AttributeValue::number(123));
        assert_eq!(item["Refunded"], AttributeValue::BOOL(false));
        assert_eq!(item["RefundTimestamp"], AttributeValue::number(0));

        let card = item["CardDetails"].as_m().unwrap();
        assert_eq!(card["number"], AttributeValue::string("1234123412341234"));
        assert_eq!(card["securityCode"], AttributeValue::number(123));
        assert_eq!(card["expirationDate"], AttributeValue::string("12/23"));
    }

    #[test]
    fn test_payment_round_trip() {
        let mut original = payment();
        original.mark_refunded(456);

        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }

    #[test]
    fn test_negative_amount_round_trip() {
        let mut original = payment();
        original.price = Money::new(-250, "GBP");

        let item = encode(&original);
        assert_eq!(item["DATA"], AttributeValue::string("GBP#-250"));
        assert_eq!(decode(&item).unwrap().price, Money::new(-250, "GBP"));
    }

    #[test]
    fn test_row_without_optional_attributes_decodes() {
        let mut item = encode(&payment());
        item.remove("BankTransactionID");
        item.remove("AccountDetails");

        let decoded = decode(&item).unwrap();
        assert_eq!(decoded.bank_transaction_id, "");
        assert_eq!(decoded.merchant.account_details, AccountDetails::default());
        assert_eq!(decoded.price, Money::new(100, "USD"));
    }

    #[test]
    fn test_delimiter_in_ids_rejected() {
        let mut bad = payment();
        bad.id = PaymentId::from("pay#1");
        assert!(matches!(
            PaymentItem::from_domain(&bad),
            Err(RepoError::InvalidRecord(_))
        ));

        let mut bad = payment();
        bad.price = Money::new(1, "U#SD");
        assert!(matches!(
            PaymentItem::from_domain(&bad),
            Err(RepoError::InvalidRecord(_))
        ));

        let mut bad = payment();
        bad.merchant.id = MerchantId::from("m#1");
        assert!(matches!(
            PaymentItem::from_domain(&bad),
            Err(RepoError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_malformed_data_rejected() {
        for data in ["USD100", "USD#", "USD#1.5", "USD#abc"] {
            let mut item = encode(&payment());
            item.insert("DATA".to_string(), AttributeValue::string(data));
            assert!(
                matches!(decode(&item), Err(RepoError::InvalidRecord(_))),
                "DATA {:?} should be rejected",
                data
            );
        }
    }

    #[test]
    fn test_malformed_sort_key_rejected() {
        for sk in ["MERCHANT", "PAYMENT#", "PAYMENTS-1"] {
            let mut item = encode(&payment());
            item.insert("SK".to_string(), AttributeValue::string(sk));
            assert!(matches!(decode(&item), Err(RepoError::InvalidRecord(_))));
        }
    }

    #[test]
    fn test_mistyped_attribute_rejected() {
        let mut item = encode(&payment());
        item.insert("Timestamp".to_string(), AttributeValue::string("123"));
        assert!(matches!(decode(&item), Err(RepoError::InvalidRecord(_))));
    }

    #[test]
    fn test_merchant_row_round_trip() {
        let merchant = payment().merchant;
        let item = MerchantItem::from_domain(&merchant).unwrap().into_item();

        assert_eq!(item["SK"], AttributeValue::string("MERCHANT"));
        let account = item["AccountDetails"].as_m().unwrap();
        assert_eq!(account["iban"], AttributeValue::string("DE89370400440532013000"));

        let decoded = MerchantItem::from_item(&item).unwrap().into_domain();
        assert_eq!(decoded, merchant);
    }

    #[test]
    fn test_payment_row_is_not_a_merchant() {
        let item = encode(&payment());
        assert!(matches!(
            MerchantItem::from_item(&item),
            Err(RepoError::InvalidRecord(_))
        ));
    }
}

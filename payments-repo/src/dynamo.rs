//! DynamoDB table adapter.
//!
//! Items are written with the same attribute names and types as the rows the
//! other backends store, so an existing `payment_platform` table can be read
//! and written in place.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::{DisplayErrorContext, SdkError},
    operation::{get_item::GetItemError, put_item::PutItemError},
    types::AttributeValue as DynamoValue,
};

use payments_types::RepoError;

use crate::table::{
    AttributeValue, DEFAULT_TABLE_NAME, Item, KeyValueStore, PARTITION_KEY, SORT_KEY, TableKey,
};

/// URL scheme selecting this backend: `dynamodb://<table name>`.
pub const URL_SCHEME: &str = "dynamodb://";

/// Reads the table name from a `dynamodb://<table>` URL.
///
/// An empty name selects [`DEFAULT_TABLE_NAME`]. Returns `None` for other schemes.
pub fn table_name_from_url(database_url: &str) -> Option<&str> {
    let name = database_url.strip_prefix(URL_SCHEME)?.trim_end_matches('/');
    Some(if name.is_empty() {
        DEFAULT_TABLE_NAME
    } else {
        name
    })
}

/// Key-value table stored in AWS DynamoDB.
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    /// Creates a table handle using the default AWS configuration
    /// (credentials, region and endpoint from the environment or config files).
    pub async fn new(table_name: impl Into<String>) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::with_client(Client::new(&aws_config), table_name)
    }

    /// Creates a table handle over an existing client.
    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl KeyValueStore for DynamoTable {
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, RepoError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, DynamoValue::S(key.pk.clone()))
            .key(SORT_KEY, DynamoValue::S(key.sk.clone()))
            .send()
            .await
            .map_err(|e: SdkError<GetItemError>| {
                RepoError::Database(format!("DynamoDB get error: {}", DisplayErrorContext(&e)))
            })?;

        output.item.as_ref().map(from_dynamo_item).transpose()
    }

    async fn put_item(&self, item: Item) -> Result<(), RepoError> {
        // Fails before the request when the key attributes are missing
        TableKey::of_item(&item)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_dynamo_item(&item)))
            .send()
            .await
            .map_err(|e: SdkError<PutItemError>| {
                RepoError::Database(format!("DynamoDB put error: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }
}

fn to_dynamo(value: &AttributeValue) -> DynamoValue {
    match value {
        AttributeValue::S(s) => DynamoValue::S(s.clone()),
        AttributeValue::N(n) => DynamoValue::N(n.clone()),
        AttributeValue::BOOL(b) => DynamoValue::Bool(*b),
        AttributeValue::M(m) => DynamoValue::M(to_dynamo_item(m)),
    }
}

/// Converts an item to the SDK's attribute map.
pub fn to_dynamo_item(item: &Item) -> HashMap<String, DynamoValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), to_dynamo(value)))
        .collect()
}

fn from_dynamo(name: &str, value: &DynamoValue) -> Result<AttributeValue, RepoError> {
    match value {
        DynamoValue::S(s) => Ok(AttributeValue::S(s.clone())),
        DynamoValue::N(n) => Ok(AttributeValue::N(n.clone())),
        DynamoValue::Bool(b) => Ok(AttributeValue::BOOL(*b)),
        DynamoValue::M(m) => Ok(AttributeValue::M(from_dynamo_item(m)?)),
        other => Err(RepoError::InvalidRecord(format!(
            "attribute {} has unsupported type {:?}",
            name, other
        ))),
    }
}

/// Converts the SDK's attribute map to an item.
///
/// Only string, number, boolean and map attributes occur in stored rows;
/// any other type is an invalid record.
pub fn from_dynamo_item(item: &HashMap<String, DynamoValue>) -> Result<Item, RepoError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), from_dynamo(name, value)?)))
        .collect()
}

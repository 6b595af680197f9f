//! Single-table key-value store abstraction.
//!
//! Items are schema-less attribute maps addressed by a partition key (`PK`)
//! and a sort key (`SK`). The store can only get one item by key and put a
//! whole item; there are no queries, indexes or multi-key transactions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use payments_types::RepoError;

/// Name of the table holding merchants and payments.
pub const DEFAULT_TABLE_NAME: &str = "payment_platform";

/// Name of the partition key attribute.
pub const PARTITION_KEY: &str = "PK";
/// Name of the sort key attribute.
pub const SORT_KEY: &str = "SK";

/// An item: attribute name to value.
pub type Item = BTreeMap<String, AttributeValue>;

/// A single attribute value, serialized in the DynamoDB JSON shape
/// (`{"S": "..."}`, `{"N": "123"}`, `{"BOOL": true}`, `{"M": {...}}`).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String
    S(String),
    /// Number, kept as its decimal string so no precision is lost
    N(String),
    BOOL(bool),
    /// Nested map
    M(Item),
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::S(value.into())
    }

    pub fn number(value: impl ToString) -> Self {
        AttributeValue::N(value.to_string())
    }

    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::BOOL(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_m(&self) -> Option<&Item> {
        match self {
            AttributeValue::M(m) => Some(m),
            _ => None,
        }
    }
}

/// Primary key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub pk: String,
    pub sk: String,
}

impl TableKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Reads the key attributes of an item.
    pub fn of_item(item: &Item) -> Result<Self, RepoError> {
        let read = |name: &str| {
            item.get(name)
                .and_then(AttributeValue::as_s)
                .map(str::to_string)
                .ok_or_else(|| RepoError::InvalidRecord(format!("item has no string {}", name)))
        };
        Ok(Self {
            pk: read(PARTITION_KEY)?,
            sk: read(SORT_KEY)?,
        })
    }
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.pk, self.sk)
    }
}

/// Port for the backing key-value table.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets an item by its full key.
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, RepoError>;

    /// Writes a whole item, replacing any item with the same key.
    /// The key is taken from the item's `PK` and `SK` attributes.
    async fn put_item(&self, item: Item) -> Result<(), RepoError>;
}

/// Serializes an item to the JSON text stored by SQL backends.
#[cfg_attr(not(any(feature = "sqlite", feature = "postgres")), allow(dead_code))]
pub(crate) fn item_to_json(item: &Item) -> Result<String, RepoError> {
    serde_json::to_string(item).map_err(|e| RepoError::InvalidRecord(e.to_string()))
}

/// Parses an item from the JSON text stored by SQL backends.
#[cfg_attr(not(any(feature = "sqlite", feature = "postgres")), allow(dead_code))]
pub(crate) fn item_from_json(json: &str) -> Result<Item, RepoError> {
    serde_json::from_str(json).map_err(|e| RepoError::InvalidRecord(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory table
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value table held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTable {
    items: DashMap<TableKey, Item>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryTable {
    async fn get_item(&self, key: &TableKey) -> Result<Option<Item>, RepoError> {
        Ok(self.items.get(key).map(|entry| entry.value().clone()))
    }

    async fn put_item(&self, item: Item) -> Result<(), RepoError> {
        let key = TableKey::of_item(&item)?;
        self.items.insert(key, item);
        Ok(())
    }
}

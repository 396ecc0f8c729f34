use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::Value;

use super::error::DocumentError;
use super::query::{Document, Fields, Query};

/// Length of generated document ids.
pub const AUTO_ID_LEN: usize = 20;

/// How a `set` treats an existing document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole document.
    Overwrite,
    /// Merge the given fields into the existing document, creating it if absent.
    Merge,
}

/// Document database with named collections of JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Generate a fresh random document id for `collection`.
    fn generate_id(&self, _collection: &str) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(AUTO_ID_LEN)
            .map(char::from)
            .collect()
    }

    /// Fetch a single document; `Ok(None)` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError>;

    /// Write a document.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), DocumentError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError>;

    /// Run a query over one collection.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError>;
}

/// Deep-merge `incoming` into `existing`: nested objects merge key by key,
/// everything else is replaced.
pub fn merge_fields(existing: &mut Fields, incoming: Fields) {
    for (key, value) in incoming {
        if let Value::Object(update) = value {
            if let Some(Value::Object(current)) = existing.get_mut(&key) {
                merge_fields(current, update);
                continue;
            }
            existing.insert(key, Value::Object(update));
        } else {
            existing.insert(key, value);
        }
    }
}

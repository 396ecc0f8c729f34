use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::DocumentError;
use super::query::{Document, Fields, Query};
use super::traits::{DocumentStore, WriteMode, merge_fields};

type Collection = BTreeMap<String, Fields>;

/// In-process document store, mainly for tests and demos.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), DocumentError> {
        if id.is_empty() {
            return Err(DocumentError::InvalidReference("empty document id".into()));
        }
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match (mode, docs.get_mut(id)) {
            (WriteMode::Merge, Some(existing)) => merge_fields(existing, fields),
            _ => {
                docs.insert(id.to_string(), fields);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .into_iter()
            .flat_map(|docs| docs.iter())
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()));
        Ok(query.apply(docs))
    }
}

use std::sync::Arc;

use jobboard_common::config::{AppConfig, CollectionsConfig};
use jobboard_common::document::{Document, DocumentError, DocumentStore, Query};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::uploads::StorageClient;

/// Client for the document store: accounts, job ads, applications and the
/// skill catalogue. Operations are spread over the `accounts`, `jobs`,
/// `applications` and `skills` modules.
#[derive(Clone)]
pub struct DocumentClient {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) uploads: StorageClient,
    pub(crate) collections: CollectionsConfig,
    pub(crate) cv_folder: String,
    pub(crate) profile_picture_folder: String,
    pub(crate) default_profile_picture: String,
    pub(crate) default_user_name: String,
}

impl DocumentClient {
    pub fn new(store: Arc<dyn DocumentStore>, uploads: StorageClient, config: &AppConfig) -> Self {
        Self {
            store,
            uploads,
            collections: config.collections.clone(),
            cv_folder: config.storage.cv_folder.clone(),
            profile_picture_folder: config.storage.profile_picture_folder.clone(),
            default_profile_picture: config.profile.default_profile_picture.clone(),
            default_user_name: config.profile.default_user_name.clone(),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn collections(&self) -> &CollectionsConfig {
        &self.collections
    }

    /// Run `query` with one extra row to learn whether another page exists.
    /// The cursor is the last document of the page, `None` when exhausted.
    pub(crate) async fn fetch_page(
        &self,
        collection: &str,
        query: Query,
        page_size: usize,
        cursor: Option<Document>,
    ) -> Result<(Vec<Document>, Option<Document>), DocumentError> {
        if page_size == 0 {
            return Ok((Vec::new(), None));
        }
        let query = query.start_after(cursor).limit(page_size + 1);
        let mut docs = self.store.query(collection, &query).await?;
        let has_more = docs.len() > page_size;
        docs.truncate(page_size);
        let next = if has_more { docs.last().cloned() } else { None };
        Ok((docs, next))
    }
}

/// Decode a document into a model that carries its own `id`, taking the id
/// from the document reference when the stored fields lack one.
pub(crate) fn decode_with_id<T: DeserializeOwned>(doc: &Document) -> Result<T, DocumentError> {
    let mut fields = doc.fields.clone();
    fields
        .entry("id")
        .or_insert_with(|| Value::String(doc.id.clone()));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// String field of a document, empty when missing or not a string.
pub(crate) fn str_field(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

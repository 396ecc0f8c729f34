use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use super::error::DocumentError;
use super::query::{Document, Fields, Query};
use super::traits::{DocumentStore, WriteMode, merge_fields};
use crate::storage::validate_segment;

/// Filesystem-backed document store.
///
/// Each document is a JSON file at `{base_path}/{collection}/{id}.json`, with
/// the id percent-escaped where it is not a safe file name (skill names such as
/// `CI/CD` are used as ids). Writes go through `{base_path}/.tmp` and are
/// renamed into place.
pub struct FilesystemDocumentStore {
    base_path: PathBuf,
    // Serializes read-modify-write cycles of merge writes.
    write_lock: Mutex<()>,
}

impl FilesystemDocumentStore {
    pub async fn new(base_path: PathBuf) -> Result<Self, DocumentError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, DocumentError> {
        validate_segment(collection)?;
        Ok(self.base_path.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, DocumentError> {
        if id.is_empty() {
            return Err(DocumentError::InvalidReference("empty document id".into()));
        }
        Ok(self
            .collection_dir(collection)?
            .join(format!("{}.json", escape_id(id))))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn read_fields(&self, path: &PathBuf) -> Result<Option<Fields>, DocumentError> {
        match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes)? {
                Value::Object(fields) => Ok(Some(fields)),
                other => Err(DocumentError::NotAnObject(other.to_string())),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_fields(&self, path: &PathBuf, fields: &Fields) -> Result<(), DocumentError> {
        let bytes = serde_json::to_vec_pretty(fields)?;
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FilesystemDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DocumentError> {
        let path = self.document_path(collection, id)?;
        Ok(self
            .read_fields(&path)
            .await?
            .map(|fields| Document::new(id, fields)))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), DocumentError> {
        let path = self.document_path(collection, id)?;
        let _guard = self.write_lock.lock().await;

        let fields = match mode {
            WriteMode::Overwrite => fields,
            WriteMode::Merge => match self.read_fields(&path).await? {
                Some(mut existing) => {
                    merge_fields(&mut existing, fields);
                    existing
                }
                None => fields,
            },
        };
        self.write_fields(&path, &fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        let path = self.document_path(collection, id)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, DocumentError> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(unescape_id)
            else {
                continue;
            };
            // Removed between listing and reading.
            if let Some(fields) = self.read_fields(&path).await? {
                docs.push(Document::new(id, fields));
            }
        }
        Ok(query.apply(docs))
    }
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'+' | b' ' | b'.')
}

/// Percent-escape every byte that is not safe in a file name. A leading dot
/// is escaped too so ids never become hidden files.
fn escape_id(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for (i, byte) in id.bytes().enumerate() {
        if is_plain(byte) && !(i == 0 && byte == b'.') {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

fn unescape_id(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

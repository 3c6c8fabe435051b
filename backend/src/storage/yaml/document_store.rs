use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::connection::YamlConnection;
use crate::storage::traits::{Document, RecordStore, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::storage::StorageError;

/// Record store keeping one YAML file per document
///
/// Writes go through a temp file and an atomic rename so a crash never
/// leaves a half-written document behind. Filtering is a scan of the
/// collection directory.
#[derive(Debug, Clone)]
pub struct YamlDocumentStore {
    connection: YamlConnection,
}

impl YamlDocumentStore {
    pub fn new(connection: YamlConnection) -> Self {
        Self { connection }
    }

    fn now_timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn read_document(path: &Path) -> Result<Document, StorageError> {
        let yaml_content = fs::read_to_string(path)?;
        let document: Document = serde_yaml::from_str(&yaml_content)?;
        Ok(document)
    }

    fn write_document(path: &Path, document: &Document) -> Result<(), StorageError> {
        let yaml_content = serde_yaml::to_string(document)?;

        // Atomic write using a uniquely named temp file
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn with_id(mut document: Document, id: &str) -> Document {
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        document
    }

    fn sort_key(document: &Document) -> (String, String) {
        let created_at = document
            .get(CREATED_AT_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let id = document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        (created_at, id)
    }
}

#[async_trait]
impl RecordStore for YamlDocumentStore {
    async fn insert(&self, collection: &str, mut fields: Document) -> Result<String, StorageError> {
        self.connection.ensure_collection_directory(collection)?;

        let id = Uuid::new_v4().simple().to_string();
        let now = Self::now_timestamp();

        fields.remove(ID_FIELD);
        fields.insert(CREATED_AT_FIELD.to_string(), Value::String(now.clone()));
        fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));

        let path = self
            .connection
            .document_path(collection, &id)
            .ok_or_else(|| StorageError::Serialization(format!("generated invalid id {id}")))?;
        Self::write_document(&path, &fields)?;

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        let path = match self.connection.document_path(collection, id) {
            Some(path) => path,
            None => return Ok(None),
        };

        if !path.exists() {
            return Ok(None);
        }

        let document = Self::read_document(&path)?;
        Ok(Some(Self::with_id(document, id)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        let dir = self.connection.collection_directory(collection);

        if !dir.exists() {
            debug!("Collection {} has no directory yet, returning empty list", collection);
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();

            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }

            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if YamlConnection::is_valid_document_id(stem) => stem.to_string(),
                _ => {
                    warn!("Skipping file with unexpected name: {:?}", path);
                    continue;
                }
            };

            let document = Self::read_document(&path)?;
            documents.push(Self::with_id(document, &id));
        }

        // Insertion order, ties broken by id
        documents.sort_by_key(Self::sort_key);

        Ok(documents)
    }

    async fn find_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StorageError> {
        let documents = self.list(collection).await?;
        Ok(documents
            .into_iter()
            .filter(|document| document.get(field) == Some(value))
            .collect())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StorageError> {
        let missing = || StorageError::MissingDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let path = self.connection.document_path(collection, id).ok_or_else(missing)?;
        if !path.exists() {
            return Err(missing());
        }

        let mut document = Self::read_document(&path)?;

        for (field, value) in patch {
            if field == ID_FIELD || field == CREATED_AT_FIELD || field == UPDATED_AT_FIELD {
                continue;
            }
            if value.is_null() {
                document.remove(&field);
            } else {
                document.insert(field, value);
            }
        }
        document.insert(UPDATED_AT_FIELD.to_string(), Value::String(Self::now_timestamp()));

        Self::write_document(&path, &document)?;

        debug!("Updated document {} in {}", id, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StorageError> {
        let missing = || StorageError::MissingDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let path = self.connection.document_path(collection, id).ok_or_else(missing)?;
        if !path.exists() {
            return Err(missing());
        }

        fs::remove_file(&path)?;

        info!("Deleted document {} from {}", id, collection);
        Ok(())
    }
}

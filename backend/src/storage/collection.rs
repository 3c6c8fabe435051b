//! Typed access to one collection of a [`RecordStore`].
//!
//! Records are plain serde structs without id or timestamps; the store owns
//! those and they come back alongside the record in [`Stored`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::traits::{Document, RecordStore, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use super::StorageError;

/// A record as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<R> {
    pub id: String,
    pub record: R,
    /// Raw store timestamps; absent when the document lacks them
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Collection handle binding a store, a collection name and a record type
pub struct Collection<R> {
    store: Arc<dyn RecordStore>,
    name: &'static str,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name,
            _record: PhantomData,
        }
    }
}

impl<R> Collection<R>
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn RecordStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _record: PhantomData,
        }
    }

    pub async fn insert(&self, record: &R) -> Result<String, StorageError> {
        let fields = to_document(record)?;
        self.store.insert(self.name, fields).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Stored<R>>, StorageError> {
        match self.store.get(self.name, id).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<Stored<R>>, StorageError> {
        self.store
            .list(self.name)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Records whose `field` equals `value`
    pub async fn find_where(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<Stored<R>>, StorageError> {
        self.store
            .find_where(self.name, field, &value.into())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Number of records whose `field` equals `value`, without decoding them
    pub async fn count_where(&self, field: &str, value: impl Into<Value>) -> Result<usize, StorageError> {
        Ok(self.store.find_where(self.name, field, &value.into()).await?.len())
    }

    /// Merge a patch struct into a stored record
    ///
    /// Fields the patch serializes as `null` are removed from the document.
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<(), StorageError> {
        let fields = to_document(patch)?;
        self.store.update(self.name, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.store.delete(self.name, id).await
    }
}

fn to_document<T: Serialize>(value: &T) -> Result<Document, StorageError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StorageError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn from_document<R: DeserializeOwned>(mut document: Document) -> Result<Stored<R>, StorageError> {
    let id = match document.remove(ID_FIELD) {
        Some(Value::String(id)) => id,
        _ => return Err(StorageError::Serialization("document without id".to_string())),
    };
    let created_at = take_string(&mut document, CREATED_AT_FIELD);
    let updated_at = take_string(&mut document, UPDATED_AT_FIELD);
    let record = serde_json::from_value(Value::Object(document))?;

    Ok(Stored {
        id,
        record,
        created_at,
        updated_at,
    })
}

fn take_string(document: &mut Document, field: &str) -> Option<String> {
    match document.remove(field) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::yaml::test_utils::TestEnvironment;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    }

    #[derive(Serialize)]
    struct NotePatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<Option<String>>,
    }

    #[tokio::test]
    async fn test_insert_and_get_typed_record() {
        let env = TestEnvironment::new().unwrap();
        let notes: Collection<Note> = Collection::new(env.record_store(), "notes");

        let note = Note {
            title: "First".to_string(),
            tag: Some("a".to_string()),
        };
        let id = notes.insert(&note).await.unwrap();

        let stored = notes.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.record, note);
        assert!(stored.created_at.is_some());
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_patch_with_explicit_null_clears_field() {
        let env = TestEnvironment::new().unwrap();
        let notes: Collection<Note> = Collection::new(env.record_store(), "notes");
        let id = notes
            .insert(&Note {
                title: "First".to_string(),
                tag: Some("a".to_string()),
            })
            .await
            .unwrap();

        notes
            .update(
                &id,
                &NotePatch {
                    title: None,
                    tag: Some(None),
                },
            )
            .await
            .unwrap();

        let stored = notes.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.record.title, "First");
        assert_eq!(stored.record.tag, None);
    }

    #[tokio::test]
    async fn test_count_where() {
        let env = TestEnvironment::new().unwrap();
        let notes: Collection<Note> = Collection::new(env.record_store(), "notes");
        for tag in ["a", "b", "a"] {
            notes
                .insert(&Note {
                    title: "Note".to_string(),
                    tag: Some(tag.to_string()),
                })
                .await
                .unwrap();
        }

        assert_eq!(notes.count_where("tag", "a").await.unwrap(), 2);
        assert_eq!(notes.count_where("tag", "c").await.unwrap(), 0);
    }
}

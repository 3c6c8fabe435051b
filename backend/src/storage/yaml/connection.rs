use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::storage::StorageError;

/// YamlConnection manages the data directory and the per-collection paths under it
#[derive(Debug, Clone)]
pub struct YamlConnection {
    base_directory: PathBuf,
}

impl YamlConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding every document of a collection
    pub fn collection_directory(&self, collection: &str) -> PathBuf {
        self.base_directory.join(collection)
    }

    /// Ensure a collection directory exists and return it
    pub fn ensure_collection_directory(&self, collection: &str) -> Result<PathBuf, StorageError> {
        let dir = self.collection_directory(collection);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created collection directory: {}", dir.display());
        }
        Ok(dir)
    }

    /// Path of a single document, or `None` when the id could escape the collection directory
    pub fn document_path(&self, collection: &str, id: &str) -> Option<PathBuf> {
        if !Self::is_valid_document_id(id) {
            return None;
        }
        Some(self.collection_directory(collection).join(format!("{id}.yaml")))
    }

    /// Document ids are generated by the store; anything else is treated as absent
    pub fn is_valid_document_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= 64
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");

        let connection = YamlConnection::new(&nested).unwrap();

        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
    }

    #[test]
    fn test_document_path_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let connection = YamlConnection::new(temp_dir.path()).unwrap();

        assert!(connection.document_path("clients", "abc123").is_some());
        assert!(connection.document_path("clients", "../secrets").is_none());
        assert!(connection.document_path("clients", "a/b").is_none());
        assert!(connection.document_path("clients", "").is_none());
    }
}

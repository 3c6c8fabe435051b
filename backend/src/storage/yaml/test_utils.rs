/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// Every environment lives in its own temporary directory that is removed when
/// the environment is dropped, even if the test panics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use super::connection::YamlConnection;
use super::document_store::YamlDocumentStore;
use crate::storage::RecordStore;

/// Test environment that provides a temporary data directory and a store on top of it
pub struct TestEnvironment {
    pub connection: YamlConnection,
    pub store: Arc<YamlDocumentStore>,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = YamlConnection::new(temp_dir.path())?;
        let store = Arc::new(YamlDocumentStore::new(connection.clone()));
        Ok(Self {
            connection,
            store,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// The store as the trait object services are built from
    pub fn record_store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
            assert_eq!(env.connection.base_directory(), base_path.as_path());
            // Environment dropped here
        }
        assert!(!base_path.exists());
        Ok(())
    }
}

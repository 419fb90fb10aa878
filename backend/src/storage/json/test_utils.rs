/// Test utilities for storage-backed tests.
///
/// Provides a temporary document store that is cleaned up when the
/// environment is dropped, even if a test panics.
use anyhow::Result;
use tempfile::TempDir;

use super::connection::JsonConnection;

/// Test environment holding a store rooted in a temporary directory.
pub struct TestEnvironment {
    pub connection: JsonConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = JsonConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle to the on-disk document store.
///
/// Each collection is one JSON file under the base directory holding an
/// array of documents. Repositories load the whole collection, modify it in
/// memory, and write it back; a missing file reads as an empty collection.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn new(base_directory: impl AsRef<Path>) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        fs::create_dir_all(&base_directory).with_context(|| {
            format!("failed to create data directory {}", base_directory.display())
        })?;
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a collection file, e.g. `habits.json`.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", collection))
    }

    /// Load every document in a collection.
    pub fn load_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read collection file {}", path.display()))?;
        let documents = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse collection file {}", path.display()))?;
        Ok(documents)
    }

    /// Replace a collection's documents.
    pub fn save_collection<T: Serialize>(&self, collection: &str, documents: &[T]) -> Result<()> {
        let path = self.collection_path(collection);
        let content = serde_json::to_string_pretty(documents)
            .with_context(|| format!("failed to serialize collection {}", collection))?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("failed to write collection file {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("failed to replace collection file {}", path.display()))?;

        Ok(())
    }
}

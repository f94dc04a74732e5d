use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for blob storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}' (use letters, digits, '-' or '_')")]
    InvalidKey(String),
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("could not encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value store holding whole serialized blobs.
pub trait BlobStore {
    /// Fetch the blob under `key`, or None if nothing was ever stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the blob under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one blob
    pub fn with_blob(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.blobs.insert(key.to_string(), value.to_string());
        store
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Does not touch the filesystem; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        atomic_write(&path, value.as_bytes()).map_err(|source| StorageError::Io { path, source })
    }
}

/// Keys map straight to file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_get_absent_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("todos").unwrap().is_none());
    }

    #[test]
    fn memory_store_set_overwrites() {
        let mut store = MemoryStore::with_blob("todos", "[]");
        store.set("todos", "[1]").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_store_round_trip_creates_dir() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested/data"));
        assert!(store.get("todos").unwrap().is_none());

        store.set("todos", "[]").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
        assert!(tmp.path().join("nested/data/todos.json").exists());
    }

    #[test]
    fn file_store_overwrite_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.set("todos", "first").unwrap();
        store.set("todos", "second").unwrap();

        assert_eq!(store.get("todos").unwrap().as_deref(), Some("second"));
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}

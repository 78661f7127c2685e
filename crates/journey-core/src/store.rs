//! Whole-record key/value persistence.
//!
//! Every value is one JSON document stored under a validated key. Writes
//! replace the whole record; there are no partial updates at this layer.

use crate::error::Result;
use crate::{io, paths};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait RecordStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn put_raw(&self, key: &str, value: &str) -> Result<()>;

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let data = serde_json::to_string_pretty(value)?;
        self.put_raw(key, &data)
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One JSON file per key under `<root>/.journey/store/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        paths::validate_key(key)?;
        io::read_optional(&paths::record_path(&self.root, key))
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        paths::validate_key(key)?;
        let path = paths::record_path(&self.root, key);
        tracing::debug!(key, path = %path.display(), "writing record");
        io::atomic_write(&path, value.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        paths::validate_key(key)?;
        Ok(self.records.borrow().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        paths::validate_key(key)?;
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get::<Sample>("sample").unwrap().is_none());
        let value = Sample {
            name: "a".into(),
            count: 2,
        };
        store.put("sample", &value).unwrap();
        assert_eq!(store.get::<Sample>("sample").unwrap(), Some(value));
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let value = Sample {
            name: "b".into(),
            count: 7,
        };
        store.put("day-1", &value).unwrap();
        assert!(dir.path().join(".journey/store/day-1.json").exists());
        assert_eq!(store.get::<Sample>("day-1").unwrap(), Some(value));
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::new();
        store.put("k", &1u32).unwrap();
        store.put("k", &2u32).unwrap();
        assert_eq!(store.get::<u32>("k").unwrap(), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_bad_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.put_raw("../escape", "{}").is_err());
        assert!(MemoryStore::new().get_raw("UPPER").is_err());
    }
}

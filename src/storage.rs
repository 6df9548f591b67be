//! Key-value persistence surface for the task list.
//!
//! The task list is stored as one opaque blob under a single key, loaded whole
//! at startup and overwritten whole on every change. `FileStore` keeps each key
//! in its own JSON file inside a data directory; `MemoryStore` keeps them in a
//! map and backs the tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A minimal key-value store holding whole serialised values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed store: one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Atomic write via temp file + rename. The temp file is removed if any
    /// step fails.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let result = write_synced(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(value.as_bytes())?;
    f.flush()?;
    f.sync_all()
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with data from an older version.
    #[cfg(test)]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store whose reads succeed and whose writes always fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
}

#[cfg(test)]
impl FailingStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_value(key, value),
        }
    }
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

/// Convert a storage key to a safe file stem.
/// Lowercases and collapses runs of non-alphanumeric characters to `_`.
pub fn sanitize_key(key: &str) -> String {
    let cleaned = key
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if cleaned.is_empty() {
        "tasks".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("tasks"), "tasks");
        assert_eq!(sanitize_key("My Tasks"), "my_tasks");
        assert_eq!(sanitize_key("../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_key("  "), "tasks");
    }

    #[test]
    fn test_file_store_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);

        store.set("tasks", "[1]").unwrap();
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert!(store.path_for("tasks").exists());
        assert!(!store.path_for("tasks").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let target = store.path_for("tasks");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), "x").unwrap();

        assert!(store.set("tasks", "[]").is_err());
        assert!(!target.with_extension("json.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_failing_store_rejects_writes() {
        let mut store = FailingStore::with_value("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.set("k", "w").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with_value("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Error type for store writes. Reads never error: a missing or corrupt
/// collection loads as its default.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not encode collection {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Synchronous key-value store over a directory of JSON files, one file
/// per collection key. Whole-collection granularity, no transactions
/// across keys; the single UI thread is the only writer.
#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open (creating if needed) the store at the given directory.
    pub fn open(dir: &Path) -> Result<KvStore, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(KvStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load a collection. Missing file or malformed JSON both yield the
    /// default value.
    pub fn get<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.key_path(key);
        let Ok(content) = fs::read_to_string(&path) else {
            return T::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Save a collection atomically (temp file + rename). On failure the
    /// payload is appended to the write journal before the error returns,
    /// so the data stays recoverable.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        let path = self.key_path(key);
        if let Err(e) = atomic_write(&path, content.as_bytes()) {
            super::journal::log_failed_write(&self.dir, key, &e, &content);
            return Err(StoreError::Write { path, source: e });
        }
        Ok(())
    }
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
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn set_then_get_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();
        store.set("numbers", &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = store.get("numbers");
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn missing_key_loads_default() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();
        let v: Vec<String> = store.get("nothing");
        assert!(v.is_empty());
    }

    #[test]
    fn corrupt_json_loads_default() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("tasks.json"), "not json {{{").unwrap();
        let v: Vec<String> = store.get("tasks");
        assert!(v.is_empty());
    }

    #[test]
    fn set_overwrites_whole_collection() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();
        store.set("k", &vec!["a", "b"]).unwrap();
        store.set("k", &vec!["c"]).unwrap();
        let back: Vec<String> = store.get("k");
        assert_eq!(back, vec!["c"]);
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();
        store.set("k", &vec![1]).unwrap();
        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["k.json"]);
    }
}

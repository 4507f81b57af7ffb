use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{CategoryStore, DayPlan, Folder, Note, Task};
use crate::store::collections::{
    load_category_store, load_folders, load_notes, load_plans, load_tasks, save_category_store,
    save_folders, save_notes, save_plans, save_tasks,
};
use crate::store::kv::atomic_write;
use crate::store::{KvStore, StoreError};

pub const EXPORT_VERSION: u32 = 1;

/// Everything the app stores, as one portable document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub categories: CategoryStore,
    pub notes: Vec<Note>,
    pub folders: Vec<Folder>,
    pub plans: Vec<DayPlan>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("not a valid export file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported export version {0}")]
    Version(u32),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub fn export_all(store: &KvStore) -> ExportData {
    ExportData {
        version: EXPORT_VERSION,
        tasks: load_tasks(store),
        categories: load_category_store(store),
        notes: load_notes(store),
        folders: load_folders(store),
        plans: load_plans(store),
    }
}

pub fn export_to_file(store: &KvStore, path: &Path) -> Result<(), TransferError> {
    let data = export_all(store);
    let json = serde_json::to_vec_pretty(&data)?;
    atomic_write(path, &json).map_err(|source| TransferError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Replace every collection with the imported snapshot. Partial merges are
/// deliberately not offered; an import is a restore.
pub fn import_all(store: &KvStore, data: &ExportData) -> Result<(), TransferError> {
    if data.version != EXPORT_VERSION {
        return Err(TransferError::Version(data.version));
    }
    save_tasks(store, &data.tasks)?;
    save_category_store(store, &data.categories)?;
    save_notes(store, &data.notes)?;
    save_folders(store, &data.folders)?;
    save_plans(store, &data.plans)?;
    Ok(())
}

pub fn import_from_file(store: &KvStore, path: &Path) -> Result<(), TransferError> {
    let bytes = fs::read(path).map_err(|source| TransferError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let data: ExportData = serde_json::from_slice(&bytes)?;
    import_all(store, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskKind;
    use crate::ops::{category_ops, note_ops, task_ops};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, KvStore) {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        (tmp, kv)
    }

    #[test]
    fn export_import_round_trips() {
        let (_tmp, kv) = store();
        let cat = category_ops::add_category(&kv, "Work").unwrap();
        task_ops::add_task(&kv, "ship it", TaskKind::Single, Some(cat.id), None).unwrap();
        note_ops::add_note(&kv, None).unwrap();

        let data = export_all(&kv);

        let (_tmp2, other) = store();
        import_all(&other, &data).unwrap();

        assert_eq!(load_tasks(&other), load_tasks(&kv));
        assert_eq!(load_notes(&other), load_notes(&kv));
        assert_eq!(load_category_store(&other), load_category_store(&kv));
    }

    #[test]
    fn import_replaces_wholesale() {
        let (_tmp, kv) = store();
        task_ops::add_task(&kv, "stale", TaskKind::Single, None, None).unwrap();

        let empty = ExportData {
            version: EXPORT_VERSION,
            tasks: Vec::new(),
            categories: CategoryStore::default(),
            notes: Vec::new(),
            folders: Vec::new(),
            plans: Vec::new(),
        };
        import_all(&kv, &empty).unwrap();
        assert!(load_tasks(&kv).is_empty());
    }

    #[test]
    fn import_rejects_future_version() {
        let (_tmp, kv) = store();
        let mut data = export_all(&kv);
        data.version = 99;
        assert!(matches!(
            import_all(&kv, &data),
            Err(TransferError::Version(99))
        ));
    }

    #[test]
    fn file_round_trip() {
        let (_tmp, kv) = store();
        task_ops::add_task(&kv, "a", TaskKind::Single, None, None).unwrap();

        let out = TempDir::new().unwrap();
        let path = out.path().join("backup.json");
        export_to_file(&kv, &path).unwrap();

        let (_tmp2, other) = store();
        import_from_file(&other, &path).unwrap();
        assert_eq!(load_tasks(&other).len(), 1);
    }

    #[test]
    fn garbage_file_is_a_parse_error() {
        let (_tmp, kv) = store();
        let out = TempDir::new().unwrap();
        let path = out.path().join("junk.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            import_from_file(&kv, &path),
            Err(TransferError::Parse(_))
        ));
    }
}

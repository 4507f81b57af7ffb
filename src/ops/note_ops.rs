use crate::model::{Folder, Note};
use crate::store::collections::{load_folders, load_notes, save_folders, save_notes};
use crate::store::{KvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Create an empty note (optionally inside a folder) and return its id.
/// The caller hands the id straight to the editor; if nothing gets typed
/// the editor's first flush removes the record again.
pub fn add_note(store: &KvStore, folder_id: Option<&str>) -> Result<String, NoteError> {
    let mut note = Note::empty();
    note.folder_id = folder_id.map(str::to_string);
    let id = note.id.clone();
    let mut notes = load_notes(store);
    notes.insert(0, note);
    save_notes(store, &notes)?;
    Ok(id)
}

pub fn delete_note(store: &KvStore, id: &str) -> Result<(), NoteError> {
    let mut notes = load_notes(store);
    notes.retain(|n| n.id != id);
    save_notes(store, &notes)?;
    Ok(())
}

pub fn toggle_pin(store: &KvStore, id: &str) -> Result<bool, NoteError> {
    let mut notes = load_notes(store);
    let note = notes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
    note.pinned = !note.pinned;
    let pinned = note.pinned;
    save_notes(store, &notes)?;
    Ok(pinned)
}

/// Move a note into a folder (None = back to the root level).
pub fn move_note(store: &KvStore, id: &str, folder_id: Option<&str>) -> Result<(), NoteError> {
    if let Some(fid) = folder_id
        && !load_folders(store).iter().any(|f| f.id == fid)
    {
        return Err(NoteError::FolderNotFound(fid.to_string()));
    }
    let mut notes = load_notes(store);
    let note = notes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
    note.folder_id = folder_id.map(str::to_string);
    save_notes(store, &notes)?;
    Ok(())
}

pub fn add_folder(store: &KvStore, name: &str) -> Result<Folder, NoteError> {
    let folder = Folder::new(name);
    let mut folders = load_folders(store);
    folders.push(folder.clone());
    save_folders(store, &folders)?;
    Ok(folder)
}

pub fn rename_folder(store: &KvStore, id: &str, name: &str) -> Result<(), NoteError> {
    let mut folders = load_folders(store);
    let folder = folders
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or_else(|| NoteError::FolderNotFound(id.to_string()))?;
    folder.name = name.to_string();
    save_folders(store, &folders)?;
    Ok(())
}

/// Delete a folder; its notes move back to the root level.
pub fn delete_folder(store: &KvStore, id: &str) -> Result<(), NoteError> {
    let mut folders = load_folders(store);
    folders.retain(|f| f.id != id);
    save_folders(store, &folders)?;

    let mut notes = load_notes(store);
    let mut changed = false;
    for note in notes.iter_mut() {
        if note.folder_id.as_deref() == Some(id) {
            note.folder_id = None;
            changed = true;
        }
    }
    if changed {
        save_notes(store, &notes)?;
    }
    Ok(())
}

/// Notes in one folder (or the root), pinned first, then most recently
/// updated.
pub fn sorted_notes(store: &KvStore, folder_id: Option<&str>) -> Vec<Note> {
    let mut notes: Vec<Note> = load_notes(store)
        .into_iter()
        .filter(|n| n.folder_id.as_deref() == folder_id)
        .collect();
    notes.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, KvStore) {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        (tmp, kv)
    }

    fn seeded_note(kv: &KvStore, title: &str, age_minutes: i64, pinned: bool) -> String {
        let mut notes = load_notes(kv);
        let mut note = Note::empty();
        note.title = title.to_string();
        note.pinned = pinned;
        note.updated_at = Utc::now() - Duration::minutes(age_minutes);
        let id = note.id.clone();
        notes.push(note);
        save_notes(kv, &notes).unwrap();
        id
    }

    #[test]
    fn sorted_notes_pins_first_then_recency() {
        let (_tmp, kv) = store();
        seeded_note(&kv, "old", 60, false);
        seeded_note(&kv, "new", 1, false);
        seeded_note(&kv, "pinned-old", 120, true);

        let notes = sorted_notes(&kv, None);
        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["pinned-old", "new", "old"]);
    }

    #[test]
    fn delete_folder_reparents_notes() {
        let (_tmp, kv) = store();
        let folder = add_folder(&kv, "Ideas").unwrap();
        let id = add_note(&kv, Some(&folder.id)).unwrap();

        delete_folder(&kv, &folder.id).unwrap();

        assert!(load_folders(&kv).is_empty());
        let notes = load_notes(&kv);
        assert_eq!(notes[0].id, id);
        assert!(notes[0].folder_id.is_none());
    }

    #[test]
    fn move_note_validates_folder() {
        let (_tmp, kv) = store();
        let id = add_note(&kv, None).unwrap();
        assert!(matches!(
            move_note(&kv, &id, Some("ghost")),
            Err(NoteError::FolderNotFound(_))
        ));

        let folder = add_folder(&kv, "Ideas").unwrap();
        move_note(&kv, &id, Some(&folder.id)).unwrap();
        assert_eq!(load_notes(&kv)[0].folder_id.as_deref(), Some(folder.id.as_str()));
    }

    #[test]
    fn toggle_pin_flips() {
        let (_tmp, kv) = store();
        let id = add_note(&kv, None).unwrap();
        assert!(toggle_pin(&kv, &id).unwrap());
        assert!(!toggle_pin(&kv, &id).unwrap());
    }

    #[test]
    fn folder_scoping_filters_lists() {
        let (_tmp, kv) = store();
        let folder = add_folder(&kv, "Ideas").unwrap();
        add_note(&kv, Some(&folder.id)).unwrap();
        add_note(&kv, None).unwrap();

        assert_eq!(sorted_notes(&kv, None).len(), 1);
        assert_eq!(sorted_notes(&kv, Some(&folder.id)).len(), 1);
    }
}

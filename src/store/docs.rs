use chrono::{DateTime, Utc};

use crate::model::Note;

use super::collections::{load_notes, save_notes};
use super::kv::{KvStore, StoreError};

/// The editable (title, body) view of a note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// What the autosave editor needs from persistence. Kept as a trait so
/// the editor can be exercised against an in-memory double.
pub trait DocumentStore {
    fn load_document(&self, id: &str) -> Option<Document>;
    /// Upsert; stamps `updated_at` with the current time.
    fn save_document(&mut self, id: &str, title: &str, body: &str) -> Result<(), StoreError>;
    /// No-op if the document does not exist.
    fn delete_document(&mut self, id: &str) -> Result<(), StoreError>;
    /// Create an empty document and return its fresh id.
    fn create_document(&mut self) -> Result<String, StoreError>;
}

/// Forwarding impl so an editor can borrow a store owned elsewhere.
impl<T: DocumentStore + ?Sized> DocumentStore for &mut T {
    fn load_document(&self, id: &str) -> Option<Document> {
        (**self).load_document(id)
    }

    fn save_document(&mut self, id: &str, title: &str, body: &str) -> Result<(), StoreError> {
        (**self).save_document(id, title, body)
    }

    fn delete_document(&mut self, id: &str) -> Result<(), StoreError> {
        (**self).delete_document(id)
    }

    fn create_document(&mut self) -> Result<String, StoreError> {
        (**self).create_document()
    }
}

/// Production document store: read-modify-write over the notes
/// collection. Folder membership and pin state survive upserts.
/// Holds its own handle to the store (a cheap clone of the path).
pub struct NoteDocuments {
    store: KvStore,
}

impl NoteDocuments {
    pub fn new(store: KvStore) -> Self {
        NoteDocuments { store }
    }
}

impl DocumentStore for NoteDocuments {
    fn load_document(&self, id: &str) -> Option<Document> {
        load_notes(&self.store).into_iter().find(|n| n.id == id).map(|n| Document {
            id: n.id,
            title: n.title,
            body: n.body,
            updated_at: n.updated_at,
        })
    }

    fn save_document(&mut self, id: &str, title: &str, body: &str) -> Result<(), StoreError> {
        let mut notes = load_notes(&self.store);
        let now = Utc::now();
        if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
            note.title = title.to_string();
            note.body = body.to_string();
            note.updated_at = now;
        } else {
            let mut note = Note::empty();
            note.id = id.to_string();
            note.title = title.to_string();
            note.body = body.to_string();
            note.updated_at = now;
            notes.insert(0, note);
        }
        save_notes(&self.store, &notes)
    }

    fn delete_document(&mut self, id: &str) -> Result<(), StoreError> {
        let mut notes = load_notes(&self.store);
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Ok(());
        }
        save_notes(&self.store, &notes)
    }

    fn create_document(&mut self) -> Result<String, StoreError> {
        let note = Note::empty();
        let id = note.id.clone();
        let mut notes = load_notes(&self.store);
        notes.insert(0, note);
        save_notes(&self.store, &notes)?;
        Ok(id)
    }
}

/// In-memory document store for tests. Counts writes so tests can assert
/// debounce coalescing and flush-supersedes-debounce behavior.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    pub docs: Vec<Document>,
    pub write_count: usize,
    pub delete_count: usize,
    /// When set, the next save fails with this error message.
    pub fail_next_save: Option<String>,
}

/// Shared-handle impl so a test can observe the store while an editor
/// owns a handle to it.
#[cfg(test)]
impl DocumentStore for std::rc::Rc<std::cell::RefCell<MemoryDocuments>> {
    fn load_document(&self, id: &str) -> Option<Document> {
        self.borrow().load_document(id)
    }

    fn save_document(&mut self, id: &str, title: &str, body: &str) -> Result<(), StoreError> {
        self.borrow_mut().save_document(id, title, body)
    }

    fn delete_document(&mut self, id: &str) -> Result<(), StoreError> {
        self.borrow_mut().delete_document(id)
    }

    fn create_document(&mut self) -> Result<String, StoreError> {
        self.borrow_mut().create_document()
    }
}

#[cfg(test)]
impl DocumentStore for MemoryDocuments {
    fn load_document(&self, id: &str) -> Option<Document> {
        self.docs.iter().find(|d| d.id == id).cloned()
    }

    fn save_document(&mut self, id: &str, title: &str, body: &str) -> Result<(), StoreError> {
        if let Some(msg) = self.fail_next_save.take() {
            return Err(StoreError::Write {
                path: std::path::PathBuf::from("memory"),
                source: std::io::Error::other(msg),
            });
        }
        self.write_count += 1;
        let now = Utc::now();
        if let Some(doc) = self.docs.iter_mut().find(|d| d.id == id) {
            doc.title = title.to_string();
            doc.body = body.to_string();
            doc.updated_at = now;
        } else {
            self.docs.push(Document {
                id: id.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                updated_at: now,
            });
        }
        Ok(())
    }

    fn delete_document(&mut self, id: &str) -> Result<(), StoreError> {
        self.delete_count += 1;
        self.docs.retain(|d| d.id != id);
        Ok(())
    }

    fn create_document(&mut self) -> Result<String, StoreError> {
        let id = crate::util::id::new_id();
        self.docs.push(Document {
            id: id.clone(),
            title: String::new(),
            body: String::new(),
            updated_at: Utc::now(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn create_then_load() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        let mut docs = NoteDocuments::new(kv.clone());

        let id = docs.create_document().unwrap();
        let doc = docs.load_document(&id).unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.body, "");
    }

    #[test]
    fn save_upserts_and_stamps() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        let mut docs = NoteDocuments::new(kv.clone());

        let id = docs.create_document().unwrap();
        let before = docs.load_document(&id).unwrap().updated_at;
        docs.save_document(&id, "Title", "Body").unwrap();
        let doc = docs.load_document(&id).unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.body, "Body");
        assert!(doc.updated_at >= before);
    }

    #[test]
    fn save_missing_id_creates_record() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        let mut docs = NoteDocuments::new(kv.clone());

        docs.save_document("ghost", "t", "b").unwrap();
        assert!(docs.load_document("ghost").is_some());
    }

    #[test]
    fn upsert_preserves_folder_and_pin() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();

        let mut note = Note::empty();
        note.folder_id = Some("f1".into());
        note.pinned = true;
        let id = note.id.clone();
        save_notes(&kv, &[note]).unwrap();

        let mut docs = NoteDocuments::new(kv.clone());
        docs.save_document(&id, "t", "b").unwrap();

        let notes = load_notes(&kv);
        assert_eq!(notes[0].folder_id.as_deref(), Some("f1"));
        assert!(notes[0].pinned);
    }

    #[test]
    fn delete_missing_is_noop() {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        let mut docs = NoteDocuments::new(kv.clone());
        docs.delete_document("nope").unwrap();
    }
}

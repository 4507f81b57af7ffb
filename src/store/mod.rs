pub mod collections;
pub mod config;
pub mod docs;
pub mod journal;
pub mod kv;
pub mod state;

pub use docs::{Document, DocumentStore, NoteDocuments};
pub use kv::{KvStore, StoreError};

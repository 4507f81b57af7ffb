use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form note. The editor owns the draft while it is open; this
/// record is the durable representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Containing folder (None = root level)
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A flat folder for organizing notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create an empty draft note. If it is still empty at the editor's
    /// first flush it will be deleted rather than persisted.
    pub fn empty() -> Self {
        let now = Utc::now();
        Note {
            id: crate::util::id::new_id(),
            title: String::new(),
            body: String::new(),
            folder_id: None,
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when both title and body are blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }

    /// First two non-blank body lines, joined, for list previews.
    pub fn preview(&self) -> String {
        self.body
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            id: crate::util::id::new_id(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

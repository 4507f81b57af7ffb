use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted UI state (written to .state.json in the data directory)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which screen is showing ("today", "tasks", "notes", "history")
    pub screen: String,
    /// Folder open in the notes screen, if any
    #[serde(default)]
    pub open_folder: Option<String>,
    /// Per-screen list cursor positions
    #[serde(default)]
    pub cursors: HashMap<String, usize>,
}

/// Read .state.json from the data directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            screen: "notes".into(),
            open_folder: Some("f-1".into()),
            ..Default::default()
        };
        state.cursors.insert("notes".into(), 4);

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert_eq!(loaded.screen, "notes");
        assert_eq!(loaded.open_folder, Some("f-1".into()));
        assert_eq!(loaded.cursors.get("notes"), Some(&4));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }
}

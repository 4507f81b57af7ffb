use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Repeats every day it is planned (habits, chores)
    Routine,
    /// One-shot; disappears from the pool once a plan containing it is done
    Single,
}

/// A task in the pool, available for inclusion in day plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Owning category (None = uncategorized)
    #[serde(default)]
    pub category_id: Option<String>,
    /// Owning group within the category
    #[serde(default)]
    pub group_id: Option<String>,
    pub kind: TaskKind,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, kind: TaskKind) -> Self {
        Task {
            id: crate::util::id::new_id(),
            title: title.into(),
            category_id: None,
            group_id: None,
            kind,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let task = Task::new("water plants", TaskKind::Routine);
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn optional_fields_default() {
        let json = format!(
            r#"{{"id":"x","title":"t","kind":"single","created_at":"{}"}}"#,
            Utc::now().to_rfc3339()
        );
        let task: Task = serde_json::from_str(&json).unwrap();
        assert!(task.category_id.is_none());
        assert!(task.group_id.is_none());
        assert_eq!(task.kind, TaskKind::Single);
    }
}

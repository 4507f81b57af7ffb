use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskKind};

/// One task's appearance in a day plan. Category and group names are
/// denormalized at plan time so history stays readable after later edits
/// or deletions in the task pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTaskEntry {
    pub task_id: String,
    pub title: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    pub kind: TaskKind,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub note: Option<String>,
}

/// The set of tasks selected for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub entries: Vec<DayTaskEntry>,
    pub created_at: DateTime<Utc>,
}

impl DayTaskEntry {
    pub fn from_task(task: &Task) -> Self {
        DayTaskEntry {
            task_id: task.id.clone(),
            title: task.title.clone(),
            category_id: task.category_id.clone(),
            category_name: None,
            group_id: task.group_id.clone(),
            group_name: None,
            kind: task.kind,
            is_done: false,
            note: None,
        }
    }
}

/// Today's date in the user's local timezone. Plans are keyed on this.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

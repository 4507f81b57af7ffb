use crate::model::{Task, TaskKind};
use crate::store::collections::{load_tasks, save_tasks};
use crate::store::{KvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task title is empty")]
    EmptyTitle,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Add a task to the front of the pool.
pub fn add_task(
    store: &KvStore,
    title: &str,
    kind: TaskKind,
    category_id: Option<String>,
    group_id: Option<String>,
) -> Result<Task, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let mut task = Task::new(title, kind);
    task.category_id = category_id;
    task.group_id = group_id;

    let mut tasks = load_tasks(store);
    tasks.insert(0, task.clone());
    save_tasks(store, &tasks)?;
    Ok(task)
}

/// Apply an edit to one task.
pub fn update_task(
    store: &KvStore,
    id: &str,
    edit: impl FnOnce(&mut Task),
) -> Result<(), TaskError> {
    let mut tasks = load_tasks(store);
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    edit(task);
    save_tasks(store, &tasks)?;
    Ok(())
}

pub fn delete_task(store: &KvStore, id: &str) -> Result<(), TaskError> {
    delete_tasks(store, std::slice::from_ref(&id.to_string()))
}

/// Remove several tasks in one collection write.
pub fn delete_tasks(store: &KvStore, ids: &[String]) -> Result<(), TaskError> {
    let mut tasks = load_tasks(store);
    tasks.retain(|t| !ids.contains(&t.id));
    save_tasks(store, &tasks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, KvStore) {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        (tmp, kv)
    }

    #[test]
    fn add_prepends() {
        let (_tmp, kv) = store();
        add_task(&kv, "first", TaskKind::Single, None, None).unwrap();
        add_task(&kv, "second", TaskKind::Routine, None, None).unwrap();
        let tasks = load_tasks(&kv);
        assert_eq!(tasks[0].title, "second");
        assert_eq!(tasks[1].title, "first");
    }

    #[test]
    fn add_rejects_blank_title() {
        let (_tmp, kv) = store();
        assert!(matches!(
            add_task(&kv, "   ", TaskKind::Single, None, None),
            Err(TaskError::EmptyTitle)
        ));
    }

    #[test]
    fn update_edits_in_place() {
        let (_tmp, kv) = store();
        let task = add_task(&kv, "before", TaskKind::Single, None, None).unwrap();
        update_task(&kv, &task.id, |t| t.title = "after".into()).unwrap();
        assert_eq!(load_tasks(&kv)[0].title, "after");
    }

    #[test]
    fn update_missing_errors() {
        let (_tmp, kv) = store();
        assert!(matches!(
            update_task(&kv, "ghost", |_| {}),
            Err(TaskError::NotFound(_))
        ));
    }

    #[test]
    fn bulk_delete_is_one_write() {
        let (_tmp, kv) = store();
        let a = add_task(&kv, "a", TaskKind::Single, None, None).unwrap();
        let b = add_task(&kv, "b", TaskKind::Single, None, None).unwrap();
        add_task(&kv, "c", TaskKind::Single, None, None).unwrap();
        delete_tasks(&kv, &[a.id, b.id]).unwrap();
        let left = load_tasks(&kv);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "c");
    }
}

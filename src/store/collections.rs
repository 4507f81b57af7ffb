use crate::model::{CategoryStore, DayPlan, Folder, Note, Task};

use super::kv::{KvStore, StoreError};

pub const TASKS_KEY: &str = "tasks";
pub const NOTES_KEY: &str = "notes";
pub const FOLDERS_KEY: &str = "folders";
pub const CATEGORIES_KEY: &str = "categories";
pub const PLANS_KEY: &str = "plans";

pub fn load_tasks(store: &KvStore) -> Vec<Task> {
    store.get(TASKS_KEY)
}

pub fn save_tasks(store: &KvStore, tasks: &[Task]) -> Result<(), StoreError> {
    store.set(TASKS_KEY, &tasks)
}

pub fn load_notes(store: &KvStore) -> Vec<Note> {
    store.get(NOTES_KEY)
}

pub fn save_notes(store: &KvStore, notes: &[Note]) -> Result<(), StoreError> {
    store.set(NOTES_KEY, &notes)
}

pub fn load_folders(store: &KvStore) -> Vec<Folder> {
    store.get(FOLDERS_KEY)
}

pub fn save_folders(store: &KvStore, folders: &[Folder]) -> Result<(), StoreError> {
    store.set(FOLDERS_KEY, &folders)
}

pub fn load_category_store(store: &KvStore) -> CategoryStore {
    store.get(CATEGORIES_KEY)
}

pub fn save_category_store(store: &KvStore, cats: &CategoryStore) -> Result<(), StoreError> {
    store.set(CATEGORIES_KEY, cats)
}

pub fn load_plans(store: &KvStore) -> Vec<DayPlan> {
    store.get(PLANS_KEY)
}

pub fn save_plans(store: &KvStore, plans: &[DayPlan]) -> Result<(), StoreError> {
    store.set(PLANS_KEY, &plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskKind;
    use tempfile::TempDir;

    #[test]
    fn collections_are_independent_keys() {
        let tmp = TempDir::new().unwrap();
        let store = KvStore::open(tmp.path()).unwrap();

        save_tasks(&store, &[Task::new("a", TaskKind::Single)]).unwrap();
        save_notes(&store, &[Note::empty()]).unwrap();

        assert_eq!(load_tasks(&store).len(), 1);
        assert_eq!(load_notes(&store).len(), 1);
        assert!(load_folders(&store).is_empty());
        assert!(load_plans(&store).is_empty());
    }
}

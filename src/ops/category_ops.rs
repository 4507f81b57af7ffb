use crate::model::{Category, Group};
use crate::store::collections::{load_category_store, save_category_store};
use crate::store::{KvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub fn add_category(store: &KvStore, name: &str) -> Result<Category, CategoryError> {
    let cat = Category::new(name);
    let mut cs = load_category_store(store);
    cs.categories.push(cat.clone());
    save_category_store(store, &cs)?;
    Ok(cat)
}

pub fn rename_category(store: &KvStore, id: &str, name: &str) -> Result<(), CategoryError> {
    let mut cs = load_category_store(store);
    let cat = cs
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| CategoryError::CategoryNotFound(id.to_string()))?;
    cat.name = name.to_string();
    save_category_store(store, &cs)?;
    Ok(())
}

/// Delete a category and every group under it. Tasks keep their dangling
/// ids and render as uncategorized.
pub fn delete_category(store: &KvStore, id: &str) -> Result<(), CategoryError> {
    let mut cs = load_category_store(store);
    cs.categories.retain(|c| c.id != id);
    cs.groups.retain(|g| g.category_id != id);
    save_category_store(store, &cs)?;
    Ok(())
}

pub fn add_group(store: &KvStore, name: &str, category_id: &str) -> Result<Group, CategoryError> {
    let mut cs = load_category_store(store);
    if !cs.categories.iter().any(|c| c.id == category_id) {
        return Err(CategoryError::CategoryNotFound(category_id.to_string()));
    }
    let group = Group::new(name, category_id);
    cs.groups.push(group.clone());
    save_category_store(store, &cs)?;
    Ok(group)
}

pub fn rename_group(store: &KvStore, id: &str, name: &str) -> Result<(), CategoryError> {
    let mut cs = load_category_store(store);
    let group = cs
        .groups
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| CategoryError::GroupNotFound(id.to_string()))?;
    group.name = name.to_string();
    save_category_store(store, &cs)?;
    Ok(())
}

pub fn delete_group(store: &KvStore, id: &str) -> Result<(), CategoryError> {
    let mut cs = load_category_store(store);
    cs.groups.retain(|g| g.id != id);
    save_category_store(store, &cs)?;
    Ok(())
}

/// Categories in display order.
pub fn sorted_categories(store: &KvStore) -> Vec<Category> {
    let mut cats = load_category_store(store).categories;
    cats.sort_by_key(|c| c.order);
    cats
}

/// Groups of one category in display order.
pub fn groups_for_category(store: &KvStore, category_id: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = load_category_store(store)
        .groups
        .into_iter()
        .filter(|g| g.category_id == category_id)
        .collect();
    groups.sort_by_key(|g| g.order);
    groups
}

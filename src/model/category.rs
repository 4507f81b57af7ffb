use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level task category (e.g. "Work", "Home").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Sort position; assigned from the creation timestamp so new
    /// categories append at the end
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

/// A group nested under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

/// Categories and their groups, persisted together under one store key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStore {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Category {
            id: crate::util::id::new_id(),
            name: name.into(),
            order: now.timestamp_millis(),
            created_at: now,
        }
    }
}

impl Group {
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Group {
            id: crate::util::id::new_id(),
            name: name.into(),
            category_id: category_id.into(),
            order: now.timestamp_millis(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_deserializes_to_default() {
        let store: CategoryStore = serde_json::from_str("{}").unwrap();
        assert!(store.categories.is_empty());
        assert!(store.groups.is_empty());
    }

    #[test]
    fn group_links_to_category() {
        let cat = Category::new("Work");
        let group = Group::new("Deep work", &cat.id);
        assert_eq!(group.category_id, cat.id);
    }
}

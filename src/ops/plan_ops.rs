use chrono::{NaiveDate, Utc};

use crate::model::{DayPlan, DayTaskEntry, Task};
use crate::ops::category_ops;
use crate::store::collections::{load_plans, save_plans};
use crate::store::{KvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("no plan for {0}")]
    NotFound(NaiveDate),
    #[error("no entry for task {0}")]
    EntryNotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub fn get_plan(store: &KvStore, date: NaiveDate) -> Option<DayPlan> {
    load_plans(store).into_iter().find(|p| p.date == date)
}

/// Replace the plan for one day with the given task selection.
///
/// Done flags and per-entry notes from an existing plan for the same date
/// carry over, so re-planning mid-day never loses progress. Category and
/// group names are captured here; later edits to the pool leave history
/// untouched.
pub fn save_day_plan(store: &KvStore, date: NaiveDate, tasks: &[Task]) -> Result<DayPlan, PlanError> {
    let mut plans = load_plans(store);
    let prior = plans.iter().find(|p| p.date == date);

    let cats = category_ops::sorted_categories(store);
    let groups = crate::store::collections::load_category_store(store).groups;

    let entries: Vec<DayTaskEntry> = tasks
        .iter()
        .map(|task| {
            let mut entry = DayTaskEntry::from_task(task);
            entry.category_name = entry
                .category_id
                .as_deref()
                .and_then(|id| cats.iter().find(|c| c.id == id))
                .map(|c| c.name.clone());
            entry.group_name = entry
                .group_id
                .as_deref()
                .and_then(|id| groups.iter().find(|g| g.id == id))
                .map(|g| g.name.clone());
            if let Some(old) = prior.and_then(|p| p.entries.iter().find(|e| e.task_id == task.id)) {
                entry.is_done = old.is_done;
                entry.note = old.note.clone();
            }
            entry
        })
        .collect();

    let plan = DayPlan {
        date,
        entries,
        created_at: prior.map(|p| p.created_at).unwrap_or_else(Utc::now),
    };

    plans.retain(|p| p.date != date);
    plans.push(plan.clone());
    plans.sort_by_key(|p| p.date);
    save_plans(store, &plans)?;
    Ok(plan)
}

/// Flip an entry's done flag and return the new value.
pub fn toggle_done(store: &KvStore, date: NaiveDate, task_id: &str) -> Result<bool, PlanError> {
    let mut plans = load_plans(store);
    let plan = plans
        .iter_mut()
        .find(|p| p.date == date)
        .ok_or(PlanError::NotFound(date))?;
    let entry = plan
        .entries
        .iter_mut()
        .find(|e| e.task_id == task_id)
        .ok_or_else(|| PlanError::EntryNotFound(task_id.to_string()))?;
    entry.is_done = !entry.is_done;
    let done = entry.is_done;
    save_plans(store, &plans)?;
    Ok(done)
}

/// Attach a short note to an entry (None clears it).
pub fn set_entry_note(
    store: &KvStore,
    date: NaiveDate,
    task_id: &str,
    note: Option<&str>,
) -> Result<(), PlanError> {
    let mut plans = load_plans(store);
    let plan = plans
        .iter_mut()
        .find(|p| p.date == date)
        .ok_or(PlanError::NotFound(date))?;
    let entry = plan
        .entries
        .iter_mut()
        .find(|e| e.task_id == task_id)
        .ok_or_else(|| PlanError::EntryNotFound(task_id.to_string()))?;
    entry.note = note.map(str::to_string).filter(|n| !n.trim().is_empty());
    save_plans(store, &plans)?;
    Ok(())
}

pub fn delete_plan(store: &KvStore, date: NaiveDate) -> Result<(), PlanError> {
    let mut plans = load_plans(store);
    plans.retain(|p| p.date != date);
    save_plans(store, &plans)?;
    Ok(())
}

/// Plans newest first, for the history screen.
pub fn plans_newest_first(store: &KvStore) -> Vec<DayPlan> {
    let mut plans = load_plans(store);
    plans.sort_by(|a, b| b.date.cmp(&a.date));
    plans
}

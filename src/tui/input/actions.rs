//! Mutations shared by key bindings and swipe-panel taps.

use crate::model::plan::today;
use crate::ops::{category_ops, note_ops, plan_ops, task_ops};
use crate::store::collections::{load_folders, load_tasks};

use super::super::app::App;

fn report<E: std::fmt::Display>(app: &mut App, result: Result<impl Sized, E>) {
    if let Err(e) = result {
        app.set_status(e.to_string());
    }
    app.refresh();
}

pub fn toggle_note_pin(app: &mut App, id: &str) {
    let result = note_ops::toggle_pin(&app.store, id);
    report(app, result);
}

/// Move a note to the next folder in order (root after the last one).
pub fn cycle_note_folder(app: &mut App, id: &str) {
    let folders = load_folders(&app.store);
    if folders.is_empty() {
        app.set_status("no folders to move into");
        return;
    }
    let current = crate::store::collections::load_notes(&app.store)
        .iter()
        .find(|n| n.id == id)
        .and_then(|n| n.folder_id.clone());
    let next = match current {
        None => Some(folders[0].id.clone()),
        Some(cur) => folders
            .iter()
            .position(|f| f.id == cur)
            .and_then(|i| folders.get(i + 1))
            .map(|f| f.id.clone()),
    };
    let result = note_ops::move_note(&app.store, id, next.as_deref());
    report(app, result);
}

pub fn delete_note(app: &mut App, id: &str) {
    let result = note_ops::delete_note(&app.store, id);
    report(app, result);
}

pub fn delete_folder(app: &mut App, id: &str) {
    let result = note_ops::delete_folder(&app.store, id);
    report(app, result);
}

pub fn delete_task(app: &mut App, id: &str) {
    let result = task_ops::delete_task(&app.store, id);
    report(app, result);
}

pub fn delete_category(app: &mut App, id: &str) {
    let result = category_ops::delete_category(&app.store, id);
    report(app, result);
}

/// Move a task to the next category in display order (uncategorized
/// after the last one). Leaving a category drops the group too.
pub fn cycle_task_category(app: &mut App, id: &str) {
    let cats = category_ops::sorted_categories(&app.store);
    if cats.is_empty() {
        app.set_status("no categories to move into");
        return;
    }
    let current = load_tasks(&app.store)
        .iter()
        .find(|t| t.id == id)
        .and_then(|t| t.category_id.clone());
    let next = match current {
        None => Some(cats[0].id.clone()),
        Some(cur) => cats
            .iter()
            .position(|c| c.id == cur)
            .and_then(|i| cats.get(i + 1))
            .map(|c| c.id.clone()),
    };
    let result = task_ops::update_task(&app.store, id, |t| {
        t.category_id = next;
        t.group_id = None;
    });
    report(app, result);
}

/// Cycle a task through its category's groups (ungrouped after the last).
pub fn cycle_task_group(app: &mut App, id: &str) {
    let Some(task) = load_tasks(&app.store).into_iter().find(|t| t.id == id) else {
        return;
    };
    let Some(cat_id) = task.category_id else {
        app.set_status("task has no category");
        return;
    };
    let groups = category_ops::groups_for_category(&app.store, &cat_id);
    if groups.is_empty() {
        app.set_status("no groups in this category");
        return;
    }
    let next = match task.group_id {
        None => Some(groups[0].id.clone()),
        Some(cur) => groups
            .iter()
            .position(|g| g.id == cur)
            .and_then(|i| groups.get(i + 1))
            .map(|g| g.id.clone()),
    };
    let result = task_ops::update_task(&app.store, id, |t| t.group_id = next);
    report(app, result);
}

pub fn toggle_entry_done(app: &mut App, task_id: &str) {
    let result = plan_ops::toggle_done(&app.store, today(), task_id);
    report(app, result);
}

/// Add or remove a task from today's plan.
pub fn toggle_task_planned(app: &mut App, task_id: &str) {
    let tasks = load_tasks(&app.store);
    let planned: Vec<String> = plan_ops::get_plan(&app.store, today())
        .map(|p| p.entries.iter().map(|e| e.task_id.clone()).collect())
        .unwrap_or_default();

    let selected: Vec<_> = if planned.iter().any(|id| id == task_id) {
        tasks
            .iter()
            .filter(|t| planned.contains(&t.id) && t.id != task_id)
            .cloned()
            .collect()
    } else {
        tasks
            .iter()
            .filter(|t| planned.contains(&t.id) || t.id == task_id)
            .cloned()
            .collect()
    };
    let result = plan_ops::save_day_plan(&app.store, today(), &selected);
    report(app, result);
}

pub fn remove_from_plan(app: &mut App, task_id: &str) {
    let date = today();
    let Some(plan) = plan_ops::get_plan(&app.store, date) else {
        return;
    };
    let tasks = load_tasks(&app.store);
    let keep: Vec<_> = tasks
        .iter()
        .filter(|t| t.id != task_id && plan.entries.iter().any(|e| e.task_id == t.id))
        .cloned()
        .collect();
    let result = plan_ops::save_day_plan(&app.store, date, &keep);
    report(app, result);
}

pub fn open_folder(app: &mut App, id: &str) {
    app.open_folder = Some(id.to_string());
    app.set_cursor(0);
    app.set_scroll(0);
    app.refresh();
}

pub fn new_note(app: &mut App) {
    match note_ops::add_note(&app.store, app.open_folder.as_deref()) {
        Ok(id) => app.open_editor(&id),
        Err(e) => app.set_status(e.to_string()),
    }
}

pub fn delete_history_plan(app: &mut App, date: chrono::NaiveDate) {
    let result = plan_ops::delete_plan(&app.store, date);
    report(app, result);
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::TaskKind;
use crate::model::plan::today;
use crate::ops::{note_ops, plan_ops, task_ops};

use super::super::app::{App, Entry, EntryKind, Mode, RowItem, Screen};
use super::actions;

pub fn handle_navigate(app: &mut App, key: KeyEvent) {
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('1') => app.goto(Screen::Today),
        KeyCode::Char('2') => app.goto(Screen::Tasks),
        KeyCode::Char('3') => app.goto(Screen::Notes),
        KeyCode::Char('4') => app.goto(Screen::History),
        KeyCode::Tab => {
            let next = match app.screen {
                Screen::Today => Screen::Tasks,
                Screen::Tasks => Screen::Notes,
                Screen::Notes => Screen::History,
                _ => Screen::Today,
            };
            app.goto(next);
        }

        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Esc => app.go_back(),

        KeyCode::Enter => {
            if let Some(item) = app.items.get(app.cursor()).cloned() {
                match &item {
                    RowItem::PlanEntry { task_id, .. } => actions::toggle_entry_done(app, task_id),
                    RowItem::Task { id, .. } => actions::toggle_task_planned(app, id),
                    RowItem::Folder { id, .. } => actions::open_folder(app, id),
                    RowItem::Note { id, .. } => app.open_editor(id),
                    _ => {}
                }
            }
        }
        KeyCode::Char(' ') => {
            if let Some(item) = app.items.get(app.cursor()).cloned() {
                match &item {
                    RowItem::PlanEntry { task_id, .. } => actions::toggle_entry_done(app, task_id),
                    RowItem::Task { id, .. } => actions::toggle_task_planned(app, id),
                    _ => {}
                }
            }
        }

        KeyCode::Char('a') => match app.screen {
            Screen::Tasks => start_entry(app, EntryKind::AddTask, String::new()),
            Screen::Notes => actions::new_note(app),
            _ => {}
        },
        KeyCode::Char('A') if app.screen == Screen::Tasks => {
            start_entry(app, EntryKind::AddCategory, String::new())
        }
        KeyCode::Char('f') if app.screen == Screen::Notes => {
            start_entry(app, EntryKind::AddFolder, String::new())
        }
        KeyCode::Char('p') if app.screen == Screen::Notes => {
            if let Some(RowItem::Note { id, .. }) = app.items.get(app.cursor()).cloned() {
                actions::toggle_note_pin(app, &id);
            }
        }
        KeyCode::Char('m') => {
            if let Some(item) = app.items.get(app.cursor()).cloned() {
                match &item {
                    RowItem::Note { id, .. } => actions::cycle_note_folder(app, id),
                    RowItem::Task { id, .. } => actions::cycle_task_category(app, id),
                    _ => {}
                }
            }
        }
        KeyCode::Char('g') if app.screen == Screen::Tasks => {
            if let Some(RowItem::Task { id, .. }) = app.items.get(app.cursor()).cloned() {
                actions::cycle_task_group(app, &id);
            }
        }

        KeyCode::Char('r') => {
            if let Some(item) = app.items.get(app.cursor()).cloned() {
                match item {
                    RowItem::Task { id, title, .. } => {
                        start_entry(app, EntryKind::RenameTask { id }, title)
                    }
                    RowItem::CategoryHeader { id: Some(id), name } => {
                        start_entry(app, EntryKind::RenameCategory { id }, name)
                    }
                    RowItem::Folder { id, name } => {
                        start_entry(app, EntryKind::RenameFolder { id }, name)
                    }
                    _ => {}
                }
            }
        }
        KeyCode::Char('n') if app.screen == Screen::Today => {
            if let Some(RowItem::PlanEntry { task_id, .. }) = app.items.get(app.cursor()).cloned() {
                let current = plan_ops::get_plan(&app.store, today())
                    .and_then(|p| {
                        p.entries
                            .iter()
                            .find(|e| e.task_id == task_id)
                            .and_then(|e| e.note.clone())
                    })
                    .unwrap_or_default();
                start_entry(app, EntryKind::EntryNote { task_id }, current);
            }
        }

        KeyCode::Char('d') => {
            if let Some(item) = app.items.get(app.cursor()).cloned() {
                match &item {
                    RowItem::Task { id, .. } => actions::delete_task(app, id),
                    RowItem::CategoryHeader { id: Some(id), .. } => {
                        actions::delete_category(app, id)
                    }
                    RowItem::Note { id, .. } => actions::delete_note(app, id),
                    RowItem::Folder { id, .. } => actions::delete_folder(app, id),
                    RowItem::PlanEntry { task_id, .. } => actions::remove_from_plan(app, task_id),
                    RowItem::Plan { date, .. } => actions::delete_history_plan(app, *date),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: i64) {
    if app.items.is_empty() {
        return;
    }
    let max = app.items.len() as i64 - 1;
    let next = (app.cursor() as i64 + delta).clamp(0, max) as usize;
    app.set_cursor(next);

    // Keep the cursor on screen
    let height = app.list_area.height as usize;
    if height > 0 {
        if next < app.scroll() {
            app.set_scroll(next);
        } else if next >= app.scroll() + height {
            app.set_scroll(next + 1 - height);
        }
    }
}

fn start_entry(app: &mut App, kind: EntryKind, prefill: String) {
    app.entry = Some(Entry {
        kind,
        buffer: prefill,
    });
    app.mode = Mode::Entry;
}

/// One-line prompt for new tasks, categories, and folders.
pub fn handle_entry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.entry = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if let Some(entry) = app.entry.take() {
                commit_entry(app, entry);
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            if let Some(entry) = app.entry.as_mut() {
                entry.buffer.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(entry) = app.entry.as_mut() {
                entry.buffer.push(c);
            }
        }
        _ => {}
    }
}

fn commit_entry(app: &mut App, entry: Entry) {
    let text = entry.buffer.trim();

    // A blank entry note clears the note rather than being a no-op
    if let EntryKind::EntryNote { task_id } = &entry.kind {
        let note = Some(text).filter(|t| !t.is_empty());
        if let Err(e) = plan_ops::set_entry_note(&app.store, today(), task_id, note) {
            app.set_status(e.to_string());
        }
        app.refresh();
        return;
    }

    if text.is_empty() {
        return;
    }
    let result: Result<(), String> = match entry.kind {
        EntryKind::AddTask => {
            // "title!" marks a one-off; everything else repeats
            let (title, kind) = match text.strip_suffix('!') {
                Some(stripped) => (stripped, TaskKind::Single),
                None => (text, TaskKind::Routine),
            };
            task_ops::add_task(&app.store, title, kind, selected_category(app), None)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        EntryKind::AddCategory => crate::ops::category_ops::add_category(&app.store, text)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        EntryKind::AddFolder => note_ops::add_folder(&app.store, text)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        EntryKind::RenameTask { id } => {
            task_ops::update_task(&app.store, &id, |t| t.title = text.to_string())
                .map_err(|e| e.to_string())
        }
        EntryKind::RenameCategory { id } => {
            crate::ops::category_ops::rename_category(&app.store, &id, text)
                .map_err(|e| e.to_string())
        }
        EntryKind::RenameFolder { id } => {
            note_ops::rename_folder(&app.store, &id, text).map_err(|e| e.to_string())
        }
        EntryKind::EntryNote { .. } => unreachable!("handled above"),
    };
    if let Err(e) = result {
        app.set_status(e);
    }
    app.refresh();
}

/// The category whose section the cursor currently sits in, if any.
fn selected_category(app: &App) -> Option<String> {
    let mut current: Option<String> = None;
    for (i, item) in app.items.iter().enumerate() {
        if let RowItem::CategoryHeader { id, .. } = item {
            current = id.clone();
        }
        if i >= app.cursor() {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plan::today;
    use crate::ops::{category_ops, plan_ops};
    use crate::store::KvStore;
    use crate::store::collections::{load_folders, load_tasks};
    use crate::model::AppConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        (tmp, App::new(kv, AppConfig::default()))
    }

    fn entry(kind: EntryKind, buffer: &str) -> Entry {
        Entry {
            kind,
            buffer: buffer.to_string(),
        }
    }

    #[test]
    fn rename_entry_updates_task_title() {
        let (_tmp, mut app) = app();
        let task =
            task_ops::add_task(&app.store, "before", TaskKind::Routine, None, None).unwrap();
        commit_entry(&mut app, entry(EntryKind::RenameTask { id: task.id }, "after"));
        assert_eq!(load_tasks(&app.store)[0].title, "after");
    }

    #[test]
    fn rename_entry_updates_category_and_folder() {
        let (_tmp, mut app) = app();
        let cat = category_ops::add_category(&app.store, "Wrok").unwrap();
        let folder = note_ops::add_folder(&app.store, "Idaes").unwrap();

        commit_entry(&mut app, entry(EntryKind::RenameCategory { id: cat.id }, "Work"));
        commit_entry(&mut app, entry(EntryKind::RenameFolder { id: folder.id }, "Ideas"));

        assert_eq!(category_ops::sorted_categories(&app.store)[0].name, "Work");
        assert_eq!(load_folders(&app.store)[0].name, "Ideas");
    }

    #[test]
    fn entry_note_sets_and_blank_clears() {
        let (_tmp, mut app) = app();
        let task = task_ops::add_task(&app.store, "run", TaskKind::Routine, None, None).unwrap();
        plan_ops::save_day_plan(&app.store, today(), std::slice::from_ref(&task)).unwrap();

        commit_entry(
            &mut app,
            entry(EntryKind::EntryNote { task_id: task.id.clone() }, "5k, easy pace"),
        );
        let note = plan_ops::get_plan(&app.store, today()).unwrap().entries[0]
            .note
            .clone();
        assert_eq!(note.as_deref(), Some("5k, easy pace"));

        commit_entry(&mut app, entry(EntryKind::EntryNote { task_id: task.id }, "  "));
        let note = plan_ops::get_plan(&app.store, today()).unwrap().entries[0]
            .note
            .clone();
        assert_eq!(note, None);
    }

    #[test]
    fn rename_key_prefills_from_header() {
        let (_tmp, mut app) = app();
        let cat = category_ops::add_category(&app.store, "Work").unwrap();
        task_ops::add_task(&app.store, "t", TaskKind::Routine, Some(cat.id.clone()), None)
            .unwrap();
        app.goto(Screen::Tasks);
        app.set_cursor(0); // the category header row

        handle_navigate(
            &mut app,
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE),
        );

        let entry = app.entry.as_ref().unwrap();
        assert_eq!(entry.buffer, "Work");
        assert_eq!(entry.kind, EntryKind::RenameCategory { id: cat.id });
    }
}

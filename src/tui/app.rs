use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::editor::{AutosaveEditor, CaretFollow, TextMeasure, Viewport};
use crate::gesture::{EdgeBackNavigator, SwipeConfig, SwipeController};
use crate::model::{AppConfig, DayPlan};
use crate::ops::{note_ops, plan_ops};
use crate::store::collections::load_tasks;
use crate::store::config::{load_config, resolve_data_dir};
use crate::store::state::{UiState, read_ui_state, write_ui_state};
use crate::store::{KvStore, NoteDocuments};

use super::theme::Theme;
use super::{input, pointer, render};

/// Gesture units per terminal cell. Terminal mouse coordinates are much
/// coarser than the pixel distances the thresholds are written in, so the
/// pointer router scales them up before the recognizers see them.
pub const X_UNITS_PER_CELL: f32 = 8.0;
pub const Y_UNITS_PER_CELL: f32 = 16.0;

/// Action panel widths per row kind, in gesture units.
pub const NOTE_LEFT_PANEL: f32 = 70.0;
pub const NOTE_RIGHT_PANEL: f32 = 140.0;
pub const ROW_RIGHT_PANEL: f32 = 70.0;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Today,
    Tasks,
    Notes,
    Editor,
    History,
}

impl Screen {
    pub fn key(self) -> &'static str {
        match self {
            Screen::Today => "today",
            Screen::Tasks => "tasks",
            Screen::Notes => "notes",
            Screen::Editor => "editor",
            Screen::History => "history",
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Entry,
}

/// What the one-line entry prompt will do on Enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    AddTask,
    AddCategory,
    AddFolder,
    RenameTask { id: String },
    RenameCategory { id: String },
    RenameFolder { id: String },
    /// Short note on one of today's plan entries (blank clears it)
    EntryNote { task_id: String },
}

#[derive(Debug)]
pub struct Entry {
    pub kind: EntryKind,
    pub buffer: String,
}

/// A flattened item in the current screen's visible list
#[derive(Debug, Clone)]
pub enum RowItem {
    CategoryHeader {
        /// None for the synthetic Uncategorized section
        id: Option<String>,
        name: String,
    },
    Task {
        id: String,
        title: String,
        planned: bool,
        group: Option<String>,
    },
    PlanEntry {
        task_id: String,
        title: String,
        done: bool,
        category: Option<String>,
    },
    Folder {
        id: String,
        name: String,
    },
    Note {
        id: String,
        title: String,
        preview: String,
        pinned: bool,
    },
    Plan {
        date: NaiveDate,
        done: usize,
        total: usize,
    },
}

impl RowItem {
    /// Stable key for carrying swipe state across list rebuilds.
    pub fn gesture_key(&self) -> Option<String> {
        match self {
            RowItem::Task { id, .. } => Some(format!("task:{id}")),
            RowItem::PlanEntry { task_id, .. } => Some(format!("entry:{task_id}")),
            RowItem::Note { id, .. } => Some(format!("note:{id}")),
            RowItem::Folder { id, .. } => Some(format!("folder:{id}")),
            _ => None,
        }
    }

    /// Swipe geometry for this row kind, if it is swipeable at all.
    pub fn swipe_config(&self, config: &AppConfig) -> Option<SwipeConfig> {
        let (left, right) = match self {
            RowItem::Note { .. } => (NOTE_LEFT_PANEL, NOTE_RIGHT_PANEL),
            RowItem::Task { .. } | RowItem::PlanEntry { .. } | RowItem::Folder { .. } => {
                (0.0, ROW_RIGHT_PANEL)
            }
            _ => return None,
        };
        Some(SwipeConfig {
            left_panel_width: left,
            right_panel_width: right,
            open_threshold: config.gesture.open_threshold,
            close_threshold: config.gesture.close_threshold,
        })
    }
}

/// Live note-editor state while the Editor screen is up
pub struct EditorSession {
    pub autosave: AutosaveEditor<NoteDocuments>,
    /// Byte offset of the caret in the body
    pub caret: usize,
    pub editing_title: bool,
    pub measure: TextMeasure,
    pub follow: CaretFollow,
    pub scroll_top: usize,
    /// Body viewport geometry, captured at render time
    pub view_height: usize,
    pub view_width: usize,
}

impl EditorSession {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_top: self.scroll_top,
            height: self.view_height,
            content_rows: self.measure.total_rows(),
        }
    }

    /// Re-measure the body and let the caret follower adjust the scroll.
    pub fn after_edit(&mut self) {
        self.measure.sync(self.autosave.body(), self.view_width.max(1));
        let caret_bottom = self.measure.caret_row(self.caret) + 1;
        if let Some(top) = self.follow.on_resize(self.viewport(), caret_bottom) {
            self.scroll_top = top;
        }
    }

    pub fn after_caret_move(&mut self) {
        let caret_bottom = self.measure.caret_row(self.caret) + 1;
        if let Some(top) = self.follow.on_caret_moved(self.viewport(), caret_bottom) {
            self.scroll_top = top;
        }
    }
}

/// Main application state
pub struct App {
    pub store: KvStore,
    pub config: AppConfig,
    pub theme: Theme,
    pub screen: Screen,
    pub mode: Mode,
    pub should_quit: bool,
    /// Screen the editor was entered from (back returns here)
    pub editor_from: Screen,
    pub editor: Option<EditorSession>,
    pub entry: Option<Entry>,
    /// Folder open in the notes screen
    pub open_folder: Option<String>,
    /// Per-screen list cursors
    pub cursors: HashMap<String, usize>,
    /// Per-screen list scroll offsets
    pub scrolls: HashMap<String, usize>,
    /// Flattened rows of the current list screen
    pub items: Vec<RowItem>,
    /// Swipe state per gesture key, carried across refreshes
    pub gestures: HashMap<String, SwipeController>,
    pub edge: EdgeBackNavigator,
    /// Set by the edge navigator's callback; drained each tick
    pub back_requested: Rc<Cell<bool>>,
    /// Row index the active pointer sequence started on
    pub pointer_row: Option<usize>,
    /// Content area of the list, captured at render time for hit testing
    pub list_area: Rect,
    pub status: Option<String>,
    pub show_help: bool,
}

impl App {
    pub fn new(store: KvStore, config: AppConfig) -> Self {
        let theme = Theme::from_config(&config.ui);
        let back_requested = Rc::new(Cell::new(false));
        let edge = EdgeBackNavigator::new(config.gesture.edge_zone);

        let mut app = App {
            store,
            config,
            theme,
            screen: Screen::Today,
            mode: Mode::Navigate,
            should_quit: false,
            editor_from: Screen::Notes,
            editor: None,
            entry: None,
            open_folder: None,
            cursors: HashMap::new(),
            scrolls: HashMap::new(),
            items: Vec::new(),
            gestures: HashMap::new(),
            edge,
            back_requested,
            pointer_row: None,
            list_area: Rect::default(),
            status: None,
            show_help: false,
        };
        app.refresh();
        app
    }

    pub fn cursor(&self) -> usize {
        *self.cursors.get(self.screen.key()).unwrap_or(&0)
    }

    pub fn set_cursor(&mut self, value: usize) {
        self.cursors.insert(self.screen.key().to_string(), value);
    }

    pub fn scroll(&self) -> usize {
        *self.scrolls.get(self.screen.key()).unwrap_or(&0)
    }

    pub fn set_scroll(&mut self, value: usize) {
        self.scrolls.insert(self.screen.key().to_string(), value);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Switch screens, rebuilding the list from the store. Collections are
    /// re-read on every return to a list screen; the editor may have
    /// rewritten them in the meantime.
    pub fn goto(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        if self.screen == Screen::Editor {
            self.close_editor();
        }
        self.screen = screen;
        self.entry = None;
        self.refresh();
    }

    /// Rebuild the visible rows for the current screen and reconcile swipe
    /// controllers: rows keep their controller across rebuilds, rows that
    /// disappeared drop theirs.
    pub fn refresh(&mut self) {
        self.items = match self.screen {
            Screen::Today => self.build_today_items(),
            Screen::Tasks => self.build_task_items(),
            Screen::Notes => self.build_note_items(),
            Screen::History => self.build_history_items(),
            Screen::Editor => Vec::new(),
        };

        let mut kept = HashMap::new();
        for item in &self.items {
            if let (Some(key), Some(cfg)) = (item.gesture_key(), item.swipe_config(&self.config)) {
                let controller = self
                    .gestures
                    .remove(&key)
                    .unwrap_or_else(|| SwipeController::new(cfg));
                kept.insert(key, controller);
            }
        }
        self.gestures = kept;

        let max = self.items.len().saturating_sub(1);
        if self.cursor() > max {
            self.set_cursor(max);
        }
        self.update_back_target();
    }

    fn build_today_items(&self) -> Vec<RowItem> {
        match plan_ops::get_plan(&self.store, crate::model::plan::today()) {
            Some(plan) => plan_rows(&plan),
            None => Vec::new(),
        }
    }

    fn build_task_items(&self) -> Vec<RowItem> {
        let tasks = load_tasks(&self.store);
        let planned: Vec<String> = plan_ops::get_plan(&self.store, crate::model::plan::today())
            .map(|p| p.entries.iter().map(|e| e.task_id.clone()).collect())
            .unwrap_or_default();
        let cats = crate::ops::category_ops::sorted_categories(&self.store);
        let groups = crate::store::collections::load_category_store(&self.store).groups;

        let group_name = |task: &crate::model::Task| {
            task.group_id
                .as_deref()
                .and_then(|id| groups.iter().find(|g| g.id == id))
                .map(|g| g.name.clone())
        };

        let mut items = Vec::new();
        for cat in &cats {
            let in_cat: Vec<_> = tasks
                .iter()
                .filter(|t| t.category_id.as_deref() == Some(cat.id.as_str()))
                .collect();
            if in_cat.is_empty() {
                continue;
            }
            items.push(RowItem::CategoryHeader {
                id: Some(cat.id.clone()),
                name: cat.name.clone(),
            });
            for task in in_cat {
                items.push(RowItem::Task {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    planned: planned.contains(&task.id),
                    group: group_name(task),
                });
            }
        }
        let uncategorized: Vec<_> = tasks
            .iter()
            .filter(|t| {
                t.category_id.is_none()
                    || !cats.iter().any(|c| Some(c.id.as_str()) == t.category_id.as_deref())
            })
            .collect();
        if !uncategorized.is_empty() {
            if !items.is_empty() {
                items.push(RowItem::CategoryHeader {
                    id: None,
                    name: "Uncategorized".into(),
                });
            }
            for task in uncategorized {
                items.push(RowItem::Task {
                    id: task.id.clone(),
                    title: task.title.clone(),
                    planned: planned.contains(&task.id),
                    group: group_name(task),
                });
            }
        }
        items
    }

    fn build_note_items(&self) -> Vec<RowItem> {
        let mut items = Vec::new();
        if self.open_folder.is_none() {
            for folder in crate::store::collections::load_folders(&self.store) {
                items.push(RowItem::Folder {
                    id: folder.id,
                    name: folder.name,
                });
            }
        }
        for note in note_ops::sorted_notes(&self.store, self.open_folder.as_deref()) {
            let title = if note.title.trim().is_empty() {
                "(untitled)".to_string()
            } else {
                note.title.clone()
            };
            let preview = note.preview();
            items.push(RowItem::Note {
                id: note.id,
                title,
                preview,
                pinned: note.pinned,
            });
        }
        items
    }

    fn build_history_items(&self) -> Vec<RowItem> {
        plan_ops::plans_newest_first(&self.store)
            .into_iter()
            .map(|p| RowItem::Plan {
                date: p.date,
                done: p.entries.iter().filter(|e| e.is_done).count(),
                total: p.entries.len(),
            })
            .collect()
    }

    /// Where "back" goes right now, if anywhere. The edge navigator is
    /// attached exactly when there is a target.
    fn update_back_target(&mut self) {
        let has_target =
            self.screen == Screen::Editor || (self.screen == Screen::Notes && self.open_folder.is_some());
        if has_target {
            let flag = Rc::clone(&self.back_requested);
            self.edge.register(Some(Box::new(move || flag.set(true))));
        } else {
            self.edge.register(None);
        }
    }

    pub fn go_back(&mut self) {
        match self.screen {
            Screen::Editor => {
                self.close_editor();
                self.screen = self.editor_from;
                self.refresh();
            }
            Screen::Notes if self.open_folder.is_some() => {
                self.open_folder = None;
                self.set_cursor(0);
                self.refresh();
            }
            _ => {}
        }
    }

    pub fn open_editor(&mut self, note_id: &str) {
        let docs = NoteDocuments::new(self.store.clone());
        let autosave = AutosaveEditor::open(docs, note_id)
            .with_debounce(Duration::from_millis(self.config.editor.debounce_ms));
        let caret = autosave.body().len();
        let mut session = EditorSession {
            autosave,
            caret,
            editing_title: false,
            measure: TextMeasure::new(),
            follow: CaretFollow::new(self.config.editor.caret_margin as usize),
            scroll_top: 0,
            view_height: 1,
            view_width: 1,
        };
        session.follow.on_focus();
        session.measure.sync(session.autosave.body(), 1);
        self.editor = Some(session);
        self.editor_from = self.screen;
        self.screen = Screen::Editor;
        self.update_back_target();
    }

    /// Flush and drop the editor session. The flush is the back/done
    /// checkpoint; a blank draft disappears here.
    pub fn close_editor(&mut self) {
        if let Some(mut session) = self.editor.take()
            && session.autosave.flush().is_err()
        {
            self.status = Some("note save failed (journaled)".into());
        }
    }

    /// Advance animations and the autosave scheduler. `idle` is true when
    /// the poll timed out with no input pending.
    pub fn tick(&mut self, now: Instant, idle: bool) {
        for controller in self.gestures.values_mut() {
            controller.tick(now);
        }
        if let Some(session) = self.editor.as_mut() {
            session.autosave.poll(now, idle);
            let view = session.viewport();
            session.follow.tick(now, view);
        }
        if self.back_requested.replace(false) {
            self.go_back();
        }
    }
}

/// Flatten a day plan into visible rows.
fn plan_rows(plan: &DayPlan) -> Vec<RowItem> {
    plan.entries
        .iter()
        .map(|e| RowItem::PlanEntry {
            task_id: e.task_id.clone(),
            title: e.title.clone(),
            done: e.is_done,
            category: e.category_name.clone(),
        })
        .collect()
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let ui_state = match read_ui_state(app.store.dir()) {
        Some(s) => s,
        None => return,
    };
    app.screen = match ui_state.screen.as_str() {
        "tasks" => Screen::Tasks,
        "notes" => Screen::Notes,
        "history" => Screen::History,
        _ => Screen::Today,
    };
    app.open_folder = ui_state.open_folder;
    app.cursors = ui_state.cursors;
    app.refresh();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    // The editor is not a restorable screen; fall back to its origin
    let screen = if app.screen == Screen::Editor {
        app.editor_from
    } else {
        app.screen
    };
    let ui_state = UiState {
        screen: screen.key().to_string(),
        open_folder: app.open_folder.clone(),
        cursors: app.cursors.clone(),
    };
    let _ = write_ui_state(app.store.dir(), &ui_state);
}

/// Run the TUI application
pub fn run(data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = resolve_data_dir(data_dir);
    let store = KvStore::open(&dir)?;
    let config = load_config(&dir)?;

    let mut app = App::new(store, config);
    restore_ui_state(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Quit checkpoint: the draft must land before the terminal goes away
    app.close_editor();
    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::collections::{load_notes, save_notes};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let kv = KvStore::open(tmp.path()).unwrap();
        (tmp, App::new(kv, AppConfig::default()))
    }

    #[test]
    fn notes_screen_rows_carry_title_and_preview() {
        let (_tmp, mut app) = app();
        let id = note_ops::add_note(&app.store, None).unwrap();
        let mut notes = load_notes(&app.store);
        notes[0].title = "groceries".into();
        notes[0].body = "milk\n\neggs\nbread".into();
        save_notes(&app.store, &notes).unwrap();

        app.goto(Screen::Notes);

        let RowItem::Note { id: row_id, title, preview, .. } = &app.items[0] else {
            panic!("expected a note row, got {:?}", app.items[0]);
        };
        assert_eq!(row_id, &id);
        assert_eq!(title, "groceries");
        assert_eq!(preview, "milk eggs");
    }
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // A timed-out poll is this loop's idle callback: nothing else
        // wants the tick, so deferred work (the debounced note write) may
        // run now.
        let idle = !event::poll(Duration::from_millis(50))?;
        if !idle {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => pointer::handle_mouse(app, mouse, Instant::now()),
                _ => {}
            }
        }

        app.tick(Instant::now(), idle);

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

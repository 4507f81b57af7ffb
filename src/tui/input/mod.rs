pub mod actions;
mod editor;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Screen};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    // Checkpoint before a shell suspend so no pending edit is lost
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('z')
        && let Some(session) = app.editor.as_mut()
    {
        if session.autosave.flush().is_err() {
            app.status = Some("note save failed (journaled)".into());
        }
        return;
    }

    if app.screen == Screen::Editor {
        editor::handle_editor(app, key);
        return;
    }
    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Entry => navigate::handle_entry(app, key),
    }
}

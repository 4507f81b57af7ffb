use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use super::super::app::App;

pub fn handle_editor(app: &mut App, key: KeyEvent) {
    let now = Instant::now();

    // Back checkpoint: flush (or delete a blank draft) and return
    if key.code == KeyCode::Esc {
        app.go_back();
        return;
    }

    let Some(session) = app.editor.as_mut() else {
        return;
    };

    if session.editing_title {
        match key.code {
            KeyCode::Tab | KeyCode::Enter | KeyCode::Down => {
                session.editing_title = false;
                session.follow.on_focus();
            }
            KeyCode::Backspace => {
                let mut title = session.autosave.title().to_string();
                if let Some((i, _)) = title.grapheme_indices(true).last() {
                    title.truncate(i);
                    session.autosave.input_title(title, now);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut title = session.autosave.title().to_string();
                title.push(c);
                session.autosave.input_title(title, now);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => session.editing_title = true,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            insert(session, &c.to_string(), now);
        }
        KeyCode::Enter => insert(session, "\n", now),
        KeyCode::Backspace => {
            let body = session.autosave.body();
            if let Some((i, _)) = body[..session.caret].grapheme_indices(true).last() {
                let mut next = body.to_string();
                next.replace_range(i..session.caret, "");
                session.caret = i;
                session.autosave.input_body(next, now);
                if session.autosave.body().trim().is_empty() {
                    session.follow.on_cleared();
                }
                session.after_edit();
            }
        }
        KeyCode::Left => {
            let body = session.autosave.body();
            if let Some((i, _)) = body[..session.caret].grapheme_indices(true).last() {
                session.caret = i;
                session.after_caret_move();
            }
        }
        KeyCode::Right => {
            let body = session.autosave.body();
            if let Some(g) = body[session.caret..].graphemes(true).next() {
                session.caret += g.len();
                session.after_caret_move();
            }
        }
        KeyCode::Up => {
            move_caret_vertically(session, -1);
            session.after_caret_move();
        }
        KeyCode::Down => {
            move_caret_vertically(session, 1);
            session.after_caret_move();
        }
        KeyCode::Home => {
            let body = session.autosave.body();
            session.caret = line_start(body, session.caret);
            session.after_caret_move();
        }
        KeyCode::End => {
            let body = session.autosave.body();
            session.caret = line_end(body, session.caret);
            session.after_caret_move();
        }
        _ => {}
    }
}

fn insert(session: &mut super::super::app::EditorSession, text: &str, now: Instant) {
    let mut body = session.autosave.body().to_string();
    body.insert_str(session.caret, text);
    session.caret += text.len();
    session.autosave.input_body(body, now);
    session.after_edit();
}

fn line_start(s: &str, caret: usize) -> usize {
    s[..caret].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(s: &str, caret: usize) -> usize {
    s[caret..].find('\n').map(|i| caret + i).unwrap_or(s.len())
}

/// Move the caret one logical line up or down, keeping the grapheme
/// column where the target line is long enough.
fn move_caret_vertically(session: &mut super::super::app::EditorSession, delta: i64) {
    let body = session.autosave.body();
    let start = line_start(body, session.caret);
    let col = body[start..session.caret].graphemes(true).count();

    let target_start = if delta < 0 {
        if start == 0 {
            return;
        }
        line_start(body, start - 1)
    } else {
        let end = line_end(body, session.caret);
        if end == body.len() {
            return;
        }
        end + 1
    };

    let target_end = line_end(body, target_start);
    let line = &body[target_start..target_end];
    // A column past the end of a shorter line clamps to its end
    let offset = line
        .grapheme_indices(true)
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    session.caret = target_start + offset;
}

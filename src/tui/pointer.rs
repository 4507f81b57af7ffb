use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::gesture::{Disposition, Point, Side};

use super::app::{
    App, NOTE_LEFT_PANEL, NOTE_RIGHT_PANEL, ROW_RIGHT_PANEL, RowItem, Screen,
    X_UNITS_PER_CELL, Y_UNITS_PER_CELL,
};
use super::input::actions;

/// Route a terminal mouse event through the gesture recognizers.
///
/// Order matters: the edge navigator sees every event first, and a
/// Capture disposition means no row controller (and no tap) may react to
/// the rest of the sequence. This is the capture-phase contract the
/// recognizers were written against.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let point = to_point(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.edge.on_touch_start(point);
            app.pointer_row = row_at(app, mouse.row);
            if let Some(key) = pointer_gesture_key(app)
                && let Some(c) = app.gestures.get_mut(&key)
            {
                c.on_touch_start(point);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.edge.on_touch_move(point) == Disposition::Capture {
                // The navigator owns the sequence now. End the row's drag
                // before it has moved past its axis margin, so it settles
                // back to where it was resting.
                if let Some(key) = pointer_gesture_key(app)
                    && let Some(c) = app.gestures.get_mut(&key)
                {
                    c.on_touch_end(now);
                }
                app.pointer_row = None;
                return;
            }
            if let Some(key) = pointer_gesture_key(app)
                && let Some(c) = app.gestures.get_mut(&key)
            {
                c.on_touch_move(point);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.edge.on_touch_end(point) == Disposition::Capture {
                app.pointer_row = None;
                return;
            }
            let row = app.pointer_row.take();
            if let Some(row) = row {
                let mut swiped = false;
                if let Some(key) = gesture_key_for(app, row)
                    && let Some(c) = app.gestures.get_mut(&key)
                {
                    c.on_touch_move(point);
                    swiped = c.did_swipe();
                    c.on_touch_end(now);
                }
                // The synthetic click after a swipe is suppressed
                if !swiped {
                    tap(app, row, mouse.column, now);
                }
            }
        }
        MouseEventKind::ScrollDown => scroll_by(app, 1, now),
        MouseEventKind::ScrollUp => scroll_by(app, -1, now),
        _ => {}
    }
}

fn to_point(column: u16, row: u16) -> Point {
    Point::new(
        column as f32 * X_UNITS_PER_CELL,
        row as f32 * Y_UNITS_PER_CELL,
    )
}

/// The list row index under a terminal row, if any.
fn row_at(app: &App, terminal_row: u16) -> Option<usize> {
    let area = app.list_area;
    if terminal_row < area.y || terminal_row >= area.y + area.height {
        return None;
    }
    let index = (terminal_row - area.y) as usize + app.scroll();
    (index < app.items.len()).then_some(index)
}

fn gesture_key_for(app: &App, row: usize) -> Option<String> {
    app.items.get(row).and_then(|item| item.gesture_key())
}

fn pointer_gesture_key(app: &App) -> Option<String> {
    app.pointer_row.and_then(|row| gesture_key_for(app, row))
}

fn scroll_by(app: &mut App, delta: i64, now: Instant) {
    if app.screen == Screen::Editor {
        if let Some(session) = app.editor.as_mut() {
            let max = session
                .measure
                .total_rows()
                .saturating_sub(session.view_height);
            let top = (session.scroll_top as i64 + delta).clamp(0, max as i64) as usize;
            if top != session.scroll_top {
                session.scroll_top = top;
                session.follow.on_scroll(now);
            }
        }
        return;
    }
    let max = app.items.len().saturating_sub(app.list_area.height as usize);
    let next = (app.scroll() as i64 + delta).clamp(0, max as i64) as usize;
    app.set_scroll(next);
}

/// A completed tap (press and release without a swipe) on a list row.
fn tap(app: &mut App, row: usize, column: u16, now: Instant) {
    app.set_cursor(row);

    let Some(item) = app.items.get(row).cloned() else {
        return;
    };
    let key = item.gesture_key();

    if let Some(key) = &key
        && let Some(c) = app.gestures.get_mut(key)
        && let Some(side) = c.revealed()
    {
        if let Some(action) = panel_hit(app, &item, side, column) {
            if let Some(c) = app.gestures.get_mut(key) {
                c.close(now);
            }
            run_panel_action(app, &item, action);
        } else {
            // Tapping the content of an open row just closes it
            if let Some(c) = app.gestures.get_mut(key) {
                c.close(now);
            }
        }
        return;
    }

    activate(app, &item);
}

/// Which action button, if any, a tap column lands on for a revealed side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelAction {
    Pin,
    Move,
    Delete,
}

fn panel_hit(app: &App, item: &RowItem, side: Side, column: u16) -> Option<PanelAction> {
    let area = app.list_area;
    match (side, item) {
        (Side::Left, RowItem::Note { .. }) => {
            let cells = (NOTE_LEFT_PANEL / X_UNITS_PER_CELL) as u16;
            (column < area.x + cells).then_some(PanelAction::Pin)
        }
        (Side::Right, RowItem::Note { .. }) => {
            // Two 70-unit buttons: move | delete
            let cells = (NOTE_RIGHT_PANEL / X_UNITS_PER_CELL) as u16;
            let edge = (area.x + area.width).saturating_sub(cells);
            if column < edge {
                None
            } else if column < edge + cells / 2 {
                Some(PanelAction::Move)
            } else {
                Some(PanelAction::Delete)
            }
        }
        (Side::Right, _) => {
            let cells = (ROW_RIGHT_PANEL / X_UNITS_PER_CELL) as u16;
            let edge = (area.x + area.width).saturating_sub(cells);
            (column >= edge).then_some(PanelAction::Delete)
        }
        _ => None,
    }
}

fn run_panel_action(app: &mut App, item: &RowItem, action: PanelAction) {
    match (action, item) {
        (PanelAction::Pin, RowItem::Note { id, .. }) => actions::toggle_note_pin(app, id),
        (PanelAction::Move, RowItem::Note { id, .. }) => actions::cycle_note_folder(app, id),
        (PanelAction::Delete, RowItem::Note { id, .. }) => actions::delete_note(app, id),
        (PanelAction::Delete, RowItem::Task { id, .. }) => actions::delete_task(app, id),
        (PanelAction::Delete, RowItem::PlanEntry { task_id, .. }) => {
            actions::remove_from_plan(app, task_id)
        }
        (PanelAction::Delete, RowItem::Folder { id, .. }) => actions::delete_folder(app, id),
        _ => {}
    }
}

/// Tap on a closed row: the Enter-equivalent for that row kind.
fn activate(app: &mut App, item: &RowItem) {
    match item {
        RowItem::PlanEntry { task_id, .. } => actions::toggle_entry_done(app, task_id),
        RowItem::Task { id, .. } => actions::toggle_task_planned(app, id),
        RowItem::Folder { id, .. } => actions::open_folder(app, id),
        RowItem::Note { id, .. } => app.open_editor(id),
        _ => {}
    }
}

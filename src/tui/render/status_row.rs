use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::app::{App, EntryKind, Screen};

pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(entry) = &app.entry {
        let label = match &entry.kind {
            EntryKind::AddTask => "new task",
            EntryKind::AddCategory => "new category",
            EntryKind::AddFolder => "new folder",
            EntryKind::RenameTask { .. } => "rename task",
            EntryKind::RenameCategory { .. } => "rename category",
            EntryKind::RenameFolder { .. } => "rename folder",
            EntryKind::EntryNote { .. } => "entry note",
        };
        Line::from(vec![
            Span::styled(
                format!(" {label}: "),
                Style::default().fg(app.theme.highlight),
            ),
            Span::styled(
                format!("{}█", entry.buffer),
                Style::default().fg(app.theme.text_bright),
            ),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(app.theme.yellow),
        ))
    } else {
        let hints = match app.screen {
            Screen::Today => " space done · n note · d remove · 1-4 screens · ? help",
            Screen::Tasks => " space plan · a add · r rename · m move · d delete · ? help",
            Screen::Notes => " enter open · a new · f folder · p pin · m move · d delete",
            Screen::Editor => " esc done · tab title/body",
            Screen::History => " d delete · 1-4 screens",
        };
        Line::from(Span::styled(hints, Style::default().fg(app.theme.dim)))
    };
    frame.render_widget(Paragraph::new(line), area);
}

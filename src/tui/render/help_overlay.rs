use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::super::app::App;

const HELP: &[(&str, &str)] = &[
    ("1-4 / tab", "switch screen"),
    ("j k / arrows", "move cursor"),
    ("enter", "open / toggle"),
    ("space", "plan task / mark done"),
    ("a", "add task or note"),
    ("A", "add category (tasks)"),
    ("f", "add folder (notes)"),
    ("p", "pin note"),
    ("m", "move note / task to next spot"),
    ("g", "cycle task group (tasks)"),
    ("r", "rename under cursor"),
    ("n", "note on plan entry (today)"),
    ("d", "delete under cursor"),
    ("esc", "back"),
    ("drag row", "swipe for actions"),
    ("drag from left edge", "go back"),
    ("q", "quit"),
];

pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let width = 44.min(area.width);
    let height = (HELP.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<20}"),
                    Style::default().fg(app.theme.highlight),
                ),
                Span::styled((*what).to_string(), Style::default().fg(app.theme.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" keys ")
        .style(Style::default().bg(app.theme.background).fg(app.theme.text));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

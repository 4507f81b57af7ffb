use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::app::{App, Screen};

const TABS: [(Screen, &str); 4] = [
    (Screen::Today, "1 Today"),
    (Screen::Tasks, "2 Tasks"),
    (Screen::Notes, "3 Notes"),
    (Screen::History, "4 History"),
];

pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    // The editor highlights the tab it was opened from
    let current = if app.screen == Screen::Editor {
        app.editor_from
    } else {
        app.screen
    };
    for (screen, label) in TABS {
        let style = if screen == current {
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("   "));
    }

    let bar = Paragraph::new(Line::from(spans));
    frame.render_widget(bar, Rect { height: 1, ..area });

    if area.height > 1 {
        let sep = "─".repeat(area.width as usize);
        let sep_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(sep, Style::default().fg(app.theme.dim))),
            sep_area,
        );
    }
}

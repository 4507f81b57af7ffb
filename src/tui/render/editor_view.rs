use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::editor::measure::wrap_spans;
use crate::util::unicode::display_width;

use super::super::app::App;

pub fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(session) = app.editor.as_mut() else {
        return;
    };
    let theme = &app.theme;

    // Title | separator | body
    let title_area = Rect { height: 1, ..area };
    let body_area = Rect {
        y: area.y + 2,
        height: area.height.saturating_sub(2),
        ..area
    };

    let title = session.autosave.title();
    let title_style = if session.editing_title {
        Style::default()
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD)
    } else if title.is_empty() {
        Style::default().fg(theme.dim)
    } else {
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    };
    let shown_title = if title.is_empty() && !session.editing_title {
        "(untitled)"
    } else {
        title
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {shown_title}"),
            title_style,
        ))),
        title_area,
    );
    if area.height > 1 {
        let sep_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                "─".repeat(area.width as usize),
                Style::default().fg(theme.dim),
            )),
            sep_area,
        );
    }

    // The body viewport's geometry feeds the caret follower; capture it
    // before handling any more input.
    let width = area.width.saturating_sub(1).max(1) as usize;
    session.view_width = width;
    session.view_height = body_area.height.max(1) as usize;
    session.measure.sync(session.autosave.body(), width);

    let body = session.autosave.body();
    let scroll_top = session
        .scroll_top
        .min(session.measure.total_rows().saturating_sub(1));
    let mut visual_row = 0usize;
    let mut screen_row = 0u16;
    let mut caret_pos: Option<(u16, u16)> = None;

    let mut line_start = 0usize;
    'outer: for line in body.split('\n') {
        for span in wrap_spans(line, width) {
            if visual_row >= scroll_top {
                if screen_row >= body_area.height {
                    break 'outer;
                }
                let row_area = Rect {
                    y: body_area.y + screen_row,
                    height: 1,
                    ..body_area
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        line[span.clone()].to_string(),
                        Style::default().fg(theme.text),
                    )),
                    row_area,
                );

                let caret = session.caret;
                let span_abs = (line_start + span.start)..(line_start + span.end);
                let line_end = line_start + line.len();
                let caret_here = span_abs.contains(&caret)
                    || (caret == span_abs.end && span_abs.end == line_end);
                if caret_here && !session.editing_title {
                    let col = display_width(&body[span_abs.start..caret]);
                    caret_pos = Some((body_area.x + col as u16, body_area.y + screen_row));
                }
                screen_row += 1;
            }
            visual_row += 1;
        }
        line_start += line.len() + 1;
    }

    if let Some((x, y)) = caret_pos {
        frame.set_cursor_position(Position { x, y });
    }
}

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;

use crate::gesture::Side;
use crate::util::unicode::grapheme_width;

use super::super::app::{App, RowItem, Screen, X_UNITS_PER_CELL};

pub fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;

    if app.items.is_empty() {
        let msg = match app.screen {
            Screen::Today => "nothing planned today · pick tasks on the Tasks screen",
            Screen::Tasks => "no tasks yet · press a to add one",
            Screen::Notes => "no notes yet · press a to write one",
            Screen::History => "no past plans yet",
            Screen::Editor => "",
        };
        let para = Paragraph::new(Line::from(Span::styled(
            format!("  {msg}"),
            Style::default().fg(app.theme.dim),
        )));
        frame.render_widget(para, area);
        return;
    }

    let now = Instant::now();
    let height = area.height as usize;
    let scroll = app.scroll().min(app.items.len().saturating_sub(1));
    let cursor = app.cursor();

    for (offset, index) in (scroll..app.items.len()).take(height).enumerate() {
        let row_area = Rect {
            y: area.y + offset as u16,
            height: 1,
            ..area
        };
        let item = &app.items[index];
        let line = render_row(app, item, index == cursor, now, area.width as usize);
        frame.render_widget(Paragraph::new(line), row_area);
    }
}

fn render_row<'a>(
    app: &App,
    item: &RowItem,
    selected: bool,
    now: Instant,
    width: usize,
) -> Line<'a> {
    let base = if selected {
        Style::default().fg(app.theme.text_bright).bg(app.theme.selection_bg)
    } else {
        Style::default().fg(app.theme.text)
    };

    let content = row_text(app, item, base, selected);

    let Some(key) = item.gesture_key() else {
        return content;
    };
    let Some(controller) = app.gestures.get(&key) else {
        return content;
    };

    let offset_cells = (controller.offset_at(now) / X_UNITS_PER_CELL).round() as i64;
    if offset_cells == 0 {
        return content;
    }

    // The content layer shifts by the sampled offset; whichever action
    // panel it uncovers renders in the gap.
    let flat = flatten(&content);
    if offset_cells > 0 && controller.panel_visible(Side::Left) {
        let gap = (offset_cells as usize).min(width);
        let label = fit(" pin", gap);
        let panel = Span::styled(
            label,
            Style::default().fg(app.theme.text_bright).bg(app.theme.panel_left_bg),
        );
        let body = Span::styled(fit(&flat, width.saturating_sub(gap)), base);
        Line::from(vec![panel, body])
    } else if offset_cells < 0 && controller.panel_visible(Side::Right) {
        let gap = ((-offset_cells) as usize).min(width);
        let shown = width.saturating_sub(gap);
        // Content slides off the left edge of the clipping box
        let body = Span::styled(fit(&skip_cells(&flat, gap), shown), base);
        let panel = right_panel_spans(app, item, gap);
        let mut spans = vec![body];
        spans.extend(panel);
        Line::from(spans)
    } else {
        content
    }
}

fn right_panel_spans<'a>(app: &App, item: &RowItem, gap: usize) -> Vec<Span<'a>> {
    match item {
        RowItem::Note { .. } => {
            // Two buttons share the panel: move | delete
            let half = gap / 2;
            vec![
                Span::styled(
                    fit(" move", half),
                    Style::default().fg(app.theme.text_bright).bg(app.theme.panel_left_bg),
                ),
                Span::styled(
                    fit(" delete", gap - half),
                    Style::default().fg(app.theme.text_bright).bg(app.theme.panel_right_bg),
                ),
            ]
        }
        _ => vec![Span::styled(
            fit(" delete", gap),
            Style::default().fg(app.theme.text_bright).bg(app.theme.panel_right_bg),
        )],
    }
}

fn row_text<'a>(app: &App, item: &RowItem, base: Style, selected: bool) -> Line<'a> {
    let marker_style = if selected {
        base
    } else {
        Style::default().fg(app.theme.dim)
    };
    match item {
        RowItem::CategoryHeader { name, .. } => Line::from(Span::styled(
            format!(" {name}"),
            Style::default()
                .fg(app.theme.purple)
                .add_modifier(Modifier::BOLD),
        )),
        RowItem::Task {
            title,
            planned,
            group,
            ..
        } => {
            let mark = if *planned { "●" } else { "·" };
            let mark_style = if *planned {
                Style::default().fg(app.theme.highlight)
            } else {
                marker_style
            };
            let mut spans = vec![
                Span::styled(format!("  {mark} "), mark_style),
                Span::styled(title.clone(), base),
            ];
            if let Some(g) = group {
                spans.push(Span::styled(
                    format!("  {g}"),
                    Style::default().fg(app.theme.dim),
                ));
            }
            Line::from(spans)
        }
        RowItem::PlanEntry {
            title,
            done,
            category,
            ..
        } => {
            let check = if *done { "[x]" } else { "[ ]" };
            let title_style = if *done {
                base.fg(app.theme.done).add_modifier(Modifier::CROSSED_OUT)
            } else {
                base
            };
            let mut spans = vec![
                Span::styled(
                    format!("  {check} "),
                    if *done {
                        Style::default().fg(app.theme.green)
                    } else {
                        marker_style
                    },
                ),
                Span::styled(title.clone(), title_style),
            ];
            if let Some(cat) = category {
                spans.push(Span::styled(
                    format!("  {cat}"),
                    Style::default().fg(app.theme.dim),
                ));
            }
            Line::from(spans)
        }
        RowItem::Folder { name, .. } => Line::from(vec![
            Span::styled("  ▸ ".to_string(), marker_style),
            Span::styled(name.clone(), base.fg(app.theme.cyan)),
        ]),
        RowItem::Note {
            title,
            preview,
            pinned,
            ..
        } => {
            let pin = if *pinned { "*" } else { " " };
            let mut spans = vec![
                Span::styled(
                    format!(" {pin} "),
                    Style::default().fg(app.theme.highlight),
                ),
                Span::styled(title.clone(), base),
            ];
            if !preview.is_empty() {
                let first = preview.lines().next().unwrap_or("").to_string();
                spans.push(Span::styled(
                    format!("  {first}"),
                    Style::default().fg(app.theme.dim),
                ));
            }
            Line::from(spans)
        }
        RowItem::Plan { date, done, total } => Line::from(vec![
            Span::styled(format!("  {date}  "), base),
            Span::styled(
                format!("{done}/{total} done"),
                Style::default().fg(if done == total && *total > 0 {
                    app.theme.green
                } else {
                    app.theme.dim
                }),
            ),
        ]),
    }
}

/// Collapse a styled line back to its text, for the shifted rendering.
fn flatten(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Truncate to `width` display cells and pad with spaces.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > width {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Drop the first `cells` display cells of a string.
fn skip_cells(s: &str, cells: usize) -> String {
    let mut skipped = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        if skipped < cells {
            skipped += grapheme_width(g);
            continue;
        }
        out.push_str(g);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fit_truncates_and_pads() {
        assert_eq!(fit("hello", 3), "hel");
        assert_eq!(fit("hi", 4), "hi  ");
        // A double-width glyph that would straddle the edge is dropped
        assert_eq!(fit("a你b", 2), "a ");
    }

    #[test]
    fn skip_cells_drops_leading_cells() {
        assert_eq!(skip_cells("hello", 2), "llo");
        assert_eq!(skip_cells("你好x", 2), "好x");
    }
}

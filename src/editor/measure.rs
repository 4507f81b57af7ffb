use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode::grapheme_width;

/// Cached body-text layout for caret measurement.
///
/// The terminal analog of an offscreen mirror element: it remembers the
/// wrapped shape of each logical line so a keystroke only re-lays-out the
/// lines it touched. A width change (the "font metrics changed" case)
/// throws the whole cache away.
#[derive(Debug, Default)]
pub struct TextMeasure {
    width: usize,
    lines: Vec<CachedLine>,
    rebuilds: u64,
}

#[derive(Debug)]
struct CachedLine {
    text: String,
    rows: usize,
}

impl TextMeasure {
    pub fn new() -> Self {
        TextMeasure::default()
    }

    /// Bring the cache up to date with `text` wrapped at `width` cells.
    pub fn sync(&mut self, text: &str, width: usize) {
        if width != self.width {
            self.width = width;
            self.lines.clear();
        }

        // split('\n') rather than lines(): a trailing newline leaves an
        // empty final line the caret can sit on.
        let mut kept = 0;
        for (i, line) in text.split('\n').enumerate() {
            match self.lines.get(i) {
                Some(cached) if cached.text == line => {}
                _ => {
                    let rows = wrap_spans(line, width).len();
                    let entry = CachedLine {
                        text: line.to_string(),
                        rows,
                    };
                    if i < self.lines.len() {
                        self.lines[i] = entry;
                    } else {
                        self.lines.push(entry);
                    }
                    self.rebuilds += 1;
                }
            }
            kept = i + 1;
        }
        self.lines.truncate(kept);
    }

    /// Total wrapped rows of the synced text.
    pub fn total_rows(&self) -> usize {
        self.lines.iter().map(|l| l.rows).sum()
    }

    /// Number of logical lines re-laid-out so far (cache effectiveness).
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Row index (0-based) of the caret at `caret` bytes into the synced
    /// text. A caret at or past the end short-circuits to the last row.
    pub fn caret_row(&self, caret: usize) -> usize {
        let total = self.total_rows();
        if total == 0 {
            return 0;
        }

        let mut line_start = 0;
        let mut rows_before = 0;
        for cached in &self.lines {
            let line_end = line_start + cached.text.len();
            if caret <= line_end {
                let within = caret - line_start;
                let spans = wrap_spans(&cached.text, self.width);
                let row = spans
                    .iter()
                    .position(|s| within < s.end || (within == s.end && s.end == cached.text.len()))
                    .unwrap_or(spans.len().saturating_sub(1));
                return rows_before + row;
            }
            rows_before += cached.rows;
            line_start = line_end + 1; // skip the newline
        }
        total - 1
    }
}

/// Wrap one logical line at `width` display cells, returning the byte
/// range of each visual row. Breaks after whitespace and hyphens;
/// grapheme-wraps words wider than the line. Never splits a grapheme.
pub fn wrap_spans(line: &str, width: usize) -> Vec<Range<usize>> {
    if width == 0 || line.is_empty() {
        return vec![0..line.len()];
    }

    struct G {
        byte: usize,
        w: usize,
        breaks_after: bool,
    }
    let gs: Vec<G> = line
        .grapheme_indices(true)
        .map(|(i, g)| G {
            byte: i,
            w: grapheme_width(g),
            breaks_after: g.chars().all(char::is_whitespace) || g == "-",
        })
        .collect();

    let byte_at = |idx: usize| -> usize {
        if idx < gs.len() { gs[idx].byte } else { line.len() }
    };

    let mut spans = Vec::new();
    let mut row_start = 0; // grapheme index
    let mut col = 0;
    let mut last_break: Option<usize> = None;

    for i in 0..gs.len() {
        let gw = gs[i].w;
        if col + gw > width && col > 0 {
            let break_at = match last_break {
                Some(b) if b > row_start => b,
                _ => i,
            };
            spans.push(byte_at(row_start)..byte_at(break_at));
            row_start = break_at;
            col = gs[row_start..i].iter().map(|g| g.w).sum();
            last_break = None;
            // A word longer than the line still overflows after the
            // word break; fall back to a grapheme break.
            if col + gw > width && col > 0 {
                spans.push(byte_at(row_start)..byte_at(i));
                row_start = i;
                col = 0;
            }
        }
        col += gw;
        if gs[i].breaks_after {
            last_break = Some(i + 1);
        }
    }
    spans.push(byte_at(row_start)..line.len());
    spans
}

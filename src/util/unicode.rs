use unicode_segmentation::UnicodeSegmentation;

/// Display width of a string in terminal cells. Tabs count as 4.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Display width of a single grapheme cluster.
pub fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        4
    } else {
        unicode_width::UnicodeWidthStr::width(g)
    }
}

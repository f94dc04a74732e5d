use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_cells` terminal cells, ending in `…` when cut.
///
/// Cuts on grapheme boundaries so combining marks and emoji stay whole.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // room for '…'
    let mut width = 0;
    let mut out = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(grapheme);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad with spaces to exactly `cells` terminal cells.
///
/// A wide grapheme that would straddle the edge is dropped and replaced by
/// padding, so the result is always exactly `cells` wide.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

/// Center `s` within `cells` terminal cells.
pub fn center(s: &str, cells: usize) -> String {
    let s = truncate_to_width(s, cells);
    let w = display_width(&s);
    let left = (cells - w) / 2;
    let right = cells - w - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

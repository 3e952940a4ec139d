//! Width-aware text helpers shared by the panes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates the first line of `s` to `max_width` columns, appending `…` if shortened.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let first_line = s.lines().next().unwrap_or(s);
    if first_line.width() <= max_width {
        return first_line.to_string();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in first_line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Keeps the end of `s` that fits in `max_width` columns, for single-line inputs.
pub fn tail_str(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (idx, ch) in s.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}

/// Greedy word wrap to `width` columns. Words wider than a line are split.
///
/// Explicit newlines are kept; an empty input yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        for word in raw.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        }
        lines.push(current);
    }
    lines
}

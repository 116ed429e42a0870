//! Char-indexed string helpers shared by the formatters.
//!
//! Offsets are always counted in `char`s, never bytes.

use std::ops::Range;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

pub fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    let start = range.start.min(end);
    start..end
}

/// Inserts `text` at char offset `cursor`, returning the offset just past it.
pub fn insert_str(value: &mut String, cursor: usize, text: &str) -> usize {
    let pos = clamp_cursor(cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert_str(byte_pos, text);
    pos + char_count(text)
}

/// Removes the chars in `range`. Returns `false` when nothing was removed.
pub fn remove_range(value: &mut String, range: Range<usize>) -> bool {
    let range = clamp_range(range, char_count(value));
    if range.is_empty() {
        return false;
    }
    let start = byte_index_at_char(value, range.start);
    let end = byte_index_at_char(value, range.end);
    value.replace_range(start..end, "");
    true
}

pub fn split_at_char(value: &str, char_idx: usize) -> (&str, &str) {
    value.split_at(byte_index_at_char(value, char_idx))
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

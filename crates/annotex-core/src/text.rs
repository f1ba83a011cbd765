//! Character-offset helpers.
//!
//! Annotation offsets count Unicode scalar values, while Rust string
//! indices count bytes. Everything that crosses that boundary goes
//! through here.

/// Length of `text` in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a byte index (on a char boundary) into a character offset.
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Byte index of the character at `char_idx`, or `text.len()` past the end.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Slice `text` by character offsets `[start, end)`.
///
/// Offsets past the end are clamped and an inverted range yields an
/// empty string, the same way sequence slicing behaves in most
/// scripting runtimes that produce prediction payloads.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let from = char_to_byte(text, start);
    let to = char_to_byte(text, end);
    &text[from..to]
}

/// Remove every double-quote character.
pub fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

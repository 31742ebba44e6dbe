#![forbid(unsafe_code)]

//! Editable text: a buffer plus its selection.
//!
//! [`EditableText`] is the unit the editor reads from and writes back to the
//! host surface. Every accepted edit replaces the whole value, so the type is
//! immutable from the outside: rules build a new one instead of patching.
//!
//! Offsets are UTF-8 byte offsets into [`EditableText::value`]. Hosts that
//! speak another unit (the DOM uses UTF-16 code units) convert at their edge.
//!
//! # Invariants
//!
//! 1. `selection_start <= selection_end <= value.len()`
//! 2. Both offsets lie on a `char` boundary

use std::fmt;

/// A text value with a selection range.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EditableText {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl fmt::Debug for EditableText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditableText")
            .field("value", &self.value)
            .field("selection", &(self.selection_start..self.selection_end))
            .finish()
    }
}

impl EditableText {
    /// Create a text with the caret at the start of the buffer.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            selection_start: 0,
            selection_end: 0,
        }
    }

    /// Create a text with the caret at the end of the buffer.
    #[must_use]
    pub fn with_caret_at_end(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = value.len();
        Self {
            value,
            selection_start: end,
            selection_end: end,
        }
    }

    /// Set a collapsed selection (builder).
    #[must_use]
    pub fn with_caret(self, offset: usize) -> Self {
        self.with_selection(offset, offset)
    }

    /// Set the selection range (builder).
    ///
    /// Offsets are clamped to the buffer, snapped down to a `char` boundary,
    /// and ordered.
    #[must_use]
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        let a = floor_char_boundary(&self.value, start);
        let b = floor_char_boundary(&self.value, end);
        self.selection_start = a.min(b);
        self.selection_end = a.max(b);
        self
    }

    /// The full buffer.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consume the text, returning the buffer.
    #[must_use]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Selection start (the caret when collapsed).
    #[must_use]
    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    /// Selection end.
    #[must_use]
    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Selection as `(start, end)`.
    #[must_use]
    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// The caret position (selection start).
    #[must_use]
    pub fn caret(&self) -> usize {
        self.selection_start
    }

    /// Whether the selection is empty.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.selection_start == self.selection_end
    }

    /// Selected text, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        if self.is_collapsed() {
            None
        } else {
            Some(&self.value[self.selection_start..self.selection_end])
        }
    }

    /// Offset just after the last newline before the caret (0 if none).
    #[must_use]
    pub fn line_start(&self) -> usize {
        self.value[..self.selection_start]
            .rfind('\n')
            .map_or(0, |nl| nl + 1)
    }

    /// The current line from its start up to the caret.
    ///
    /// Text after the caret is deliberately excluded: indentation and list
    /// rules look only at what precedes the insertion point.
    #[must_use]
    pub fn current_line(&self) -> &str {
        &self.value[self.line_start()..self.selection_start]
    }

    /// Replace the selection with `insert` and put the caret `caret_in_insert`
    /// bytes into the inserted text.
    #[must_use]
    pub fn replace_selection(&self, insert: &str, caret_in_insert: usize) -> Self {
        let mut value = String::with_capacity(self.value.len() + insert.len());
        value.push_str(&self.value[..self.selection_start]);
        value.push_str(insert);
        value.push_str(&self.value[self.selection_end..]);
        let caret = self.selection_start + caret_in_insert.min(insert.len());
        Self::new(value).with_caret(caret)
    }

    /// Insert `insert` at the selection start, keeping any selected text
    /// after it. The caret lands right after the inserted text.
    #[must_use]
    pub fn insert_at_selection_start(&self, insert: &str) -> Self {
        let mut value = String::with_capacity(self.value.len() + insert.len());
        value.push_str(&self.value[..self.selection_start]);
        value.push_str(insert);
        value.push_str(&self.value[self.selection_start..]);
        Self::new(value).with_caret(self.selection_start + insert.len())
    }

    /// Select the entire buffer.
    #[must_use]
    pub fn select_all(&self) -> Self {
        self.clone().with_selection(0, self.value.len())
    }
}

/// Largest `char` boundary in `s` that is `<= offset`.
#[must_use]
pub fn floor_char_boundary(s: &str, offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    let mut idx = offset;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_places_caret_at_start() {
        let text = EditableText::new("hello");
        assert_eq!(text.selection(), (0, 0));
        assert!(text.is_collapsed());
    }

    #[test]
    fn caret_at_end() {
        let text = EditableText::with_caret_at_end("hello");
        assert_eq!(text.caret(), 5);
    }

    #[test]
    fn selection_is_clamped_and_ordered() {
        let text = EditableText::new("abc").with_selection(10, 1);
        assert_eq!(text.selection(), (1, 3));
    }

    #[test]
    fn selection_snaps_to_char_boundary() {
        // 'é' is two bytes; offset 2 lands inside it.
        let text = EditableText::new("aé").with_caret(2);
        assert_eq!(text.caret(), 1);
    }

    #[test]
    fn current_line_stops_at_caret() {
        let text = EditableText::new("first\n  - item tail").with_caret(14);
        assert_eq!(text.line_start(), 6);
        assert_eq!(text.current_line(), "  - item");
    }

    #[test]
    fn current_line_on_first_line() {
        let text = EditableText::new("abc").with_caret(2);
        assert_eq!(text.line_start(), 0);
        assert_eq!(text.current_line(), "ab");
    }

    #[test]
    fn current_line_right_after_newline_is_empty() {
        let text = EditableText::new("abc\n").with_caret(4);
        assert_eq!(text.line_start(), 4);
        assert_eq!(text.current_line(), "");
    }

    #[test]
    fn replace_selection_splices() {
        let text = EditableText::new("hello world").with_selection(6, 11);
        let out = text.replace_selection("there", 5);
        assert_eq!(out.value(), "hello there");
        assert_eq!(out.selection(), (11, 11));
    }

    #[test]
    fn insert_at_selection_start_keeps_selected_text() {
        let text = EditableText::new("hello world").with_selection(5, 11);
        let out = text.insert_at_selection_start(",");
        assert_eq!(out.value(), "hello, world");
        assert_eq!(out.selection(), (6, 6));
    }

    #[test]
    fn select_all_covers_buffer() {
        let text = EditableText::new("hello").with_caret(5).select_all();
        assert_eq!(text.selection(), (0, 5));
        assert_eq!(text.selected_text(), Some("hello"));
    }

    #[test]
    fn floor_char_boundary_handles_edges() {
        assert_eq!(floor_char_boundary("", 3), 0);
        assert_eq!(floor_char_boundary("a😀", 3), 1);
        assert_eq!(floor_char_boundary("a😀", 5), 5);
    }
}

#![forbid(unsafe_code)]

//! Indentation and Markdown list-continuation rules.
//!
//! Each rule is a pure function from the current [`EditableText`] to the
//! text that should replace it. Rules that do not apply return `None` so the
//! caller can fall back to the next rule or to native behavior.
//!
//! # Rules
//!
//! | Rule | Trigger | Result |
//! |------|---------|--------|
//! | [`indent`] | Tab | selection replaced by one indent unit |
//! | [`outdent`] | Shift+Tab | one unit removed from the line start |
//! | [`continue_list`] | Enter on `- `, `* `, `+ `, `N. ` | newline + indent + marker + space |
//! | [`newline_with_indent`] | Enter on an indented line | newline + indent |
//!
//! "Current line" always means the text between the previous newline and the
//! caret; anything after the caret is ignored.

use crate::text::EditableText;

/// Default indent width in spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// A recognised list-item prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker<'a> {
    /// Leading whitespace before the marker.
    pub indent: &'a str,
    /// The marker token itself: `-`, `*`, `+`, or `N.`.
    pub marker: &'a str,
}

/// Build an indent unit of `width` spaces.
#[must_use]
pub fn indent_unit(width: usize) -> String {
    " ".repeat(width)
}

/// Leading whitespace of `line`.
#[must_use]
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

/// Parse a list-item prefix at the start of `line`.
///
/// Matches optional leading whitespace, then `-`, `*`, `+`, or one or more
/// ASCII digits followed by `.`, then at least one whitespace character.
#[must_use]
pub fn parse_list_marker(line: &str) -> Option<ListMarker<'_>> {
    let indent = leading_whitespace(line);
    let rest = &line[indent.len()..];

    let marker_len = match rest.as_bytes().first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if rest.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };

    let after = rest[marker_len..].chars().next()?;
    if !after.is_whitespace() {
        return None;
    }

    Some(ListMarker {
        indent,
        marker: &rest[..marker_len],
    })
}

/// Replace the selection with one indent unit; caret lands after it.
#[must_use]
pub fn indent(text: &EditableText, unit: &str) -> EditableText {
    text.replace_selection(unit, unit.len())
}

/// Remove one indent unit from the start of the current line.
///
/// Returns `None` when the current line (up to the caret) does not start
/// with `unit`. Both selection ends move left by the unit width, never past
/// the line start.
#[must_use]
pub fn outdent(text: &EditableText, unit: &str) -> Option<EditableText> {
    if unit.is_empty() || !text.current_line().starts_with(unit) {
        return None;
    }

    let line_start = text.line_start();
    let value = text.value();
    let mut out = String::with_capacity(value.len() - unit.len());
    out.push_str(&value[..line_start]);
    out.push_str(&value[line_start + unit.len()..]);

    let shift = |offset: usize| offset.saturating_sub(unit.len()).max(line_start);
    let (start, end) = text.selection();
    Some(EditableText::new(out).with_selection(shift(start), shift(end)))
}

/// Continue a Markdown list on Enter.
///
/// Inserts a newline, the current indentation, and the same marker followed
/// by a single space at the selection start. Selected text is kept after the
/// insert. Numbered markers are repeated as-is.
#[must_use]
pub fn continue_list(text: &EditableText) -> Option<EditableText> {
    let marker = parse_list_marker(text.current_line())?;
    let mut insert = String::with_capacity(2 + marker.indent.len() + marker.marker.len());
    insert.push('\n');
    insert.push_str(marker.indent);
    insert.push_str(marker.marker);
    insert.push(' ');
    Some(text.insert_at_selection_start(&insert))
}

/// Carry the current line's leading whitespace onto a new line.
///
/// Inserts at the selection start like [`continue_list`]. Returns `None`
/// when the line has no leading whitespace.
#[must_use]
pub fn newline_with_indent(text: &EditableText) -> Option<EditableText> {
    let indent = leading_whitespace(text.current_line());
    if indent.is_empty() {
        return None;
    }
    let mut insert = String::with_capacity(1 + indent.len());
    insert.push('\n');
    insert.push_str(indent);
    Some(text.insert_at_selection_start(&insert))
}

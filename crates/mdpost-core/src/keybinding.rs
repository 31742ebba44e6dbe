#![forbid(unsafe_code)]

//! Keystroke classification.
//!
//! [`classify`] turns a [`KeyEvent`] plus the current [`EditableText`] into an
//! [`EditCommand`]. Classification is total: any event, including ones the
//! host could not name, resolves to a command, with [`EditCommand::PassThrough`]
//! as the fallback.
//!
//! # Priority Order
//!
//! First match wins:
//!
//! | Priority | Key | Condition | Command |
//! |----------|-----|-----------|---------|
//! | 1 | Primary+A | | SelectAll |
//! | 2 | Primary+Z | no Shift | Undo |
//! | 3 | Primary+Y, Primary+Shift+Z | | Redo |
//! | 4 | Tab | no Shift | IndentLine |
//! | 5 | Shift+Tab / BackTab | | OutdentLine |
//! | 6 | Enter | line is a list item | NewlineContinueList |
//! | 7 | Enter | line has leading whitespace | NewlineWithIndent |
//! | 8 | Enter | otherwise | NewlinePlain |
//! | 9 | anything else | | PassThrough |
//!
//! Copy, paste, and cut (Primary+C/V/X) fall into row 9 and keep their
//! native behavior.

use crate::event::{KeyCode, KeyEvent};
use crate::rules::{leading_whitespace, parse_list_marker};
use crate::text::EditableText;

/// The command a keystroke resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    /// Select the entire buffer.
    SelectAll,

    /// Step back in the history log.
    Undo,

    /// Step forward in the history log.
    Redo,

    /// Insert one indent unit at the caret.
    IndentLine,

    /// Remove one indent unit from the current line.
    OutdentLine,

    /// Plain newline; native behavior.
    NewlinePlain,

    /// Newline carrying the current indentation.
    NewlineWithIndent,

    /// Newline continuing the current Markdown list.
    NewlineContinueList,

    /// Not an editor command; native behavior.
    PassThrough,
}

impl EditCommand {
    /// Whether the host must suppress its default handling for this command.
    ///
    /// Undo, Redo, and OutdentLine consume the event even when they turn out
    /// to be no-ops, so the keystroke never leaks into the text surface.
    #[must_use]
    pub const fn consumes_event(&self) -> bool {
        !matches!(self, EditCommand::NewlinePlain | EditCommand::PassThrough)
    }

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EditCommand::SelectAll => "select_all",
            EditCommand::Undo => "undo",
            EditCommand::Redo => "redo",
            EditCommand::IndentLine => "indent_line",
            EditCommand::OutdentLine => "outdent_line",
            EditCommand::NewlinePlain => "newline_plain",
            EditCommand::NewlineWithIndent => "newline_with_indent",
            EditCommand::NewlineContinueList => "newline_continue_list",
            EditCommand::PassThrough => "pass_through",
        }
    }
}

/// Classify a key event against the current text.
///
/// Release events always pass through; repeats classify like presses.
#[must_use]
pub fn classify(event: &KeyEvent, text: &EditableText) -> EditCommand {
    if !event.is_press_like() {
        return EditCommand::PassThrough;
    }

    if event.primary()
        && let Some(command) = classify_shortcut(event)
    {
        return command;
    }

    match event.code {
        KeyCode::Tab if !event.shift() => EditCommand::IndentLine,
        KeyCode::Tab | KeyCode::BackTab => EditCommand::OutdentLine,
        KeyCode::Enter => classify_enter(text),
        _ => EditCommand::PassThrough,
    }
}

fn classify_shortcut(event: &KeyEvent) -> Option<EditCommand> {
    if event.is_letter('a') {
        Some(EditCommand::SelectAll)
    } else if event.is_letter('z') {
        Some(if event.shift() {
            EditCommand::Redo
        } else {
            EditCommand::Undo
        })
    } else if event.is_letter('y') {
        Some(EditCommand::Redo)
    } else {
        None
    }
}

fn classify_enter(text: &EditableText) -> EditCommand {
    let line = text.current_line();
    if parse_list_marker(line).is_some() {
        EditCommand::NewlineContinueList
    } else if !leading_whitespace(line).is_empty() {
        EditCommand::NewlineWithIndent
    } else {
        EditCommand::NewlinePlain
    }
}

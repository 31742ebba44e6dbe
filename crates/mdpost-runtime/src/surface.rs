#![forbid(unsafe_code)]

//! Text surface abstraction.
//!
//! A [`TextSurface`] is whatever holds the buffer on screen: a DOM
//! `<textarea>` mirrored by the web crate, or a [`MemorySurface`] in
//! headless hosts and tests. The controller reads the whole
//! [`EditableText`] and writes it back in one call, so value and selection
//! always change together.

use mdpost_core::text::EditableText;

/// A mountable text-input surface.
pub trait TextSurface {
    /// Current value and selection.
    fn text(&self) -> EditableText;

    /// Replace value and selection as one unit.
    fn apply(&mut self, text: EditableText);

    /// Current value without cloning the selection.
    fn value(&self) -> String {
        self.text().into_value()
    }
}

/// In-memory surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    text: EditableText,
}

impl MemorySurface {
    /// Create a surface holding `value`, caret at the start.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            text: EditableText::new(value),
        }
    }

    /// Borrow the held text.
    #[must_use]
    pub fn get(&self) -> &EditableText {
        &self.text
    }

    /// Simulate native typing: insert `s` over the selection, caret after it.
    ///
    /// The caller must tell the controller afterwards, the same way a
    /// browser fires `input` after it has mutated the textarea.
    pub fn type_str(&mut self, s: &str) {
        self.text = self.text.replace_selection(s, s.len());
    }

    /// Move the selection (as a click or arrow key would).
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.text = self.text.clone().with_selection(start, end);
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> EditableText {
        self.text.clone()
    }

    fn apply(&mut self, text: EditableText) {
        self.text = text;
    }

    fn value(&self) -> String {
        self.text.value().to_owned()
    }
}

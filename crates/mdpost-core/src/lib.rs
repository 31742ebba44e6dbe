#![forbid(unsafe_code)]

//! Core: key events, editable text, editing rules, and classification.
//!
//! # Role in mdpost
//! `mdpost-core` is the host-independent vocabulary of the editor. It owns the
//! canonical key event types, the [`EditableText`] value the surface holds, the
//! pure indentation and list-continuation rules, and the mapping from a
//! keystroke to an [`EditCommand`].
//!
//! # How it fits in the system
//! The runtime (`mdpost-runtime`) drives these pieces against a live surface
//! and a history log. Nothing in this crate keeps state or reads a clock, so
//! every rule can be tested as a plain function.

pub mod config;
pub mod event;
pub mod keybinding;
pub mod rules;
pub mod text;

pub use config::{ConfigError, EditorConfig};
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use keybinding::{EditCommand, classify};
pub use rules::{ListMarker, parse_list_marker};
pub use text::EditableText;

#![forbid(unsafe_code)]

//! Undo/redo history for the editing surface.
//!
//! History is snapshot-based: each entry is a full buffer value. Entries are
//! not written per keystroke; the controller feeds the log through a
//! [`CommitDebouncer`](crate::debounce::CommitDebouncer) so one entry covers a
//! burst of typing.
//!
//! # Module Structure
//!
//! - [`history_log`]: the bounded linear log and its configuration

pub mod history_log;

pub use history_log::{HistoryConfig, HistoryLog};

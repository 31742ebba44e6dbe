#![forbid(unsafe_code)]

//! Linear undo/redo log of text snapshots.
//!
//! [`HistoryLog`] keeps an ordered list of committed buffer values and a
//! cursor naming the entry the surface currently shows. Undo and redo only
//! move the cursor; [`record`](HistoryLog::record) truncates everything after
//! the cursor before appending, so a new edit after an undo abandons the
//! redo branch.
//!
//! # Layout
//!
//! ```text
//! record("a"), record("ab"), record("abc")
//!   entries: ["a", "ab", "abc"]   cursor: 2
//!
//! undo() x2
//!   entries: ["a", "ab", "abc"]   cursor: 0
//!
//! record("ax") - new branch, forward entries pruned
//!   entries: ["a", "ax"]          cursor: 1
//! ```
//!
//! # Invariants
//!
//! 1. `cursor()` is `None` iff the log is empty.
//! 2. When non-empty, `cursor() < len()`.
//! 3. `len() <= config.max_depth` after every operation.
//! 4. Two adjacent entries at the cursor never hold the same value.

use std::collections::VecDeque;
use std::fmt;

use mdpost_core::config::DEFAULT_HISTORY_MAX_DEPTH;

/// Configuration for the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries retained. Oldest entries are evicted first.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_HISTORY_MAX_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with the given depth limit.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Create an unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// Debounced-commit history of buffer values.
pub struct HistoryLog {
    entries: VecDeque<String>,
    cursor: Option<usize>,
    config: HistoryConfig,
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryLog")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryLog {
    /// Create an empty log.
    ///
    /// A `max_depth` of zero is treated as one.
    #[must_use]
    pub fn new(mut config: HistoryConfig) -> Self {
        config.max_depth = config.max_depth.max(1);
        Self {
            entries: VecDeque::new(),
            cursor: None,
            config,
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record a committed value.
    ///
    /// No-op (returns `false`) when `value` equals the entry at the cursor.
    /// Otherwise every entry after the cursor is discarded, `value` is
    /// appended, and the cursor moves to it.
    pub fn record(&mut self, value: &str) -> bool {
        if self.current() == Some(value) {
            return false;
        }

        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(value.to_owned());
        self.cursor = Some(self.entries.len() - 1);
        self.enforce_depth();
        true
    }

    /// Step back one entry, returning the value now at the cursor.
    ///
    /// Returns `None` at the oldest entry or when empty.
    pub fn undo(&mut self) -> Option<&str> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Step forward one entry, returning the value now at the cursor.
    ///
    /// Returns `None` at the newest entry or when empty.
    pub fn redo(&mut self) -> Option<&str> {
        let cursor = self.cursor? + 1;
        if cursor >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// The entry at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor?).map(String::as_str)
    }

    /// Cursor index, `None` when empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_depth() > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_depth() > 0
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.cursor
            .map_or(0, |c| self.entries.len().saturating_sub(c + 1))
    }

    /// Iterate entries from oldest to newest.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    fn enforce_depth(&mut self) {
        while self.entries.len() > self.config.max_depth {
            self.entries.pop_front();
            self.cursor = self.cursor.map(|c| c.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(values: &[&str]) -> HistoryLog {
        let mut log = HistoryLog::new(HistoryConfig::unlimited());
        for v in values {
            log.record(v);
        }
        log
    }

    #[test]
    fn new_log_is_empty() {
        let log = HistoryLog::default();
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
        assert_eq!(log.current(), None);
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn record_appends_and_moves_cursor() {
        let log = log_of(&["a", "ab"]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), Some(1));
        assert_eq!(log.current(), Some("ab"));
    }

    #[test]
    fn record_same_value_is_noop() {
        let mut log = log_of(&["a"]);
        assert!(!log.record("a"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn record_earlier_value_after_different_is_kept() {
        let mut log = log_of(&["a", "b"]);
        assert!(log.record("a"));
        assert_eq!(log.entries().collect::<Vec<_>>(), ["a", "b", "a"]);
    }

    #[test]
    fn undo_on_empty_and_at_oldest_is_none() {
        let mut empty = HistoryLog::default();
        assert_eq!(empty.undo(), None);
        assert_eq!(empty.redo(), None);

        let mut single = log_of(&["a"]);
        assert_eq!(single.undo(), None);
        assert_eq!(single.cursor(), Some(0));
    }

    #[test]
    fn undo_and_redo_walk_the_log() {
        let mut log = log_of(&["a", "ab", "abc"]);
        assert_eq!(log.undo(), Some("ab"));
        assert_eq!(log.undo(), Some("a"));
        assert_eq!(log.undo(), None);
        assert_eq!(log.redo(), Some("ab"));
        assert_eq!(log.redo(), Some("abc"));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn record_after_undo_prunes_redo_branch() {
        let mut log = log_of(&["a", "ab", "abc"]);
        log.undo();
        log.undo();
        assert!(log.record("ax"));
        assert_eq!(log.entries().collect::<Vec<_>>(), ["a", "ax"]);
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn record_equal_to_cursor_after_undo_keeps_redo() {
        let mut log = log_of(&["a", "ab"]);
        log.undo();
        assert!(!log.record("a"));
        assert!(log.can_redo());
    }

    #[test]
    fn depths_track_cursor() {
        let mut log = log_of(&["a", "b", "c", "d"]);
        log.undo();
        assert_eq!(log.undo_depth(), 2);
        assert_eq!(log.redo_depth(), 1);
    }

    #[test]
    fn max_depth_evicts_oldest_and_shifts_cursor() {
        let mut log = HistoryLog::new(HistoryConfig::new(3));
        for v in ["a", "b", "c", "d", "e"] {
            log.record(v);
        }
        assert_eq!(log.entries().collect::<Vec<_>>(), ["c", "d", "e"]);
        assert_eq!(log.cursor(), Some(2));
        assert_eq!(log.current(), Some("e"));
    }

    #[test]
    fn zero_depth_is_treated_as_one() {
        let mut log = HistoryLog::new(HistoryConfig::new(0));
        log.record("a");
        log.record("b");
        assert_eq!(log.len(), 1);
        assert_eq!(log.current(), Some("b"));
        assert_eq!(log.undo(), None);
    }

    #[test]
    fn clear_resets() {
        let mut log = log_of(&["a", "b"]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
        assert!(log.record("a"));
    }

    #[test]
    fn debug_shows_shape_not_contents() {
        let log = log_of(&["secret"]);
        let dbg = format!("{log:?}");
        assert!(dbg.contains("HistoryLog"));
        assert!(dbg.contains("len: 1"));
        assert!(!dbg.contains("secret"));
    }
}

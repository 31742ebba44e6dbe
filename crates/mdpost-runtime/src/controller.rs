#![forbid(unsafe_code)]

//! Keystroke controller for a plain-text editing surface.
//!
//! [`InputController`] sits between the host's keyboard events and a
//! [`TextSurface`]. For each key it classifies an [`EditCommand`], runs the
//! matching rule, writes the result back to the surface, and notifies change
//! listeners. Keys it does not claim are left to the host's native handling;
//! the host reports the resulting mutation through
//! [`handle_native_input`](InputController::handle_native_input).
//!
//! # Event Flow
//!
//! ```text
//! KeyEvent ──► classify ──► PassThrough / NewlinePlain ──► host default
//!                 │
//!                 ├── SelectAll ──────────► surface (selection only)
//!                 ├── Indent/Outdent/Newline* ──► surface ──► listeners ──► debouncer
//!                 └── Undo/Redo ──► flush debouncer ──► history ──► surface ──► listeners
//!
//! tick(now) ──► debouncer.poll ──► history.record
//! ```
//!
//! # Invariants
//!
//! 1. Every value written to the surface is followed by exactly one
//!    [`ChangeEvent`] before control returns to the host.
//! 2. Values restored by undo/redo are never recorded as new entries.
//! 3. Classification and execution never fail; misses are no-ops.

use std::fmt;
use std::time::Duration;

use mdpost_core::config::EditorConfig;
use mdpost_core::event::KeyEvent;
use mdpost_core::keybinding::{EditCommand, classify};
use mdpost_core::rules;
use mdpost_core::text::EditableText;
use tracing::{debug, debug_span, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::debounce::CommitDebouncer;
use crate::surface::TextSurface;
use crate::undo::{HistoryConfig, HistoryLog};

/// Notification fired after every accepted edit.
///
/// Carries only the new full value; listeners cannot tell native input from
/// edits the controller synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    value: String,
}

impl ChangeEvent {
    /// The new buffer value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consume the event, returning the value.
    #[must_use]
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Result of handling one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The command the key resolved to.
    pub command: EditCommand,
    /// The host must suppress its default handling.
    pub prevent_default: bool,
    /// The controller wrote to the surface (value or selection).
    pub changed: bool,
}

impl KeyOutcome {
    fn native(command: EditCommand) -> Self {
        Self {
            command,
            prevent_default: false,
            changed: false,
        }
    }
}

type Listener = Box<dyn FnMut(&ChangeEvent)>;

enum HistoryStep {
    Undo,
    Redo,
}

/// Keystroke controller bound to one surface for one editing session.
pub struct InputController<S: TextSurface> {
    surface: S,
    history: HistoryLog,
    debouncer: CommitDebouncer,
    indent_unit: String,
    listeners: Vec<Listener>,
}

impl<S: TextSurface + fmt::Debug> fmt::Debug for InputController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputController")
            .field("surface", &self.surface)
            .field("history", &self.history)
            .field("debouncer", &self.debouncer)
            .field("indent_unit", &self.indent_unit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: TextSurface> InputController<S> {
    /// Mount a controller on `surface`.
    ///
    /// The surface's current value is the default value. It enters the
    /// history only when `config.seed_history` is set.
    #[must_use]
    pub fn new(surface: S, config: &EditorConfig) -> Self {
        let config = config.clone().validated();
        let mut history = HistoryLog::new(HistoryConfig::new(config.history_max_depth));
        if config.seed_history {
            history.record(&surface.value());
        }
        debug!(
            debounce_ms = config.commit_debounce_ms,
            indent_width = config.indent_width,
            seeded = config.seed_history,
            "editor mounted"
        );
        Self {
            surface,
            history,
            debouncer: CommitDebouncer::new(config.commit_debounce()),
            indent_unit: config.indent_unit(),
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ====================================================================
    // Event Handling
    // ====================================================================

    /// Handle a key event.
    ///
    /// When the outcome says `prevent_default`, the host must suppress its
    /// native handling of the key; otherwise it lets the key through and
    /// reports the result with [`handle_native_input`](Self::handle_native_input).
    pub fn handle_key(&mut self, event: &KeyEvent, now: Duration) -> KeyOutcome {
        let text = self.surface.text();
        let command = classify(event, &text);
        if !command.consumes_event() {
            trace!(command = command.as_str(), "left to host");
            return KeyOutcome::native(command);
        }

        let _span = debug_span!(
            "editor.command",
            command = command.as_str(),
            caret = text.caret(),
            len = text.len()
        )
        .entered();

        let next = match command {
            EditCommand::SelectAll => {
                self.surface.apply(text.select_all());
                return Self::handled(command, true);
            }
            EditCommand::Undo => return Self::handled(command, self.step(HistoryStep::Undo)),
            EditCommand::Redo => return Self::handled(command, self.step(HistoryStep::Redo)),
            EditCommand::IndentLine => Some(rules::indent(&text, &self.indent_unit)),
            EditCommand::OutdentLine => rules::outdent(&text, &self.indent_unit),
            EditCommand::NewlineContinueList => rules::continue_list(&text),
            EditCommand::NewlineWithIndent => rules::newline_with_indent(&text),
            EditCommand::NewlinePlain | EditCommand::PassThrough => None,
        };

        let changed = match next {
            Some(next) => {
                self.commit_edit(next, now);
                true
            }
            None => {
                debug!("rule did not apply");
                false
            }
        };
        Self::handled(command, changed)
    }

    /// Report a mutation made by the host's native input handling.
    ///
    /// Fires the change listeners and (re)schedules the debounced commit.
    pub fn handle_native_input(&mut self, now: Duration) {
        let value = self.surface.value();
        trace!(len = value.len(), "native input");
        self.debouncer.schedule(value.clone(), now);
        self.notify(value);
    }

    /// Finalise a due commit.
    ///
    /// Returns `true` when a new history entry was recorded.
    pub fn tick(&mut self, now: Duration) -> bool {
        let current = self.surface.value();
        let Some(value) = self.debouncer.poll(now, &current) else {
            return false;
        };
        let recorded = self.history.record(&value);
        if recorded {
            debug!(
                entries = self.history.len(),
                cursor = self.history.cursor().unwrap_or(0),
                "history commit"
            );
        }
        recorded
    }

    /// Write `next` to the surface, notify listeners, and schedule a commit.
    pub fn commit_edit(&mut self, next: EditableText, now: Duration) {
        self.apply_and_notify(next);
        let value = self.surface.value();
        self.debouncer.schedule(value, now);
    }

    /// Step back in history. Returns `true` when the surface changed.
    pub fn undo(&mut self) -> bool {
        self.step(HistoryStep::Undo)
    }

    /// Step forward in history. Returns `true` when the surface changed.
    pub fn redo(&mut self) -> bool {
        self.step(HistoryStep::Redo)
    }

    /// Select the entire buffer. Does not notify listeners.
    pub fn select_all(&mut self) -> bool {
        let text = self.surface.text();
        self.surface.apply(text.select_all());
        true
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// The bound surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the bound surface, for hosts mirroring native input.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current value and selection.
    #[must_use]
    pub fn text(&self) -> EditableText {
        self.surface.text()
    }

    /// The history log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Deadline of the pending commit, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Unmount, returning the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    // ====================================================================
    // Internals
    // ====================================================================

    fn handled(command: EditCommand, changed: bool) -> KeyOutcome {
        KeyOutcome {
            command,
            prevent_default: true,
            changed,
        }
    }

    fn step(&mut self, step: HistoryStep) -> bool {
        let before = self.surface.text();

        if let Some(value) = self.debouncer.flush(before.value())
            && self.history.record(&value)
        {
            debug!(entries = self.history.len(), "pending burst committed");
        }
        self.debouncer.cancel();

        let restored = match step {
            HistoryStep::Undo => self.history.undo(),
            HistoryStep::Redo => self.history.redo(),
        };
        let Some(restored) = restored.map(str::to_owned) else {
            debug!("history exhausted");
            return false;
        };

        let caret = restored_caret(&before, &restored);
        debug!(
            cursor = self.history.cursor().unwrap_or(0),
            caret,
            "history restored"
        );
        self.apply_and_notify(EditableText::new(restored).with_caret(caret));
        true
    }

    fn apply_and_notify(&mut self, next: EditableText) {
        let value = next.value().to_owned();
        self.surface.apply(next);
        self.notify(value);
    }

    fn notify(&mut self, value: String) {
        let event = ChangeEvent { value };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

/// Caret for a value restored from history.
///
/// Lands at the end of the region that differs from `before`, snapped
/// forward to a grapheme boundary. Identical text keeps the old caret.
fn restored_caret(before: &EditableText, after: &str) -> usize {
    let old = before.value();
    if old == after {
        return before.caret().min(after.len());
    }

    let prefix = common_prefix_len(old, after);
    let suffix = common_suffix_len(&old[prefix..], &after[prefix..]);
    let end = after.len() - suffix;

    after
        .grapheme_indices(true)
        .map(|(idx, _)| idx)
        .find(|&idx| idx >= end)
        .unwrap_or(after.len())
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map_or(a.len().min(b.len()), |((idx, _), _)| idx)
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(ca, cb)| ca == cb)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use mdpost_core::event::{KeyCode, KeyEventKind, Modifiers};

    use super::*;
    use crate::surface::MemorySurface;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn ctrl(c: char) -> KeyEvent {
        key(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL)
    }

    fn controller(value: &str) -> InputController<MemorySurface> {
        InputController::new(MemorySurface::new(value), &EditorConfig::default())
    }

    fn recorder(ctl: &mut InputController<MemorySurface>) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctl.subscribe(move |event| sink.borrow_mut().push(event.value().to_owned()));
        seen
    }

    fn type_at(ctl: &mut InputController<MemorySurface>, s: &str, now: Duration) {
        ctl.surface_mut().type_str(s);
        ctl.handle_native_input(now);
    }

    // --- Scenarios ---

    #[test]
    fn select_all_selects_buffer() {
        let mut ctl = controller("hello");
        ctl.surface_mut().set_selection(5, 5);
        let seen = recorder(&mut ctl);

        let outcome = ctl.handle_key(&ctrl('a'), ms(0));
        assert_eq!(outcome.command, EditCommand::SelectAll);
        assert!(outcome.prevent_default);
        assert_eq!(ctl.text().selection(), (0, 5));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn bursts_separated_by_quiet_become_entries() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        assert!(ctl.tick(ms(1001)));
        type_at(&mut ctl, "b", ms(1500));
        assert!(ctl.tick(ms(2600)));

        assert_eq!(ctl.history().entries().collect::<Vec<_>>(), ["a", "ab"]);
        assert!(ctl.undo());
        assert_eq!(ctl.text().value(), "a");
    }

    #[test]
    fn outdent_at_line_start() {
        let mut ctl = controller("  text");
        ctl.surface_mut().set_selection(2, 2);
        let shift_tab = key(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);

        let outcome = ctl.handle_key(&shift_tab, ms(0));
        assert!(outcome.changed);
        assert_eq!(ctl.text().value(), "text");
        assert_eq!(ctl.text().caret(), 0);
    }

    #[test]
    fn enter_continues_bullet() {
        let mut ctl = controller("- task");
        ctl.surface_mut().set_selection(6, 6);

        let outcome = ctl.handle_key(&key(KeyCode::Enter), ms(0));
        assert_eq!(outcome.command, EditCommand::NewlineContinueList);
        assert_eq!(ctl.text().value(), "- task\n- ");
        assert_eq!(ctl.text().caret(), 7 + 2);
    }

    #[test]
    fn enter_with_selection_keeps_selected_text() {
        let mut ctl = controller("- item tail");
        ctl.surface_mut().set_selection(6, 11);

        let outcome = ctl.handle_key(&key(KeyCode::Enter), ms(0));
        assert_eq!(outcome.command, EditCommand::NewlineContinueList);
        assert_eq!(ctl.text().value(), "- item\n-  tail");
        assert_eq!(ctl.text().selection(), (9, 9));
    }

    // --- Commands ---

    #[test]
    fn tab_indents_and_notifies() {
        let mut ctl = controller("x");
        let seen = recorder(&mut ctl);
        let outcome = ctl.handle_key(&key(KeyCode::Tab), ms(0));
        assert!(outcome.prevent_default && outcome.changed);
        assert_eq!(ctl.text().value(), "  x");
        assert_eq!(ctl.text().caret(), 2);
        assert_eq!(*seen.borrow(), ["  x"]);
    }

    #[test]
    fn configured_indent_width_is_used() {
        let config = EditorConfig::default().with_indent_width(4);
        let mut ctl = InputController::new(MemorySurface::new(""), &config);
        ctl.handle_key(&key(KeyCode::Tab), ms(0));
        assert_eq!(ctl.text().value(), "    ");
    }

    #[test]
    fn outdent_miss_is_swallowed_without_notifying() {
        let mut ctl = controller("text");
        let seen = recorder(&mut ctl);
        let outcome = ctl.handle_key(&key(KeyCode::BackTab), ms(0));
        assert!(outcome.prevent_default);
        assert!(!outcome.changed);
        assert_eq!(ctl.text().value(), "text");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn plain_enter_and_letters_are_left_to_host() {
        let mut ctl = controller("plain");
        ctl.surface_mut().set_selection(5, 5);
        let enter = ctl.handle_key(&key(KeyCode::Enter), ms(0));
        assert_eq!(enter.command, EditCommand::NewlinePlain);
        assert!(!enter.prevent_default);

        let letter = ctl.handle_key(&key(KeyCode::Char('q')), ms(0));
        assert_eq!(letter.command, EditCommand::PassThrough);
        assert!(!letter.prevent_default);
        assert_eq!(ctl.text().value(), "plain");
    }

    #[test]
    fn release_events_do_nothing() {
        let mut ctl = controller("x");
        let outcome = ctl.handle_key(&key(KeyCode::Tab).with_kind(KeyEventKind::Release), ms(0));
        assert!(!outcome.prevent_default);
        assert_eq!(ctl.text().value(), "x");
    }

    #[test]
    fn undo_on_empty_history_is_swallowed() {
        let mut ctl = controller("start");
        let seen = recorder(&mut ctl);
        let outcome = ctl.handle_key(&ctrl('z'), ms(0));
        assert!(outcome.prevent_default);
        assert!(!outcome.changed);
        assert_eq!(ctl.text().value(), "start");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn intercepted_edits_schedule_commits() {
        let mut ctl = controller("");
        ctl.handle_key(&key(KeyCode::Tab), ms(0));
        assert_eq!(ctl.next_deadline(), Some(ms(1000)));
        assert!(ctl.tick(ms(1000)));
        assert_eq!(ctl.history().current(), Some("  "));
    }

    // --- Debounce ---

    #[test]
    fn rapid_typing_coalesces() {
        let mut ctl = controller("");
        for (i, c) in "hello".chars().enumerate() {
            type_at(&mut ctl, &c.to_string(), ms(i as u64 * 100));
            assert!(!ctl.tick(ms(i as u64 * 100 + 50)));
        }
        assert!(ctl.tick(ms(1400)));
        assert_eq!(ctl.history().entries().collect::<Vec<_>>(), ["hello"]);
    }

    #[test]
    fn tick_without_pending_is_noop() {
        let mut ctl = controller("x");
        assert!(!ctl.tick(ms(10_000)));
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn seeded_history_starts_with_default_value() {
        let config = EditorConfig::default().with_seed_history(true);
        let mut ctl = InputController::new(MemorySurface::new("seed"), &config);
        assert_eq!(ctl.history().current(), Some("seed"));
        ctl.surface_mut().set_selection(4, 4);
        type_at(&mut ctl, "!", ms(0));
        ctl.tick(ms(1000));
        assert!(ctl.undo());
        assert_eq!(ctl.text().value(), "seed");
    }

    // --- Undo / redo ---

    #[test]
    fn undo_flushes_pending_burst() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        ctl.tick(ms(1000));
        type_at(&mut ctl, "b", ms(1200));

        assert!(ctl.undo());
        assert_eq!(ctl.text().value(), "a");
        assert!(ctl.redo());
        assert_eq!(ctl.text().value(), "ab");
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn undo_writes_are_not_recorded() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        ctl.tick(ms(1000));
        type_at(&mut ctl, "b", ms(2000));
        ctl.tick(ms(3000));

        ctl.handle_key(&ctrl('z'), ms(3100));
        ctl.handle_key(&ctrl('y'), ms(3200));
        ctl.handle_key(&ctrl('z'), ms(3300));
        assert!(!ctl.tick(ms(10_000)));
        assert_eq!(ctl.history().len(), 2);
        assert_eq!(ctl.history().cursor(), Some(0));
    }

    #[test]
    fn undo_and_redo_notify_listeners() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        ctl.tick(ms(1000));
        type_at(&mut ctl, "b", ms(2000));
        ctl.tick(ms(3000));
        let seen = recorder(&mut ctl);

        ctl.undo();
        ctl.redo();
        assert_eq!(*seen.borrow(), ["a", "ab"]);
    }

    #[test]
    fn edit_after_undo_prunes_redo() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        ctl.tick(ms(1000));
        type_at(&mut ctl, "b", ms(2000));
        ctl.tick(ms(3000));

        ctl.undo();
        type_at(&mut ctl, "x", ms(4000));
        ctl.tick(ms(5000));
        assert_eq!(ctl.history().entries().collect::<Vec<_>>(), ["a", "ax"]);
        assert!(!ctl.redo());
    }

    #[test]
    fn shift_ctrl_z_redoes() {
        let mut ctl = controller("");
        type_at(&mut ctl, "a", ms(0));
        ctl.tick(ms(1000));
        type_at(&mut ctl, "b", ms(2000));
        ctl.tick(ms(3000));
        ctl.undo();

        let redo = key(KeyCode::Char('Z')).with_modifiers(Modifiers::SUPER | Modifiers::SHIFT);
        let outcome = ctl.handle_key(&redo, ms(3500));
        assert_eq!(outcome.command, EditCommand::Redo);
        assert_eq!(ctl.text().value(), "ab");
    }

    // --- Caret placement ---

    #[test]
    fn undo_caret_lands_after_restored_region() {
        let mut before = EditableText::new("hello brave world").with_caret(11);
        assert_eq!(restored_caret(&before, "hello world"), 6);
        before = EditableText::new("hello world").with_caret(6);
        assert_eq!(restored_caret(&before, "hello brave world"), 12);
    }

    #[test]
    fn caret_for_identical_text_is_kept() {
        let before = EditableText::new("same").with_caret(2);
        assert_eq!(restored_caret(&before, "same"), 2);
    }

    #[test]
    fn caret_for_appended_text_is_end() {
        let before = EditableText::new("a").with_caret(1);
        assert_eq!(restored_caret(&before, "ab"), 2);
        let before = EditableText::new("ab").with_caret(2);
        assert_eq!(restored_caret(&before, "a"), 1);
    }

    #[test]
    fn caret_snaps_to_grapheme_boundary() {
        // Only the base letter differs; the shared combining accent keeps the
        // raw end inside the cluster.
        let before = EditableText::new("ae\u{301}").with_caret(0);
        let after = "ao\u{301}";
        assert_eq!(restored_caret(&before, after), after.len());

        let before = EditableText::new("a👍🏻").with_caret(0);
        let after = "a✋🏻";
        assert_eq!(restored_caret(&before, after), after.len());
    }

    #[test]
    fn common_affixes_respect_char_boundaries() {
        assert_eq!(common_prefix_len("héllo", "hélp"), 4);
        assert_eq!(common_prefix_len("ab", "abc"), 2);
        assert_eq!(common_suffix_len("xé", "yé"), 2);
    }
}

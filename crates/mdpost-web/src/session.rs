#![forbid(unsafe_code)]

//! Host-driven editing session for a browser `<textarea>`.
//!
//! [`EditorSession`] mirrors the textarea in a [`MemorySurface`] and runs an
//! [`InputController`] against it. The page script forwards DOM events and
//! timestamps in; the session hands back two outboxes:
//!
//! - [`SurfaceUpdate`]s: value and selection the script must write back to
//!   the textarea after an intercepted command
//! - change values: what the page passes to its `onChange` consumers
//!
//! Time comes from the host as `performance.now()` milliseconds. Nothing here
//! reads a clock, so a session replays deterministically from a recorded
//! event log.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use mdpost_core::config::EditorConfig;
use mdpost_core::event::KeyEvent;
use mdpost_core::text::EditableText;
use mdpost_runtime::{InputController, ManualClock, MemorySurface, MonotonicClock, TextSurface};
use tracing::warn;

use crate::input_parser::{HostEvent, parse_host_event};
use crate::settings::PosterSettings;
use crate::utf16::{byte_range_from_utf16, utf16_range_from_bytes};

/// Keyboard shortcut help, shown as the textarea placeholder.
pub const SHORTCUT_HELP: &str = "Type Markdown here...

Shortcuts:
• Ctrl/Cmd + A: select all
• Ctrl/Cmd + Z: undo
• Ctrl/Cmd + Y or Ctrl/Cmd + Shift + Z: redo
• Ctrl/Cmd + C/V/X: copy/paste/cut
• Tab: indent
• Shift + Tab: outdent
• Enter: keep indentation and continue lists";

/// Value and selection to write back to the textarea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceUpdate {
    /// New textarea value.
    pub value: String,
    /// Selection start in UTF-16 code units.
    pub selection_start: u32,
    /// Selection end in UTF-16 code units.
    pub selection_end: u32,
}

impl SurfaceUpdate {
    fn from_text(text: &EditableText) -> Self {
        let (selection_start, selection_end) =
            utf16_range_from_bytes(text.value(), text.selection_start(), text.selection_end());
        Self {
            value: text.value().to_owned(),
            selection_start,
            selection_end,
        }
    }
}

/// One mounted editor, driven by the page.
pub struct EditorSession {
    controller: InputController<MemorySurface>,
    clock: ManualClock,
    changes: Rc<RefCell<Vec<String>>>,
    updates: Vec<SurfaceUpdate>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("controller", &self.controller)
            .field("now", &self.clock.now_mono())
            .field("pending_updates", &self.updates.len())
            .field("pending_changes", &self.changes.borrow().len())
            .finish()
    }
}

impl EditorSession {
    /// Mount a session with `default_value` in the textarea.
    #[must_use]
    pub fn new(default_value: &str, config: &EditorConfig) -> Self {
        let mut controller = InputController::new(MemorySurface::new(default_value), config);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        controller.subscribe(move |event| sink.borrow_mut().push(event.value().to_owned()));
        Self {
            controller,
            clock: ManualClock::new(),
            changes,
            updates: Vec::new(),
        }
    }

    /// Mount a session on a stored settings document.
    #[must_use]
    pub fn from_settings(settings: &PosterSettings, config: &EditorConfig) -> Self {
        Self::new(&settings.md_string, config)
    }

    // ====================================================================
    // Host Events
    // ====================================================================

    /// Handle `keydown`. Returns `true` when the page must call
    /// `preventDefault()`.
    pub fn key_down(&mut self, event: &KeyEvent, now_ms: f64) -> bool {
        let now = self.advance_to(now_ms);
        let outcome = self.controller.handle_key(event, now);
        self.queue_update(outcome.changed);
        outcome.prevent_default
    }

    /// Handle native `input`: the textarea now holds `value`.
    pub fn input(&mut self, value: &str, selection_start: u32, selection_end: u32, now_ms: f64) {
        let now = self.advance_to(now_ms);
        let (start, end) = byte_range_from_utf16(value, selection_start, selection_end);
        self.controller
            .surface_mut()
            .apply(EditableText::new(value).with_selection(start, end));
        self.controller.handle_native_input(now);
    }

    /// Handle a selection change that left the value alone.
    pub fn select(&mut self, selection_start: u32, selection_end: u32) {
        let value = self.controller.surface().get().value().to_owned();
        let (start, end) = byte_range_from_utf16(&value, selection_start, selection_end);
        self.controller.surface_mut().set_selection(start, end);
    }

    /// Dispatch one JSON-encoded host event.
    ///
    /// Returns `true` when the event was a key the page must suppress.
    /// Malformed input is logged and ignored.
    pub fn push_encoded(&mut self, json: &str, now_ms: f64) -> bool {
        match parse_host_event(json) {
            Ok(Some(HostEvent::Key(event))) => self.key_down(&event, now_ms),
            Ok(Some(HostEvent::Input {
                value,
                selection_start,
                selection_end,
            })) => {
                self.input(&value, selection_start, selection_end, now_ms);
                false
            }
            Ok(Some(HostEvent::Selection {
                selection_start,
                selection_end,
            })) => {
                self.select(selection_start, selection_end);
                false
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "ignoring malformed host event");
                false
            }
        }
    }

    /// Advance time and finalise a due commit.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let now = self.advance_to(now_ms);
        self.controller.tick(now)
    }

    /// When the page should call [`tick`](Self::tick) next, in milliseconds.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.controller.next_deadline().map(ms_from_duration)
    }

    /// Step back in history (toolbar button). Queues a surface update.
    pub fn undo(&mut self) -> bool {
        let changed = self.controller.undo();
        self.queue_update(changed)
    }

    /// Step forward in history (toolbar button). Queues a surface update.
    pub fn redo(&mut self) -> bool {
        let changed = self.controller.redo();
        self.queue_update(changed)
    }

    // ====================================================================
    // Outboxes
    // ====================================================================

    /// Take the surface writes queued since the last drain.
    pub fn drain_updates(&mut self) -> Vec<SurfaceUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Take the change notifications queued since the last drain.
    pub fn drain_changes(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.changes.borrow_mut())
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Current textarea value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.controller.surface().get().value()
    }

    /// Current value and selection (byte offsets).
    #[must_use]
    pub fn text(&self) -> &EditableText {
        self.controller.surface().get()
    }

    /// The controller, for inspection.
    #[must_use]
    pub fn controller(&self) -> &InputController<MemorySurface> {
        &self.controller
    }

    fn queue_update(&mut self, changed: bool) -> bool {
        if changed {
            self.updates
                .push(SurfaceUpdate::from_text(self.controller.surface().get()));
        }
        changed
    }

    fn advance_to(&mut self, now_ms: f64) -> Duration {
        self.clock.set(duration_from_ms(now_ms));
        self.clock.now_mono()
    }
}

/// Convert host milliseconds to a [`Duration`].
///
/// Host input can be noisy (NaN, infinities, negative values); those map to
/// zero so the clock never panics.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (ms * 1_000_000.0).min(u64::MAX as f64) as u64;
    Duration::from_nanos(nanos)
}

fn ms_from_duration(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

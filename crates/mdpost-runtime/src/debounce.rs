#![forbid(unsafe_code)]

//! Commit debouncing.
//!
//! [`CommitDebouncer`] turns a stream of edits into at most one history
//! commit per quiescence window. Every edit calls
//! [`schedule`](CommitDebouncer::schedule), which replaces the pending value
//! and pushes the deadline out to `now + window`. The host calls
//! [`poll`](CommitDebouncer::poll) on its tick; once the deadline passes, the
//! pending value is handed back only if it still equals what the surface
//! shows.
//!
//! # State Machine
//!
//! ```text
//!            schedule(v, t)                 poll(now >= due, current == v)
//!   ┌──────┐ ─────────────► ┌─────────────┐ ──────────────────────────────► Some(v)
//!   │ Idle │                │ Pending(v)  │
//!   └──────┘ ◄───────────── └─────────────┘ ──────────────────────────────► None (stale)
//!              cancel()        │      ▲       poll(now >= due, current != v)
//!                              └──────┘
//!                           schedule(v', t')
//! ```
//!
//! # Invariants
//!
//! 1. At most one value is pending.
//! 2. A value is returned at most once.
//! 3. A returned value always equals the `current` value passed in.

use std::time::Duration;

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending { value: String, due: Duration },
}

/// Cancellable, freshness-checked commit timer.
#[derive(Debug, Clone)]
pub struct CommitDebouncer {
    window: Duration,
    state: DebounceState,
}

impl CommitDebouncer {
    /// Create an idle debouncer with the given quiescence window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
        }
    }

    /// Schedule a commit of `value`, replacing any pending one.
    pub fn schedule(&mut self, value: impl Into<String>, now: Duration) {
        let due = now.saturating_add(self.window);
        if self.is_pending() {
            trace!(due_ms = due.as_millis() as u64, "commit rescheduled");
        }
        self.state = DebounceState::Pending {
            value: value.into(),
            due,
        };
    }

    /// Take the pending value if its deadline has passed.
    ///
    /// Returns `Some` only when the pending value equals `current`; a stale
    /// value is dropped. Before the deadline this returns `None` and keeps
    /// the pending value.
    pub fn poll(&mut self, now: Duration, current: &str) -> Option<String> {
        match &self.state {
            DebounceState::Pending { due, .. } if now >= *due => self.take_fresh(current),
            _ => None,
        }
    }

    /// Take the pending value immediately if it is fresh.
    pub fn flush(&mut self, current: &str) -> Option<String> {
        self.take_fresh(current)
    }

    /// Drop any pending value.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// Whether a commit is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Deadline of the pending commit.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        match self.state {
            DebounceState::Pending { due, .. } => Some(due),
            DebounceState::Idle => None,
        }
    }

    /// The quiescence window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn take_fresh(&mut self, current: &str) -> Option<String> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { value, .. } if value == current => Some(value),
            DebounceState::Pending { .. } => {
                trace!("stale commit dropped");
                None
            }
            DebounceState::Idle => None,
        }
    }
}

#![forbid(unsafe_code)]

//! mdpost Runtime
//!
//! This crate ties the pure rules of `mdpost-core` to a live text surface and
//! a clock.
//!
//! # Key Components
//!
//! - [`InputController`] - Classifies keys, runs rules, writes the surface
//! - [`HistoryLog`] - Bounded linear undo/redo log of buffer values
//! - [`CommitDebouncer`] - Freshness-checked commit timer
//! - [`TextSurface`] - Trait for whatever holds the buffer on screen
//! - [`ManualClock`] - Host-driven monotonic time source
//!
//! # Role in mdpost
//! `mdpost-runtime` owns the only state in the editor: the history log and
//! the pending commit. Hosts call into it synchronously from their event
//! handlers and from a periodic tick; it never spawns, blocks, or sleeps.

pub mod clock;
pub mod controller;
pub mod debounce;
pub mod surface;
pub mod undo;

pub use clock::{ManualClock, MonotonicClock};
pub use controller::{ChangeEvent, InputController, KeyOutcome};
pub use debounce::CommitDebouncer;
pub use surface::{MemorySurface, TextSurface};
pub use undo::{HistoryConfig, HistoryLog};

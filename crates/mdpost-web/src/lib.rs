#![forbid(unsafe_code)]

//! Browser bridge for the mdpost editor.
//!
//! # Role in mdpost
//! `mdpost-web` is the host-driven adapter between a DOM `<textarea>` and
//! the editor runtime. It does not touch `wasm-bindgen` or `web-sys`: the
//! page script forwards events as JSON and timestamps as numbers, and reads
//! back plain values. That keeps the whole bridge testable natively.
//!
//! # Key Components
//!
//! - [`EditorSession`] - one mounted editor with its outboxes
//! - [`parse_host_event`] - JSON wire format to [`HostEvent`]
//! - [`PosterSettings`] - the persisted document stored under [`STORAGE_KEY`]
//! - [`utf16`] - DOM selection offsets to byte offsets and back

pub mod input_parser;
pub mod session;
pub mod settings;
pub mod utf16;

pub use input_parser::{HostEvent, InputParseError, parse_host_event};
pub use session::{EditorSession, SHORTCUT_HELP, SurfaceUpdate};
pub use settings::{DEFAULT_DOCUMENT, PosterSettings, STORAGE_KEY, SettingsError};

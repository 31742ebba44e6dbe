#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the mdpost editor.
//!
//! [`MdpostEditor`] wraps an [`mdpost_web::EditorSession`] for the page
//! script. The script attaches `keydown`, `input`, and `selectionchange`
//! listeners to the `<textarea>`, forwards them as JSON, and schedules a
//! `tick` at `nextDeadline()`.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::MdpostEditor;

// Editor core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod editor_core;

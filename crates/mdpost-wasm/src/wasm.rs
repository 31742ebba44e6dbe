#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`MdpostEditor`].
//!
//! Wraps [`super::editor_core::EditorCore`] with JS-friendly types. Only
//! compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::editor_core::EditorCore;
use mdpost_web::{SHORTCUT_HELP, STORAGE_KEY, SurfaceUpdate};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn update_to_js(update: &SurfaceUpdate) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "value", JsValue::from_str(&update.value));
    set_js(
        &obj,
        "selectionStart",
        JsValue::from_f64(f64::from(update.selection_start)),
    );
    set_js(
        &obj,
        "selectionEnd",
        JsValue::from_f64(f64::from(update.selection_end)),
    );
    obj.into()
}

fn strings_to_js(items: Vec<String>) -> Array {
    let arr = Array::new();
    for item in items {
        arr.push(&JsValue::from_str(&item));
    }
    arr
}

/// Markdown editor bound to one `<textarea>`.
///
/// Host-driven: the page forwards DOM events with `performance.now()`
/// timestamps, writes back every entry of `drainUpdates()`, and calls
/// `tick` when `nextDeadline()` passes.
#[wasm_bindgen]
pub struct MdpostEditor {
    inner: EditorCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl MdpostEditor {
    /// Mount with `defaultValue`, or the default document when omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(default_value: Option<String>) -> Self {
        install_panic_hook();
        Self {
            inner: EditorCore::new(default_value.as_deref(), None),
        }
    }

    /// Mount with a JSON `EditorConfig`. Invalid config falls back to
    /// defaults and is reported through `takeLogs`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(default_value: Option<String>, config_json: &str) -> Self {
        install_panic_hook();
        Self {
            inner: EditorCore::new(default_value.as_deref(), Some(config_json)),
        }
    }

    /// Forward a `keydown`, `input`, or `selectionchange` event as JSON.
    /// Returns `true` when the page must call `preventDefault()`.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str, now_ms: f64) -> bool {
        self.inner.push_encoded_input(json, now_ms)
    }

    /// Handle `keydown` given as JSON. Same as `pushEncodedInput`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, json: &str, now_ms: f64) -> bool {
        self.inner.push_encoded_input(json, now_ms)
    }

    /// Handle native `input`. Offsets are UTF-16 code units.
    pub fn input(&mut self, value: &str, selection_start: u32, selection_end: u32, now_ms: f64) {
        self.inner.input(value, selection_start, selection_end, now_ms);
    }

    /// Track a selection change. Offsets are UTF-16 code units.
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, selection_start: u32, selection_end: u32) {
        self.inner.set_selection(selection_start, selection_end);
    }

    /// Finalise a due history commit. Returns `true` when one was recorded.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.inner.tick(now_ms)
    }

    /// Toolbar undo.
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// Toolbar redo.
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// Current textarea value.
    pub fn value(&self) -> String {
        self.inner.value().to_owned()
    }

    /// Timestamp (ms) of the next pending commit, or `undefined`.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.next_deadline()
    }

    /// Drain `{ value, selectionStart, selectionEnd }` writes for the textarea.
    #[wasm_bindgen(js_name = drainUpdates)]
    pub fn drain_updates(&mut self) -> Array {
        let arr = Array::new();
        for update in self.inner.drain_updates() {
            arr.push(&update_to_js(&update));
        }
        arr
    }

    /// Drain values for `onChange` consumers.
    #[wasm_bindgen(js_name = drainChanges)]
    pub fn drain_changes(&mut self) -> Array {
        strings_to_js(self.inner.drain_changes())
    }

    /// Load the stored settings document and remount on its `mdString`.
    #[wasm_bindgen(js_name = loadSettings)]
    pub fn load_settings(&mut self, json: &str) -> bool {
        self.inner.load_settings(json)
    }

    /// Settings with the current document, for `localStorage`.
    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> Option<String> {
        match self.inner.settings_json() {
            Ok(json) => Some(json),
            Err(err) => {
                console_error(&format!("settings: {err}"));
                None
            }
        }
    }

    /// `localStorage` key for `settingsJson`.
    #[wasm_bindgen(js_name = storageKey)]
    pub fn storage_key() -> String {
        STORAGE_KEY.to_owned()
    }

    /// Placeholder text listing the shortcuts.
    #[wasm_bindgen(js_name = shortcutHelp)]
    pub fn shortcut_help() -> String {
        SHORTCUT_HELP.to_owned()
    }

    /// Drain diagnostic messages (bad config, unreadable settings).
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        strings_to_js(self.inner.take_logs())
    }
}

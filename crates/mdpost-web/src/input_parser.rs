#![forbid(unsafe_code)]

//! JSON input parser for events emitted by the page script.
//!
//! The script attached to the `<textarea>` serializes each DOM event it
//! forwards as one JSON object:
//!
//! ```json
//! {"kind":"key","phase":"down","key":"z","code":"KeyZ","mods":4,"repeat":false}
//! {"kind":"input","value":"- item","selection_start":6,"selection_end":6}
//! {"kind":"selection","selection_start":0,"selection_end":6}
//! ```
//!
//! `mods` bits are `1=shift`, `2=alt`, `4=ctrl`, `8=meta`. Selection offsets
//! are UTF-16 code units, as the DOM reports them. Kinds without an editor
//! meaning (focus, composition, unknown) return `Ok(None)`.

use mdpost_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
use serde::Deserialize;

/// A host event the editor session understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// `keydown` / `keyup`.
    Key(KeyEvent),
    /// Native `input`: the textarea's new value and selection.
    Input {
        /// New value.
        value: String,
        /// Selection start in UTF-16 code units.
        selection_start: u32,
        /// Selection end in UTF-16 code units.
        selection_end: u32,
    },
    /// `selectionchange` without a value change (click, arrow keys).
    Selection {
        /// Selection start in UTF-16 code units.
        selection_start: u32,
        /// Selection end in UTF-16 code units.
        selection_end: u32,
    },
}

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown key phase value.
    UnknownPhase(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    selection_start: Option<i64>,
    #[serde(default)]
    selection_end: Option<i64>,
}

/// Parse one JSON-encoded host event.
///
/// Returns `Ok(None)` for kinds the editor ignores and `Err` for malformed
/// JSON or missing required fields.
pub fn parse_host_event(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "key" => parse_key_event(&raw).map(|key| Some(HostEvent::Key(key))),
        "input" => parse_input_event(raw).map(Some),
        "selection" => parse_selection_event(&raw).map(Some),
        _ => Ok(None),
    }
}

/// Parse a DOM `KeyboardEvent.key` / `.code` label into a [`KeyCode`].
///
/// Unknown labels map to [`KeyCode::Null`].
#[must_use]
pub fn parse_key_code(label: &str) -> KeyCode {
    parse_key_code_opt(label).unwrap_or(KeyCode::Null)
}

/// Decode the `mods` bitmask.
#[must_use]
pub fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = u8::try_from(mods.unwrap_or(0).clamp(0, i32::from(u8::MAX))).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

fn parse_key_code_opt(code: &str) -> Option<KeyCode> {
    match code {
        "Enter" | "NumpadEnter" => Some(KeyCode::Enter),
        "Escape" | "Esc" => Some(KeyCode::Escape),
        "Backspace" => Some(KeyCode::Backspace),
        "Tab" => Some(KeyCode::Tab),
        "BackTab" => Some(KeyCode::BackTab),
        "Delete" => Some(KeyCode::Delete),
        "Insert" => Some(KeyCode::Insert),
        "Home" => Some(KeyCode::Home),
        "End" => Some(KeyCode::End),
        "PageUp" => Some(KeyCode::PageUp),
        "PageDown" => Some(KeyCode::PageDown),
        "Up" | "ArrowUp" => Some(KeyCode::Up),
        "Down" | "ArrowDown" => Some(KeyCode::Down),
        "Left" | "ArrowLeft" => Some(KeyCode::Left),
        "Right" | "ArrowRight" => Some(KeyCode::Right),
        "Space" | "Spacebar" => Some(KeyCode::Char(' ')),
        other => {
            // DOM KeyboardEvent.code fallback: KeyA..KeyZ
            if let Some(tail) = other.strip_prefix("Key") {
                let mut chars = tail.chars();
                if let Some(c) = chars.next()
                    && chars.next().is_none()
                {
                    return Some(KeyCode::Char(c.to_ascii_lowercase()));
                }
            }
            // DOM KeyboardEvent.code fallback: Digit0..Digit9
            if let Some(tail) = other.strip_prefix("Digit") {
                let mut chars = tail.chars();
                if let Some(c) = chars.next()
                    && chars.next().is_none()
                    && c.is_ascii_digit()
                {
                    return Some(KeyCode::Char(c));
                }
            }
            if let Some(n) = other
                .strip_prefix('F')
                .and_then(|s| s.parse::<u8>().ok())
                .filter(|&n| (1..=24).contains(&n))
            {
                return Some(KeyCode::F(n));
            }
            let mut chars = other.chars();
            if let Some(c) = chars.next()
                && chars.next().is_none()
            {
                return Some(KeyCode::Char(c));
            }
            None
        }
    }
}

fn parse_key_event(raw: &RawInput) -> Result<KeyEvent, InputParseError> {
    let phase = raw.phase.as_deref().unwrap_or("down");
    let kind = match phase {
        "down" => KeyEventKind::Press,
        "up" => KeyEventKind::Release,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };

    let key_str = raw.key.as_deref().filter(|s| !s.is_empty());
    let code_str = raw.code.as_deref().filter(|s| !s.is_empty());
    if key_str.is_none() && code_str.is_none() {
        return Err(InputParseError::MissingField("key"));
    }

    let kind = if raw.repeat.unwrap_or(false) && kind == KeyEventKind::Press {
        KeyEventKind::Repeat
    } else {
        kind
    };

    // Prefer the logical `key` (layout-aware); fall back to the physical `code`.
    let code = key_str
        .and_then(parse_key_code_opt)
        .or_else(|| code_str.and_then(parse_key_code_opt))
        .unwrap_or(KeyCode::Null);

    Ok(KeyEvent {
        code,
        modifiers: parse_modifiers(raw.mods),
        kind,
    })
}

fn parse_input_event(raw: RawInput) -> Result<HostEvent, InputParseError> {
    let value = raw.value.ok_or(InputParseError::MissingField("value"))?;
    // A missing selection means the caret sits at the end, as after typing.
    let end_of_value = u32::try_from(value.encode_utf16().count()).unwrap_or(u32::MAX);
    let selection_start = raw.selection_start.map_or(end_of_value, clamp_offset);
    let selection_end = raw.selection_end.map_or(selection_start, clamp_offset);
    Ok(HostEvent::Input {
        value,
        selection_start,
        selection_end,
    })
}

fn parse_selection_event(raw: &RawInput) -> Result<HostEvent, InputParseError> {
    let selection_start = raw
        .selection_start
        .map(clamp_offset)
        .ok_or(InputParseError::MissingField("selection_start"))?;
    let selection_end = raw.selection_end.map_or(selection_start, clamp_offset);
    Ok(HostEvent::Selection {
        selection_start,
        selection_end,
    })
}

fn clamp_offset(offset: i64) -> u32 {
    u32::try_from(offset.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(json: &str) -> KeyEvent {
        match parse_host_event(json) {
            Ok(Some(HostEvent::Key(k))) => k,
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn ctrl_z_keydown() {
        let k = key(r#"{"kind":"key","phase":"down","key":"z","code":"KeyZ","mods":4,"repeat":false}"#);
        assert_eq!(k.code, KeyCode::Char('z'));
        assert_eq!(k.modifiers, Modifiers::CTRL);
        assert_eq!(k.kind, KeyEventKind::Press);
    }

    #[test]
    fn meta_shift_z_keeps_upper_case_key() {
        let k = key(r#"{"kind":"key","key":"Z","code":"KeyZ","mods":9}"#);
        assert_eq!(k.code, KeyCode::Char('Z'));
        assert_eq!(k.modifiers, Modifiers::SUPER | Modifiers::SHIFT);
    }

    #[test]
    fn shift_tab_stays_tab_with_shift() {
        let k = key(r#"{"kind":"key","key":"Tab","code":"Tab","mods":1}"#);
        assert_eq!(k.code, KeyCode::Tab);
        assert!(k.shift());
    }

    #[test]
    fn code_fallback_when_key_is_unidentified() {
        let k = key(r#"{"kind":"key","key":"Unidentified","code":"KeyA","mods":8}"#);
        assert_eq!(k.code, KeyCode::Char('a'));
    }

    #[test]
    fn repeat_and_release() {
        let repeat = key(r#"{"kind":"key","phase":"down","key":"Tab","repeat":true}"#);
        assert_eq!(repeat.kind, KeyEventKind::Repeat);
        let release = key(r#"{"kind":"key","phase":"up","key":"Tab","repeat":true}"#);
        assert_eq!(release.kind, KeyEventKind::Release);
    }

    #[test]
    fn unknown_label_is_null() {
        let k = key(r#"{"kind":"key","key":"AudioVolumeUp"}"#);
        assert_eq!(k.code, KeyCode::Null);
        assert_eq!(parse_key_code("F13"), KeyCode::F(13));
        assert_eq!(parse_key_code("Digit7"), KeyCode::Char('7'));
    }

    #[test]
    fn mods_out_of_range_are_clamped() {
        assert_eq!(parse_modifiers(Some(-3)), Modifiers::NONE);
        assert_eq!(
            parse_modifiers(Some(1000)),
            Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL | Modifiers::SUPER
        );
    }

    #[test]
    fn input_event_with_selection() {
        let event =
            parse_host_event(r#"{"kind":"input","value":"ab","selection_start":1,"selection_end":2}"#);
        assert_eq!(
            event,
            Ok(Some(HostEvent::Input {
                value: "ab".into(),
                selection_start: 1,
                selection_end: 2,
            }))
        );
    }

    #[test]
    fn input_event_without_selection_puts_caret_at_end() {
        let event = parse_host_event(r#"{"kind":"input","value":"a😀"}"#);
        assert_eq!(
            event,
            Ok(Some(HostEvent::Input {
                value: "a😀".into(),
                selection_start: 3,
                selection_end: 3,
            }))
        );
    }

    #[test]
    fn selection_event() {
        let event = parse_host_event(r#"{"kind":"selection","selection_start":4,"selection_end":-1}"#);
        assert_eq!(
            event,
            Ok(Some(HostEvent::Selection {
                selection_start: 4,
                selection_end: 0,
            }))
        );
    }

    #[test]
    fn ignored_kinds() {
        assert_eq!(parse_host_event(r#"{"kind":"focus","focused":true}"#), Ok(None));
        assert_eq!(parse_host_event(r#"{"kind":"composition","phase":"start"}"#), Ok(None));
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_host_event("{"), Err(InputParseError::Json(_))));
        assert_eq!(
            parse_host_event(r#"{"kind":"key","phase":"down"}"#),
            Err(InputParseError::MissingField("key"))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"key","phase":"press","key":"a"}"#),
            Err(InputParseError::UnknownPhase("press".into()))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"input"}"#),
            Err(InputParseError::MissingField("value"))
        );
        assert_eq!(
            parse_host_event(r#"{"kind":"selection"}"#),
            Err(InputParseError::MissingField("selection_start"))
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("value").to_string(),
            "missing required field: value"
        );
    }
}

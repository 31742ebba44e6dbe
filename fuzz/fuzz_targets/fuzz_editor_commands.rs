#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mdpost_core::config::EditorConfig;
use mdpost_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
use mdpost_runtime::{InputController, MemorySurface};

#[derive(Debug, Arbitrary)]
enum Op {
    Key { code: u8, ch: char, mods: u8, release: bool },
    Type(String),
    Select { anchor: u16, head: u16 },
    Advance(u16),
    Undo,
    Redo,
}

fn key_code(selector: u8, ch: char) -> KeyCode {
    match selector % 8 {
        0 => KeyCode::Enter,
        1 => KeyCode::Tab,
        2 => KeyCode::BackTab,
        3 => KeyCode::Char('a'),
        4 => KeyCode::Char('z'),
        5 => KeyCode::Char('y'),
        6 => KeyCode::Backspace,
        _ => KeyCode::Char(ch),
    }
}

fuzz_target!(|input: (String, Vec<Op>)| {
    let (initial, ops) = input;
    if initial.len() > 512 || ops.len() > 256 {
        return;
    }

    let config = EditorConfig::default().with_history_max_depth(16);
    let mut controller = InputController::new(MemorySurface::new(initial), &config);
    let mut now = Duration::ZERO;

    for op in ops {
        match op {
            Op::Key {
                code,
                ch,
                mods,
                release,
            } => {
                let kind = if release {
                    KeyEventKind::Release
                } else {
                    KeyEventKind::Press
                };
                let event = KeyEvent::new(key_code(code, ch))
                    .with_modifiers(Modifiers::from_bits_truncate(mods))
                    .with_kind(kind);
                let outcome = controller.handle_key(&event, now);
                if !outcome.prevent_default {
                    assert!(!outcome.changed);
                }
            }
            Op::Type(s) => {
                if s.len() > 64 {
                    continue;
                }
                controller.surface_mut().type_str(&s);
                controller.handle_native_input(now);
            }
            Op::Select { anchor, head } => {
                controller
                    .surface_mut()
                    .set_selection(usize::from(anchor), usize::from(head));
            }
            Op::Advance(ms) => {
                now += Duration::from_millis(u64::from(ms));
                let _ = controller.tick(now);
            }
            Op::Undo => {
                let _ = controller.undo();
            }
            Op::Redo => {
                let _ = controller.redo();
            }
        }

        let text = controller.text();
        assert!(text.selection_start() <= text.selection_end());
        assert!(text.selection_end() <= text.len());
        assert!(text.value().is_char_boundary(text.selection_start()));
        assert!(text.value().is_char_boundary(text.selection_end()));
        assert!(controller.history().len() <= 16);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use mdpost_core::config::EditorConfig;
use mdpost_web::{EditorSession, parse_host_event};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if json.len() > 4096 {
        return;
    }

    // The parser must never panic regardless of input.
    let _ = parse_host_event(json);

    // Neither may a session fed the same line, whatever it decodes to.
    let mut session = EditorSession::new("- item\n  nested", &EditorConfig::default());
    let _ = session.push_encoded(json, 0.0);
    let _ = session.tick(5_000.0);
    let text = session.text();
    assert!(text.selection_start() <= text.selection_end());
    assert!(text.selection_end() <= text.len());
});

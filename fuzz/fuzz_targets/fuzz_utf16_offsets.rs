#![no_main]

use libfuzzer_sys::fuzz_target;
use mdpost_web::utf16::{byte_from_utf16, utf16_from_byte};

fuzz_target!(|input: (String, u32, usize)| {
    let (text, units, byte) = input;
    if text.len() > 2048 {
        return;
    }

    let b = byte_from_utf16(&text, units);
    assert!(b <= text.len());
    assert!(text.is_char_boundary(b));

    let u = utf16_from_byte(&text, byte);
    assert_eq!(byte_from_utf16(&text, u), mdpost_core::text::floor_char_boundary(&text, byte));
});

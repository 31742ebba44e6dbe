#![forbid(unsafe_code)]

//! UTF-8 byte offset <-> UTF-16 code unit conversion.
//!
//! The DOM reports `selectionStart`/`selectionEnd` in UTF-16 code units; the
//! editor core works in UTF-8 byte offsets. Both directions clamp to the
//! string and never panic. An offset that falls inside a character (a
//! surrogate pair on the UTF-16 side, a multi-byte sequence on the UTF-8
//! side) snaps to the start of that character.

use mdpost_core::text::floor_char_boundary;

/// Convert a byte offset into `text` to UTF-16 code units.
#[must_use]
pub fn utf16_from_byte(text: &str, byte: usize) -> u32 {
    let end = floor_char_boundary(text, byte);
    let units: usize = text[..end].chars().map(char::len_utf16).sum();
    u32::try_from(units).unwrap_or(u32::MAX)
}

/// Convert a UTF-16 code unit offset into a byte offset into `text`.
#[must_use]
pub fn byte_from_utf16(text: &str, units: u32) -> usize {
    let target = units as usize;
    let mut offset = 0usize;
    for (byte_pos, ch) in text.char_indices() {
        let next = offset + ch.len_utf16();
        if next > target {
            return byte_pos;
        }
        offset = next;
    }
    text.len()
}

/// Convert a UTF-16 selection range to byte offsets.
#[must_use]
pub fn byte_range_from_utf16(text: &str, start: u32, end: u32) -> (usize, usize) {
    (byte_from_utf16(text, start), byte_from_utf16(text, end))
}

/// Convert a byte selection range to UTF-16 code units.
#[must_use]
pub fn utf16_range_from_bytes(text: &str, start: usize, end: usize) -> (u32, u32) {
    (utf16_from_byte(text, start), utf16_from_byte(text, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        assert_eq!(utf16_from_byte("hello", 3), 3);
        assert_eq!(byte_from_utf16("hello", 3), 3);
    }

    #[test]
    fn two_byte_chars_are_one_unit() {
        // "é" is 2 bytes, 1 unit.
        assert_eq!(utf16_from_byte("aéb", 3), 2);
        assert_eq!(byte_from_utf16("aéb", 2), 3);
    }

    #[test]
    fn astral_chars_are_two_units() {
        // "😀" is 4 bytes, 2 units.
        let s = "a😀b";
        assert_eq!(utf16_from_byte(s, 5), 3);
        assert_eq!(byte_from_utf16(s, 3), 5);
    }

    #[test]
    fn inside_surrogate_pair_snaps_to_char_start() {
        assert_eq!(byte_from_utf16("a😀b", 2), 1);
    }

    #[test]
    fn inside_utf8_sequence_snaps_down() {
        assert_eq!(utf16_from_byte("a😀b", 3), 1);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(byte_from_utf16("abc", 99), 3);
        assert_eq!(utf16_from_byte("abc", 99), 3);
        assert_eq!(byte_from_utf16("", 1), 0);
    }

    #[test]
    fn ranges_convert_both_ends() {
        let s = "é😀x";
        assert_eq!(byte_range_from_utf16(s, 1, 3), (2, 6));
        assert_eq!(utf16_range_from_bytes(s, 2, 6), (1, 3));
    }
}

#![forbid(unsafe_code)]

//! Property tests for UTF-16 offset mapping.

use proptest::prelude::*;

use mdpost_web::utf16::{byte_from_utf16, utf16_from_byte};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn char_boundaries_round_trip(s in "\\PC{0,24}") {
        for (byte, _) in s.char_indices().chain(std::iter::once((s.len(), ' '))) {
            let units = utf16_from_byte(&s, byte);
            prop_assert_eq!(byte_from_utf16(&s, units), byte);
        }
    }

    #[test]
    fn any_unit_offset_lands_on_char_boundary(s in "\\PC{0,24}", units in 0u32..64) {
        let byte = byte_from_utf16(&s, units);
        prop_assert!(byte <= s.len());
        prop_assert!(s.is_char_boundary(byte));
        prop_assert!(utf16_from_byte(&s, byte) <= units);
    }

    #[test]
    fn full_length_matches_encode_utf16(s in "\\PC{0,24}") {
        prop_assert_eq!(utf16_from_byte(&s, s.len()) as usize, s.encode_utf16().count());
    }
}

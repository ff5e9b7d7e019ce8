//! Windows-1252 fallback table.
//!
//! Windows-1252 agrees with Latin-1 everywhere except 0x80–0x9F, where it
//! places punctuation and symbols instead of C1 control codes. Only that
//! range is stored; every other byte decodes to the code point of the same
//! value.

/// Code points for bytes 0x80–0x9F. `None` marks the five slots Windows-1252
/// leaves unassigned.
static CONTROL_RANGE: [Option<char>; 32] = [
    Some('\u{20AC}'), // 0x80 €
    None,             // 0x81
    Some('\u{201A}'), // 0x82 ‚
    Some('\u{0192}'), // 0x83 ƒ
    Some('\u{201E}'), // 0x84 „
    Some('\u{2026}'), // 0x85 …
    Some('\u{2020}'), // 0x86 †
    Some('\u{2021}'), // 0x87 ‡
    Some('\u{02C6}'), // 0x88 ˆ
    Some('\u{2030}'), // 0x89 ‰
    Some('\u{0160}'), // 0x8A Š
    Some('\u{2039}'), // 0x8B ‹
    Some('\u{0152}'), // 0x8C Œ
    None,             // 0x8D
    Some('\u{017D}'), // 0x8E Ž
    None,             // 0x8F
    None,             // 0x90
    Some('\u{2018}'), // 0x91 ‘
    Some('\u{2019}'), // 0x92 ’
    Some('\u{201C}'), // 0x93 “
    Some('\u{201D}'), // 0x94 ”
    Some('\u{2022}'), // 0x95 •
    Some('\u{2013}'), // 0x96 –
    Some('\u{2014}'), // 0x97 —
    Some('\u{02DC}'), // 0x98 ˜
    Some('\u{2122}'), // 0x99 ™
    Some('\u{0161}'), // 0x9A š
    Some('\u{203A}'), // 0x9B ›
    Some('\u{0153}'), // 0x9C œ
    None,             // 0x9D
    Some('\u{017E}'), // 0x9E ž
    Some('\u{0178}'), // 0x9F Ÿ
];

/// Looks up `byte` in the Windows-1252 control range.
///
/// Returns `None` for bytes outside 0x80–0x9F and for the unassigned slots
/// inside it.
#[must_use]
#[inline]
pub fn windows_1252(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => CONTROL_RANGE[usize::from(byte - 0x80)],
        _ => None,
    }
}

/// Decodes a single orphaned byte: Windows-1252 where assigned, otherwise the
/// Latin-1 code point with the same value.
///
/// ```rust
/// use textmend::decode_fallback;
///
/// assert_eq!(decode_fallback(0x97), '—');
/// assert_eq!(decode_fallback(0xE9), 'é');
/// assert_eq!(decode_fallback(0x81), '\u{81}');
/// ```
#[must_use]
#[inline]
pub fn decode_fallback(byte: u8) -> char {
    windows_1252(byte).unwrap_or(char::from(byte))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0x80, '€')]
    #[case(0x85, '…')]
    #[case(0x91, '‘')]
    #[case(0x92, '’')]
    #[case(0x93, '“')]
    #[case(0x94, '”')]
    #[case(0x96, '–')]
    #[case(0x97, '—')]
    #[case(0x99, '™')]
    #[case(0x9F, 'Ÿ')]
    fn assigned_slots(#[case] byte: u8, #[case] expected: char) {
        assert_eq!(windows_1252(byte), Some(expected));
        assert_eq!(decode_fallback(byte), expected);
    }

    #[rstest]
    #[case(0x81)]
    #[case(0x8D)]
    #[case(0x8F)]
    #[case(0x90)]
    #[case(0x9D)]
    fn unassigned_slots_fall_back_to_latin1(#[case] byte: u8) {
        assert_eq!(windows_1252(byte), None);
        assert_eq!(u32::from(decode_fallback(byte)), u32::from(byte));
    }

    #[test]
    fn outside_control_range_is_latin1() {
        for byte in (0x00..0x80).chain(0xA0..=0xFF) {
            assert_eq!(windows_1252(byte), None);
            assert_eq!(u32::from(decode_fallback(byte)), u32::from(byte));
        }
        assert_eq!(decode_fallback(0xA9), '©');
        assert_eq!(decode_fallback(0xAE), '®');
    }

    #[test]
    fn twenty_seven_assignments() {
        assert_eq!(CONTROL_RANGE.iter().flatten().count(), 27);
    }
}

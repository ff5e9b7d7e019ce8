//! Encoding repair: turn any byte sequence into valid UTF-8.
//!
//! Valid UTF-8 is copied through; every byte the [grammar](crate::grammar)
//! rejects is decoded on its own through the Windows-1252 / Latin-1
//! [fallback](crate::decode_fallback). Because the grammar is consulted again
//! after each fallback byte, a single stray byte in the middle of a word never
//! swallows the valid text after it.
//!
//! Literal byte-order marks and replacement characters are noise here, not
//! data: they are dropped before repair.

use std::borrow::Cow;

use bstr::ByteSlice;

use crate::{
    grammar::{self, Stop},
    table::decode_fallback,
};

/// UTF-8 encoding of U+FEFF.
const BYTE_ORDER_MARK: &[u8; 3] = b"\xEF\xBB\xBF";
/// UTF-8 encoding of U+FFFD.
const REPLACEMENT_CHARACTER: &[u8; 3] = b"\xEF\xBF\xBD";

/// Removes every byte-order mark and replacement character sequence.
///
/// Removal is repeated until neither sequence remains, so sequences that only
/// form once an inner one is removed are dropped as well.
///
/// ```rust
/// use textmend::strip_noise;
///
/// assert_eq!(&*strip_noise(b"foo \xef\xbb\xbfbar"), b"foo bar");
/// assert_eq!(&*strip_noise(b"\xef\xbb\xef\xbf\xbd\xbf!"), b"!");
/// ```
#[must_use]
pub fn strip_noise(input: &[u8]) -> Cow<'_, [u8]> {
    if input.find(BYTE_ORDER_MARK).is_none() && input.find(REPLACEMENT_CHARACTER).is_none() {
        return Cow::Borrowed(input);
    }

    // Reduce like a stack: a sequence can only complete at the end of what
    // has been kept so far.
    let mut out = Vec::with_capacity(input.len());
    for &byte in input {
        out.push(byte);
        if out.ends_with(BYTE_ORDER_MARK) || out.ends_with(REPLACEMENT_CHARACTER) {
            out.truncate(out.len() - 3);
        }
    }
    log::trace!("stripped {} noise bytes", input.len() - out.len());
    Cow::Owned(out)
}

/// Length of the trailing run of `input` that more bytes could still turn
/// into noise.
///
/// The run is a chain of partial noise sequences (`EF`, `EF BB`, `EF BF`):
/// once the last one completes and is stripped, the one before it becomes the
/// end of the buffer again. `input` is expected to be stripped already.
pub(crate) fn partial_noise_len(input: &[u8]) -> usize {
    let mut end = input.len();
    loop {
        let rest = &input[..end];
        if rest.ends_with(b"\xEF\xBB") || rest.ends_with(b"\xEF\xBF") {
            end -= 2;
        } else if rest.ends_with(b"\xEF") {
            end -= 1;
        } else {
            return input.len() - end;
        }
    }
}

/// Repairs `input` into valid UTF-8.
///
/// Returns the input borrowed when it is already valid and free of noise.
///
/// ```rust
/// use textmend::repair;
///
/// assert_eq!(repair(b"M\xe9nage \xe0 Trois"), "Ménage à Trois");
/// assert_eq!(repair(b"\x93Quoted String\x94"), "“Quoted String”");
/// assert_eq!(repair("r\u{e9}sum\u{e9}".as_bytes()), "résumé");
/// ```
#[must_use]
pub fn repair(input: &[u8]) -> Cow<'_, str> {
    match strip_noise(input) {
        Cow::Borrowed(bytes) => {
            if let Some(text) = as_valid_str(bytes) {
                return Cow::Borrowed(text);
            }
            let mut out = String::with_capacity(bytes.len() + bytes.len() / 2);
            repair_into(bytes, &mut out, true);
            Cow::Owned(out)
        }
        Cow::Owned(bytes) => {
            if as_valid_str(&bytes).is_some() {
                // SAFETY: `as_valid_str` accepted every byte.
                return Cow::Owned(unsafe { String::from_utf8_unchecked(bytes) });
            }
            let mut out = String::with_capacity(bytes.len() + bytes.len() / 2);
            repair_into(&bytes, &mut out, true);
            Cow::Owned(out)
        }
    }
}

/// Views `bytes` as text if they need no repair: pure ASCII, or entirely
/// matched by the grammar.
fn as_valid_str(bytes: &[u8]) -> Option<&str> {
    if !bytes.is_ascii() && grammar::scan(bytes).stop != Stop::End {
        return None;
    }
    // SAFETY: ASCII is UTF-8, and the grammar only matches well-formed
    // sequences.
    Some(unsafe { core::str::from_utf8_unchecked(bytes) })
}

/// Repairs `input` onto the end of `out` and returns the number of input
/// bytes consumed.
///
/// With `at_end` unset, a truncated sequence at the very end of `input` is
/// left unconsumed so the caller can retry once more bytes arrive. With
/// `at_end` set every byte is consumed.
///
/// `input` is expected to be free of noise already (see [`strip_noise`]).
pub(crate) fn repair_into(input: &[u8], out: &mut String, at_end: bool) -> usize {
    let mut pos = 0;
    let mut fallbacks = 0usize;
    while pos < input.len() {
        let rest = &input[pos..];
        let scan = grammar::scan(rest);
        // SAFETY: the grammar only matches well-formed sequences.
        out.push_str(unsafe { core::str::from_utf8_unchecked(&rest[..scan.valid_len]) });
        pos += scan.valid_len;

        match scan.stop {
            Stop::End => break,
            Stop::Truncated if !at_end => break,
            Stop::Truncated | Stop::Invalid => {
                out.push(decode_fallback(input[pos]));
                pos += 1;
                fallbacks += 1;
            }
        }
    }
    if fallbacks > 0 {
        log::trace!("decoded {fallbacks} orphaned bytes as Windows-1252/Latin-1");
    }
    pos
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::em_dash(b"\x97", "—")]
    #[case::smart_quotes(b"\x93Quoted String\x94", "“Quoted String”")]
    #[case::latin1(b"\xe9", "é")]
    #[case::latin1_within_words(b"M\xe9nage \xe0 Trois for", "Ménage à Trois for")]
    #[case::mixed_with_valid_utf8(b"r\xc3\xa9sum\xe9", "résumé")]
    #[case::replacement_character(b"foo \xef\xbf\xbdbar", "foo bar")]
    #[case::byte_order_mark(b"foo \xef\xbb\xbfbar", "foo bar")]
    #[case::leading_byte_order_mark(b"\xef\xbb\xbfName,Value", "Name,Value")]
    #[case::repeated_noise(b"\xef\xbf\xbd\xef\xbf\xbd\xef\xbb\xbfx", "x")]
    #[case::nested_noise(b"\xef\xbb\xef\xbf\xbd\xbfx", "x")]
    #[case::trademark_copyright_registered(b"\x99 \xa9 \xae", "™ © ®")]
    #[case::capital_a_circumflex(b"\xc2", "Â")]
    #[case::cut_euro_at_end(b"price \xe2\x82", "price â‚")]
    #[case::lead_then_ascii(b"\xe2x", "âx")]
    #[case::unassigned_windows_1252(b"\x81", "\u{81}")]
    #[case::surrogate_bytes(b"\xed\xa0\x80", "í\u{a0}€")]
    #[case::noncharacter(b"\xef\xbf\xbf", "ï¿¿")]
    #[case::lone_continuation_then_valid(b"\x80\xc3\xa9", "€é")]
    fn repairs(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(repair(input), expected);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"plain ascii, even \x06 controls\r\n")]
    #[case("déjà vu — “quoted” 🦀".as_bytes())]
    fn valid_input_is_borrowed(#[case] input: &[u8]) {
        let out = repair(input);
        assert!(matches!(out, Cow::Borrowed(_)), "{:?}", input.as_bstr());
        assert_eq!(out.as_bytes(), input);
    }

    #[test]
    fn noise_only_input_becomes_empty() {
        assert_eq!(repair(b"\xef\xbb\xbf"), "");
        assert_eq!(repair(b"\xef\xbf\xbd\xef\xbf\xbd"), "");
    }

    #[test]
    fn repair_is_idempotent_on_examples() {
        for input in [
            &b"\x99 \xa9 \xae"[..],
            b"\xe2\x82",
            b"\xef\xbf\xbe\xed\xbf\xbf",
            b"Foo\nBar\x99",
        ] {
            let once = repair(input);
            let twice = repair(once.as_bytes());
            assert!(matches!(twice, Cow::Borrowed(_)));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn repair_into_leaves_truncated_tail() {
        let mut out = String::new();
        let consumed = repair_into(b"a\x97b\xf0\x9f\xa6", &mut out, false);
        assert_eq!(consumed, 3);
        assert_eq!(out, "a—b");

        let consumed = repair_into(b"\xf0\x9f\xa6\x80", &mut out, false);
        assert_eq!(consumed, 4);
        assert_eq!(out, "a—b🦀");
    }

    #[test]
    fn repair_into_consumes_truncated_tail_at_end() {
        let mut out = String::new();
        let consumed = repair_into(b"a\xf0\x9f", &mut out, true);
        assert_eq!(consumed, 3);
        assert_eq!(out, "aðŸ");
    }

    #[rstest]
    #[case(b"", 0)]
    #[case(b"abc", 0)]
    #[case(b"abc\xef", 1)]
    #[case(b"abc\xef\xbb", 2)]
    #[case(b"abc\xef\xbf", 2)]
    #[case(b"abc\xef\xbc", 0)]
    #[case(b"\xef\xbb\xef\xbf", 4)]
    #[case(b"\xef\xef\xef", 3)]
    #[case(b"\xbb\xef", 1)]
    fn partial_noise_tail(#[case] input: &[u8], #[case] expected: usize) {
        assert_eq!(partial_noise_len(input), expected);
    }

    #[test]
    fn strip_noise_borrows_clean_input() {
        assert!(matches!(strip_noise(b"clean \xe9"), Cow::Borrowed(_)));
    }
}

use std::borrow::Cow;

use bstr::ByteSlice;
use quickcheck::QuickCheck;

use super::{arbitrary::MixedBytes, quickcheck_tests};
use crate::{normalize, repair, strip_noise};

/// Property: repaired text is free of noise, and repairing it again changes
/// nothing and allocates nothing.
#[test]
fn repair_is_idempotent() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedBytes) -> bool {
        let once = repair(&input.0);
        let twice = repair(once.as_bytes());
        !once.contains(['\u{FEFF}', '\u{FFFD}'])
            && matches!(twice, Cow::Borrowed(_))
            && twice == once
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(MixedBytes) -> bool);
}

/// Property: ASCII input comes back unchanged and borrowed.
#[test]
fn repair_preserves_ascii() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let ascii: Vec<u8> = bytes.into_iter().map(|b| b & 0x7F).collect();
        matches!(repair(&ascii), Cow::Borrowed(text) if text.as_bytes() == ascii)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: valid UTF-8 without noise or non-characters passes through.
#[test]
fn repair_passes_valid_text_through() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        if text.contains(['\u{FEFF}', '\u{FFFD}', '\u{FFFE}', '\u{FFFF}']) {
            return true;
        }
        matches!(repair(text.as_bytes()), Cow::Borrowed(out) if out == text)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: no noise sequence survives stripping, however it was nested.
#[test]
fn strip_noise_leaves_no_noise() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedBytes) -> bool {
        let stripped = strip_noise(&input.0);
        stripped.find(b"\xEF\xBB\xBF").is_none() && stripped.find(b"\xEF\xBF\xBD").is_none()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(MixedBytes) -> bool);
}

/// Property: normalized text carries no control characters other than line
/// feeds, and line feeds only when asked to keep them.
#[test]
fn normalize_strips_controls() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedBytes, preserve_newlines: bool) -> bool {
        let text = normalize(&repair(&input.0), preserve_newlines);
        text.chars().all(|c| c == '\n' || u32::from(c) >= 0x20)
            && (preserve_newlines || !text.contains('\n'))
            && text.trim_matches(|c: char| c.is_ascii_whitespace()) == text
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(MixedBytes, bool) -> bool);
}

//! Whitespace, control-character and line-ending normalization.

use std::{borrow::Cow, sync::LazyLock};

use memchr::memchr2;
use regex::{Captures, Regex};

// Runs of ASCII whitespace, no-break spaces and stray replacement characters.
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[\t\n\x0C\r ]|\x{A0}|\x{FFFD})+")
        .expect("WHITESPACE_RUN: hardcoded regex is valid")
});

// Every control character below 0x20 except line feed.
static CONTROL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x09\x0B-\x1F]+").expect("CONTROL: hardcoded regex is valid")
});

/// Collapses whitespace and strips control characters.
///
/// Vertical tabs are removed outright. Every run of whitespace, no-break
/// spaces (U+00A0) or replacement characters (U+FFFD) becomes a single space,
/// or a single line feed when `preserve_newlines` is set and the run contains
/// a carriage return or line feed. Remaining control characters other than
/// line feed are dropped and the result is trimmed.
///
/// The input is expected to be repaired already (see [`repair`](crate::repair)).
///
/// ```rust
/// use textmend::normalize;
///
/// assert_eq!(normalize("  foo \n\t\tbar  \n  ", false), "foo bar");
/// assert_eq!(normalize("  foo \n\t\tbar  \n  ", true), "foo\nbar");
/// assert_eq!(normalize("foo\x06bar", false), "foobar");
/// ```
#[must_use]
pub fn normalize(text: &str, preserve_newlines: bool) -> String {
    let text: Cow<'_, str> = if text.contains('\x0B') {
        Cow::Owned(text.replace('\x0B', ""))
    } else {
        Cow::Borrowed(text)
    };

    let collapsed = WHITESPACE_RUN.replace_all(&text, |caps: &Captures<'_>| {
        if preserve_newlines && caps[0].contains(['\r', '\n']) {
            "\n"
        } else {
            " "
        }
    });
    let stripped = CONTROL.replace_all(&collapsed, "");

    stripped
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .to_owned()
}

/// Rewrites `\r\n`, bare `\r` and bare `\n` to a single `\n`.
///
/// Returns the input borrowed when it contains no carriage return.
///
/// ```rust
/// use textmend::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
/// assert_eq!(normalize_line_endings("a\n\r\nb"), "a\n\nb");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    if memchr::memchr(b'\r', bytes).is_none() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut start = 0;
    while let Some(i) = memchr2(b'\r', b'\n', &bytes[start..]).map(|i| start + i) {
        out.push_str(&text[start..i]);
        out.push('\n');
        start = if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            i + 2
        } else {
            i + 1
        };
    }
    out.push_str(&text[start..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::removing_newlines("  foo \n\t\tbar  \n  ", false, "foo bar")]
    #[case::keeping_newlines("  foo \n\t\tbar  \n  ", true, "foo\nbar")]
    #[case::multiple_newlines_together("foo\n\n\n\nbar\t\n\t\n\tbaz", true, "foo\nbar\nbaz")]
    #[case::no_break_space("foo\u{a0}bar", false, "foo bar")]
    #[case::replacement_character("foo\u{fffd}bar", false, "foo bar")]
    #[case::carriage_return_removed("foo\rbar", false, "foo bar")]
    #[case::carriage_return_kept("foo\rbar", true, "foo\nbar")]
    #[case::control_character("foo\x06bar", false, "foobar")]
    #[case::control_character_keeping_newlines("foo\x06bar\n  baz", true, "foobar\nbaz")]
    #[case::substitute_character("\x73\x68\x65\x1a\x73", false, "shes")]
    #[case::vertical_tab("foo\x0bbar", false, "foobar")]
    #[case::vertical_tab_between_spaces("foo \x0b bar", false, "foo bar")]
    #[case::form_feed("foo\x0cbar", false, "foo bar")]
    #[case::tab("foo\tbar", true, "foo bar")]
    #[case::only_whitespace(" \r\n\t ", true, "")]
    #[case::empty("", false, "")]
    #[case::unicode_untouched("façade — “ok”", false, "façade — “ok”")]
    #[case::ideographic_space_is_text("a\u{3000}b", false, "a\u{3000}b")]
    fn normalizes(#[case] input: &str, #[case] preserve_newlines: bool, #[case] expected: &str) {
        assert_eq!(normalize(input, preserve_newlines), expected);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(" a \r\n\r\n b\x01\x0b c ", true);
        assert_eq!(once, "a\nb c");
        assert_eq!(normalize(&once, true), once);
    }

    #[rstest]
    #[case("no breaks", "no breaks")]
    #[case("unix\nonly\n", "unix\nonly\n")]
    #[case("dos\r\nline\r\n", "dos\nline\n")]
    #[case("mac\rline\r", "mac\nline\n")]
    #[case("mixed\r\n\r\r\nend", "mixed\n\n\nend")]
    #[case("\n\r", "\n\n")]
    #[case("\r", "\n")]
    fn normalizes_line_endings(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_line_endings(input), expected);
    }

    #[quickcheck_macros::quickcheck]
    fn line_endings_leave_no_carriage_return(text: String) -> bool {
        let out = normalize_line_endings(&text);
        let line_endings = text.replace("\r\n", "\n").matches(['\r', '\n']).count();
        !out.contains('\r') && out.matches('\n').count() == line_endings
    }

    #[test]
    fn line_endings_borrow_without_carriage_return() {
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }
}

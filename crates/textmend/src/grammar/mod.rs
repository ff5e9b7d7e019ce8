//! Grammar: table-driven UTF-8 sequence classifier.
//!
//! Each [`SequenceClass`] pairs a lead-byte range with the ranges its
//! continuation bytes must fall in. Together the classes partition exactly the
//! well-formed UTF-8 byte space, minus the two non-characters U+FFFE and
//! U+FFFF: overlong forms, surrogates and code points above U+10FFFF belong to
//! no class. Classes never overlap, so any byte run has one interpretation and
//! the scanner never backtracks.
//!
//! The scanner reports spans by offset. It never consumes a sequence that is
//! cut short by the end of the buffer; it reports it as
//! [`Stop::Truncated`] so that a streaming caller can wait for more input.

/// A lead-byte range and the ranges its continuation bytes must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceClass {
    /// Inclusive range of lead bytes.
    pub lead: (u8, u8),
    /// Inclusive ranges, one per continuation byte.
    pub tail: &'static [(u8, u8)],
}

impl SequenceClass {
    /// Total sequence length in bytes.
    #[must_use]
    #[inline]
    pub const fn sequence_len(&self) -> usize {
        1 + self.tail.len()
    }

    #[inline]
    const fn accepts_lead(&self, byte: u8) -> bool {
        self.lead.0 <= byte && byte <= self.lead.1
    }
}

const CONT: (u8, u8) = (0x80, 0xBF);

/// The valid UTF-8 sequence classes, ordered by lead byte.
pub static CLASSES: [SequenceClass; 11] = [
    // ASCII
    SequenceClass { lead: (0x00, 0x7F), tail: &[] },
    // non-overlong 2-byte
    SequenceClass { lead: (0xC2, 0xDF), tail: &[CONT] },
    // 3-byte, excluding overlongs
    SequenceClass { lead: (0xE0, 0xE0), tail: &[(0xA0, 0xBF), CONT] },
    SequenceClass { lead: (0xE1, 0xEC), tail: &[CONT, CONT] },
    // 3-byte, excluding surrogates
    SequenceClass { lead: (0xED, 0xED), tail: &[(0x80, 0x9F), CONT] },
    SequenceClass { lead: (0xEE, 0xEE), tail: &[CONT, CONT] },
    // 3-byte, excluding U+FFFE and U+FFFF
    SequenceClass { lead: (0xEF, 0xEF), tail: &[(0x80, 0xBE), CONT] },
    SequenceClass { lead: (0xEF, 0xEF), tail: &[(0xBF, 0xBF), (0x80, 0xBD)] },
    // planes 1-3
    SequenceClass { lead: (0xF0, 0xF0), tail: &[(0x90, 0xBF), CONT, CONT] },
    // planes 4-15
    SequenceClass { lead: (0xF1, 0xF3), tail: &[CONT, CONT, CONT] },
    // plane 16
    SequenceClass { lead: (0xF4, 0xF4), tail: &[(0x80, 0x8F), CONT, CONT] },
];

/// Longest sequence any class describes.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// Outcome of classifying the sequence at the start of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// A complete sequence of this many bytes.
    Sequence(usize),
    /// Every byte present fits a class, but the buffer ends before the
    /// sequence is complete. An empty buffer is also truncated.
    Truncated,
    /// The first byte cannot start a sequence, or a continuation byte is out
    /// of range.
    Invalid,
}

/// Classifies the sequence at the start of `bytes`.
#[must_use]
pub fn match_sequence(bytes: &[u8]) -> Match {
    let Some(&lead) = bytes.first() else {
        return Match::Truncated;
    };
    if lead < 0x80 {
        return Match::Sequence(1);
    }

    'classes: for class in CLASSES.iter().filter(|c| c.accepts_lead(lead)) {
        for (i, &(lo, hi)) in class.tail.iter().enumerate() {
            let Some(&b) = bytes.get(1 + i) else {
                return Match::Truncated;
            };
            if b < lo || b > hi {
                continue 'classes;
            }
        }
        return Match::Sequence(class.sequence_len());
    }
    Match::Invalid
}

/// Why [`scan`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// The whole buffer is valid.
    End,
    /// The byte at `valid_len` starts no valid sequence.
    Invalid,
    /// The bytes from `valid_len` to the end are a proper prefix of a valid
    /// sequence.
    Truncated,
}

/// The longest valid prefix of a buffer and what follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    /// Length of the valid prefix, always on a sequence boundary.
    pub valid_len: usize,
    /// What stopped the scan.
    pub stop: Stop,
}

/// Greedily matches complete sequences from the start of `bytes`.
#[must_use]
pub fn scan(bytes: &[u8]) -> Scan {
    let mut pos = 0;
    loop {
        // ASCII runs are the common case.
        while pos < bytes.len() && bytes[pos] < 0x80 {
            pos += 1;
        }
        if pos == bytes.len() {
            return Scan {
                valid_len: pos,
                stop: Stop::End,
            };
        }
        match match_sequence(&bytes[pos..]) {
            Match::Sequence(len) => pos += len,
            Match::Truncated => {
                return Scan {
                    valid_len: pos,
                    stop: Stop::Truncated,
                };
            }
            Match::Invalid => {
                return Scan {
                    valid_len: pos,
                    stop: Stop::Invalid,
                };
            }
        }
    }
}

/// Length of the longest prefix of `bytes` made of complete, valid sequences.
///
/// ```rust
/// use textmend::grammar::valid_prefix_len;
///
/// assert_eq!(valid_prefix_len(b"abc"), 3);
/// assert_eq!(valid_prefix_len("r\u{e9}sum".as_bytes()), 6);
/// assert_eq!(valid_prefix_len(b"r\xe9sum"), 1);
/// // a cut-off euro sign is not consumed
/// assert_eq!(valid_prefix_len(b"a\xe2\x82"), 1);
/// ```
#[must_use]
#[inline]
pub fn valid_prefix_len(bytes: &[u8]) -> usize {
    scan(bytes).valid_len
}

/// Returns `true` if `byte` can begin a multi-byte sequence.
#[must_use]
#[inline]
pub fn is_lead_byte(byte: u8) -> bool {
    matches!(byte, 0xC2..=0xF4)
}

//! Streaming filter: incremental repair over chunked input.
//!
//! Overview
//! - [`StreamFilter`] is the push-style core. Each [`feed`] appends raw bytes
//!   to a pending buffer, repairs everything that can no longer change, and
//!   returns it with line endings normalized. [`finish`] flushes the rest.
//! - [`RepairStream`] drives a [`StreamFilter`] from a pull-style
//!   [`ChunkSource`] and yields repaired text as an iterator, or as
//!   `std::io::Read` for `io::Error` sources.
//!
//! Hold-back rules
//! - The final line ending (`\r`, `\n` or `\r\n`, at most two bytes) is held
//!   until the next chunk, so a `\r\n` split across a read boundary is still
//!   a single line ending. Line endings before it are emitted.
//! - A trailing truncated UTF-8 sequence (at most three bytes) is held until
//!   the next chunk unless [`FilterOptions::split_incomplete_sequences`] is
//!   set.
//! - Noise (byte-order marks, replacement characters) is stripped from the
//!   pending buffer before repair. A trailing chain of partial noise
//!   sequences is held as well, since the next chunk may complete it.
//!
//! Invariants
//! - With default options, concatenating every emitted piece yields exactly
//!   `normalize_line_endings(repair(whole_input))`, whatever the chunking.
//! - The pending buffer only ever holds raw, unrepaired bytes.
//!
//! [`feed`]: StreamFilter::feed
//! [`finish`]: StreamFilter::finish

mod reader;
mod source;

use std::borrow::Cow;

pub use reader::RepairStream;
pub use source::{ChunkSource, DEFAULT_CHUNK_SIZE, IoSource, IterSource};

use crate::{
    grammar::MAX_SEQUENCE_LEN,
    normalize::normalize_line_endings,
    options::FilterOptions,
    repair::{partial_noise_len, repair_into, strip_noise},
};

/// Incremental repair filter.
///
/// Typical loop:
/// ```rust
/// use textmend::{FilterOptions, StreamFilter};
///
/// let mut filter = StreamFilter::new(FilterOptions::default());
/// let mut out = String::new();
/// for chunk in [&b"Em dash,\x97\r"[..], b"\nSmart quotes,\x93Q\x94"] {
///     if let Some(text) = filter.feed(chunk) {
///         out.push_str(&text);
///     }
/// }
/// out.push_str(&filter.finish());
/// assert_eq!(out, "Em dash,—\nSmart quotes,“Q”");
/// ```
#[derive(Debug, Default, Clone)]
pub struct StreamFilter {
    pending: Vec<u8>,
    options: FilterOptions,
}

impl StreamFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new(options: FilterOptions) -> Self {
        Self {
            pending: Vec::new(),
            options,
        }
    }

    /// The options this filter was created with.
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        self.options
    }

    /// Number of raw bytes held back, waiting for more input.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feeds a chunk of raw bytes.
    ///
    /// Returns the repaired text that is safe to emit, or `None` when
    /// everything is held back.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);
        self.strip_pending_noise();

        let split = self.options.split_incomplete_sequences;
        let ready = if split {
            self.pending.len()
        } else {
            // Every partial noise sequence starts with a lead byte, so the cut
            // falls on a sequence boundary.
            self.pending.len() - partial_noise_len(&self.pending)
        };

        let mut text = String::with_capacity(ready);
        let mut consumed = repair_into(&self.pending[..ready], &mut text, split);
        debug_assert!(ready - consumed < MAX_SEQUENCE_LEN);

        if !self.options.preserve_line_endings {
            // Whatever follows may be a `\n`, or noise that vanishes in front
            // of one. Earlier line endings can no longer merge.
            let held = if text.ends_with("\r\n") {
                2
            } else {
                usize::from(text.ends_with(['\r', '\n']))
            };
            // Line-ending bytes repair to themselves, so the raw and repaired
            // tails have the same length.
            consumed -= held;
            text.truncate(text.len() - held);
        }

        self.pending.drain(..consumed);
        if !self.pending.is_empty() {
            log::trace!("holding back {} bytes until the next chunk", self.pending.len());
        }
        if text.is_empty() {
            return None;
        }
        Some(self.finalize(text))
    }

    /// Signals end of input and returns whatever is still pending, repaired.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.strip_pending_noise();
        let mut text = String::with_capacity(self.pending.len());
        repair_into(&self.pending, &mut text, true);
        self.finalize(text)
    }

    fn strip_pending_noise(&mut self) {
        if let Cow::Owned(stripped) = strip_noise(&self.pending) {
            self.pending = stripped;
        }
    }

    fn finalize(&self, text: String) -> String {
        if self.options.preserve_line_endings {
            return text;
        }
        match normalize_line_endings(&text) {
            Cow::Borrowed(_) => text,
            Cow::Owned(normalized) => normalized,
        }
    }
}

/// Configuration options for [`StreamFilter`](crate::StreamFilter) and
/// [`RepairStream`](crate::RepairStream).
///
/// # Examples
///
/// ```rust
/// use textmend::{FilterOptions, StreamFilter};
///
/// let filter = StreamFilter::new(FilterOptions {
///     preserve_line_endings: true,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterOptions {
    /// Whether to repair a multi-byte sequence that is cut off at the end of a
    /// chunk right away instead of waiting for the next chunk.
    ///
    /// By default the filter holds back up to three trailing bytes that are
    /// a valid but incomplete UTF-8 prefix, so streamed output is identical to
    /// repairing the whole input at once. When `true`, only line endings are
    /// held back, and a sequence split across a read boundary is repaired as
    /// individual Windows-1252 / Latin-1 bytes.
    ///
    /// # Default
    ///
    /// `false`
    pub split_incomplete_sequences: bool,

    /// Whether to leave line endings as they are.
    ///
    /// By default `\r\n`, bare `\r` and bare `\n` are all emitted as `\n`.
    /// When `true`, line-ending bytes are passed through and never held back.
    ///
    /// # Default
    ///
    /// `false`
    pub preserve_line_endings: bool,
}

/// Configuration options for [`Flattener`](crate::Flattener).
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlattenOptions {
    /// Whether to collapse line breaks into spaces in the final text.
    ///
    /// By default block elements, `<br>` and list items produce line breaks,
    /// and line breaks in plain-text input are kept (one per run).
    ///
    /// # Default
    ///
    /// `false`
    pub collapse_newlines: bool,
}

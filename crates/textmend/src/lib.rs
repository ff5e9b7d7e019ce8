//! Repair text of mixed or unknown encoding and flatten markup to plain text.
//!
//! - [`repair`] turns any byte sequence into valid UTF-8. Valid UTF-8 is kept;
//!   every other byte is read as Windows-1252, falling back to Latin-1.
//!   Byte-order marks and replacement characters are dropped.
//! - [`StreamFilter`] and [`RepairStream`] do the same over chunked input,
//!   normalizing line endings to `\n`, with output identical to repairing the
//!   whole input at once.
//! - [`normalize`] collapses whitespace and strips control characters.
//! - [`flatten`] turns HTML-bearing text into plain text, with block elements
//!   and list items on their own lines.
//!
//! ```rust
//! use std::io::Read;
//!
//! assert_eq!(textmend::repair(b"\x93Quoted String\x94"), "“Quoted String”");
//!
//! let mut text = String::new();
//! textmend::RepairStream::from_reader(&b"Em dash,\x97\r\n"[..])
//!     .read_to_string(&mut text)
//!     .unwrap();
//! assert_eq!(text, "Em dash,—\n");
//! ```

mod backend;
mod chunk_utils;
mod error;
mod flatten;
pub mod grammar;
mod normalize;
mod options;
mod repair;
mod stream;
mod table;

#[cfg(test)]
mod tests;

#[cfg(feature = "markup")]
pub use backend::KuchikiBackend;
pub use backend::MarkupBackend;
#[doc(hidden)]
pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use error::FlattenError;
#[cfg(feature = "markup")]
pub use flatten::{flatten, flatten_with_options};
pub use flatten::{Flattener, fix_windows_1252_references};
pub use normalize::{normalize, normalize_line_endings};
pub use options::{FilterOptions, FlattenOptions};
pub use repair::{repair, strip_noise};
pub use stream::{ChunkSource, DEFAULT_CHUNK_SIZE, IoSource, IterSource, RepairStream, StreamFilter};
pub use table::{decode_fallback, windows_1252};

use std::io;

use super::{ChunkSource, IoSource, StreamFilter};
use crate::options::FilterOptions;

/// Repaired text pulled from a [`ChunkSource`].
///
/// Each call to [`next_text`](Self::next_text) reads chunks until the
/// underlying [`StreamFilter`] has something to emit, or the source is
/// exhausted. Source errors are passed through unchanged and the stream can be
/// polled again afterwards.
///
/// With an [`io::Error`] source the stream is itself an [`io::Read`], so it
/// can sit in front of any reader-based consumer:
///
/// ```rust
/// use std::io::{BufRead, BufReader, Cursor};
///
/// use textmend::RepairStream;
///
/// let raw = Cursor::new(b"Name,Value\r\nEm dash,\x97\r\n".to_vec());
/// let lines: Vec<String> = BufReader::new(RepairStream::from_reader(raw))
///     .lines()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines, ["Name,Value", "Em dash,—"]);
/// ```
#[derive(Debug)]
pub struct RepairStream<S> {
    source: S,
    filter: Option<StreamFilter>,
    chunk: Vec<u8>,
    // Text handed out through `io::Read` but not yet copied.
    unread: Vec<u8>,
    unread_pos: usize,
}

impl<S: ChunkSource> RepairStream<S> {
    /// Creates a stream with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, FilterOptions::default())
    }

    /// Creates a stream with the given options.
    pub fn with_options(source: S, options: FilterOptions) -> Self {
        Self {
            source,
            filter: Some(StreamFilter::new(options)),
            chunk: Vec::new(),
            unread: Vec::new(),
            unread_pos: 0,
        }
    }

    /// Returns the next piece of repaired text, or `None` once the source is
    /// exhausted and everything pending has been flushed.
    ///
    /// # Errors
    ///
    /// Returns the source's error if reading a chunk fails.
    pub fn next_text(&mut self) -> Result<Option<String>, S::Error> {
        loop {
            if self.filter.is_none() {
                return Ok(None);
            }
            if self.source.is_eof() {
                let rest = self
                    .filter
                    .take()
                    .map(StreamFilter::finish)
                    .unwrap_or_default();
                return Ok((!rest.is_empty()).then_some(rest));
            }

            self.chunk.clear();
            self.source.read_chunk(&mut self.chunk)?;
            if let Some(text) = self.filter.as_mut().and_then(|f| f.feed(&self.chunk)) {
                return Ok(Some(text));
            }
        }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<R: io::Read> RepairStream<IoSource<R>> {
    /// Creates a stream over `reader` with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::new(IoSource::new(reader))
    }
}

impl<S: ChunkSource> Iterator for RepairStream<S> {
    type Item = Result<String, S::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_text().transpose()
    }
}

impl<S: ChunkSource<Error = io::Error>> io::Read for RepairStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.unread_pos == self.unread.len() {
            match self.next_text()? {
                Some(text) => {
                    self.unread = text.into_bytes();
                    self.unread_pos = 0;
                }
                None => return Ok(0),
            }
        }
        let available = &self.unread[self.unread_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.unread_pos += n;
        Ok(n)
    }
}

use std::{convert::Infallible, io};

/// Read size used by [`IoSource::new`].
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// A pull-style producer of raw byte chunks.
///
/// Implementations append whatever bytes they have to `buf` and report end of
/// input through [`is_eof`](ChunkSource::is_eof). A read that appends nothing
/// is allowed; [`RepairStream`](crate::RepairStream) simply asks again until
/// the source reports end of input.
pub trait ChunkSource {
    /// Error raised by the underlying producer.
    type Error;

    /// Appends the next chunk to `buf`.
    ///
    /// # Errors
    ///
    /// Returns the producer's error; the stream passes it through unchanged.
    fn read_chunk(&mut self, buf: &mut Vec<u8>) -> Result<(), Self::Error>;

    /// Whether the producer has no more bytes to give.
    fn is_eof(&self) -> bool;
}

/// Adapts any [`io::Read`] into a [`ChunkSource`].
///
/// End of input is a read that returns zero bytes. Reads interrupted by a
/// signal are retried.
#[derive(Debug)]
pub struct IoSource<R> {
    reader: R,
    chunk_size: usize,
    eof: bool,
}

impl<R: io::Read> IoSource<R> {
    /// Wraps `reader`, reading [`DEFAULT_CHUNK_SIZE`] bytes at a time.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Wraps `reader`, reading at most `chunk_size` bytes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            reader,
            chunk_size,
            eof: false,
        }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: io::Read> ChunkSource for IoSource<R> {
    type Error = io::Error;

    fn read_chunk(&mut self, buf: &mut Vec<u8>) -> io::Result<()> {
        if self.eof {
            return Ok(());
        }
        let start = buf.len();
        buf.resize(start + self.chunk_size, 0);
        let read = loop {
            match self.reader.read(&mut buf[start..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    buf.truncate(start);
                    return Err(e);
                }
            }
        };
        buf.truncate(start + read);
        if read == 0 {
            self.eof = true;
        }
        Ok(())
    }

    fn is_eof(&self) -> bool {
        self.eof
    }
}

/// Adapts an iterator of byte chunks into a [`ChunkSource`] that never
/// fails.
///
/// One chunk is prefetched, so end of input is known as soon as the last
/// chunk has been handed out.
///
/// ```rust
/// use textmend::{IterSource, RepairStream};
///
/// let chunks = [&b"caf\xc3"[..], b"\xa9 \x93ok\x94"];
/// let text: String = RepairStream::new(IterSource::new(chunks))
///     .map(|piece| piece.unwrap())
///     .collect();
/// assert_eq!(text, "café “ok”");
/// ```
#[derive(Debug)]
pub struct IterSource<I: Iterator> {
    chunks: I,
    next: Option<I::Item>,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Wraps `chunks`, pulling the first chunk right away.
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let mut chunks = chunks.into_iter();
        let next = chunks.next();
        Self { chunks, next }
    }
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Error = Infallible;

    fn read_chunk(&mut self, buf: &mut Vec<u8>) -> Result<(), Infallible> {
        if let Some(chunk) = self.next.take() {
            buf.extend_from_slice(chunk.as_ref());
            self.next = self.chunks.next();
        }
        Ok(())
    }

    fn is_eof(&self) -> bool {
        self.next.is_none()
    }
}

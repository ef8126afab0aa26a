//! Input adapters: the window of text the scanner matches against.
//!
//! A [`Source`] exposes a *window*, a contiguous `&str` starting at the
//! cursor. The scanner consumes bytes from the front of the window and asks
//! the source to [`fill`](Source::fill) more whenever fewer than
//! [`lookahead`](Source::lookahead) bytes remain past the cursor.
//!
//! # Chunk Boundaries
//!
//! [`ChunkedSource`] reads fixed-size chunks and *carries over* the
//! unconsumed tail of the window: a new chunk is appended to whatever the
//! scanner has not yet consumed, never scanned on its own. Because the
//! scanner always holds more than `max_token_len` bytes past the cursor
//! before deciding, a token of up to `max_token_len` bytes is matched exactly
//! as if the whole input were in memory. A match longer than `max_token_len`
//! bytes may be cut short at the end of the window.

use std::io::{self, Read};

use crate::error::FillError;

/// Default chunk size: a typical L1 data cache.
pub const DEFAULT_CHUNK_SIZE: usize = 0x2000;

/// Sizing for [`ChunkedSource`].
///
/// `max_token_len` is the longest token guaranteed to be matched whole when
/// streaming. It defaults to the chunk size; raise it when rules can match
/// longer spans (block comments, string literals), at the cost of a window
/// of roughly `chunk_size + max_token_len` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    pub chunk_size: usize,
    pub max_token_len: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_token_len: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes requested per read. Clamped to at least 1.
    #[must_use]
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Longest token matched whole across chunk boundaries. Clamped to at
    /// least 1.
    #[must_use]
    pub fn max_token_len(mut self, bytes: usize) -> Self {
        self.max_token_len = bytes.max(1);
        self
    }
}

/// A window of input text the scanner reads from the front.
pub trait Source {
    /// Unconsumed text currently buffered, starting at the cursor.
    fn window(&self) -> &str;

    /// Absolute byte offset of `window()[0]` in the whole input.
    fn offset(&self) -> usize;

    /// `true` once the window ends at the true end of input.
    fn is_exhausted(&self) -> bool;

    /// Minimum number of bytes the scanner keeps buffered past the cursor
    /// before deciding on a token.
    fn lookahead(&self) -> usize;

    /// Append more input to the window.
    ///
    /// Returns `Ok(false)` once nothing more can be read.
    fn fill(&mut self) -> Result<bool, FillError>;

    /// Drop `len` bytes from the front of the window.
    ///
    /// `len` must lie on a character boundary of `window()`.
    fn consume(&mut self, len: usize);
}

/// A fully materialized input. Never needs filling.
#[derive(Clone, Copy, Debug)]
pub struct StrSource<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource { input, pos: 0 }
    }
}

impl Source for StrSource<'_> {
    #[inline]
    fn window(&self) -> &str {
        &self.input[self.pos..]
    }

    #[inline]
    fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        true
    }

    #[inline]
    fn lookahead(&self) -> usize {
        0
    }

    fn fill(&mut self) -> Result<bool, FillError> {
        Ok(false)
    }

    #[inline]
    fn consume(&mut self, len: usize) {
        debug_assert!(self.window().is_char_boundary(len));
        self.pos += len;
    }
}

/// Streamed input read in fixed-size chunks with carry-over buffering.
///
/// # Layout
///
/// ```text
/// buf:  [consumed..., window..., ]   pending: [partial UTF-8 tail]
///        ^            ^
///        0            start
/// ```
///
/// Consumed bytes are compacted away on the next fill. Bytes of a UTF-8
/// sequence split by a read stay in `pending` until the rest arrives.
#[derive(Debug)]
pub struct ChunkedSource<R> {
    reader: R,
    config: StreamConfig,
    buf: String,
    start: usize,
    /// Absolute offset of `buf[0]`.
    base: usize,
    pending: Vec<u8>,
    chunk: Vec<u8>,
    exhausted: bool,
}

impl<R: Read> ChunkedSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, StreamConfig::default())
    }

    pub fn with_config(reader: R, config: StreamConfig) -> Self {
        // Fields are public, so re-apply the builder clamps.
        let config = StreamConfig::new()
            .chunk_size(config.chunk_size)
            .max_token_len(config.max_token_len);
        ChunkedSource {
            reader,
            config,
            buf: String::with_capacity(config.chunk_size + config.max_token_len),
            start: 0,
            base: 0,
            pending: Vec::new(),
            chunk: vec![0; config.chunk_size],
            exhausted: false,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Read one chunk, retrying on `Interrupted`.
    fn read_chunk(&mut self) -> io::Result<usize> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                result => return result,
            }
        }
    }

    /// Move complete UTF-8 sequences from `pending` into the window.
    fn decode_pending(&mut self) -> Result<(), FillError> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                self.buf.push_str(text);
                self.pending.len()
            }
            Err(e) => {
                let valid = e.valid_up_to();
                if e.error_len().is_some() {
                    return Err(FillError::InvalidUtf8(
                        self.base + self.buf.len() + valid,
                    ));
                }
                // Incomplete trailing sequence: keep it for the next chunk.
                let text = std::str::from_utf8(&self.pending[..valid])
                    .map_err(|_| FillError::InvalidUtf8(self.base + self.buf.len()))?;
                self.buf.push_str(text);
                valid
            }
        };
        self.pending.drain(..valid);
        Ok(())
    }
}

impl<R: Read> Source for ChunkedSource<R> {
    #[inline]
    fn window(&self) -> &str {
        &self.buf[self.start..]
    }

    #[inline]
    fn offset(&self) -> usize {
        self.base + self.start
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    fn lookahead(&self) -> usize {
        self.config.max_token_len
    }

    fn fill(&mut self) -> Result<bool, FillError> {
        if self.exhausted {
            return Ok(false);
        }

        if self.start > 0 {
            self.buf.drain(..self.start);
            self.base += self.start;
            self.start = 0;
        }

        let read = self.read_chunk().map_err(FillError::Io)?;
        if read == 0 {
            self.exhausted = true;
            // Anything still pending is a truncated sequence.
            if !self.pending.is_empty() {
                return Err(FillError::InvalidUtf8(self.base + self.buf.len()));
            }
            tracing::trace!(offset = self.base + self.buf.len(), "input exhausted");
            return Ok(false);
        }

        self.pending.extend_from_slice(&self.chunk[..read]);
        self.decode_pending()?;
        tracing::trace!(read, window = self.buf.len(), "chunk read");
        Ok(true)
    }

    #[inline]
    fn consume(&mut self, len: usize) {
        debug_assert!(self.window().is_char_boundary(len));
        self.start += len;
    }
}

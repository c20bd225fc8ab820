//! Buffered protocol reader
//!
//! Decodes RESP primitives straight out of a fixed-size buffer.
//!
//! ## Buffer Layout
//! ```text
//! ┌──────────────┬──────────────────────┬──────────────────┐
//! │   consumed   │       unread         │      stale       │
//! └──────────────┴──────────────────────┴──────────────────┘
//! 0             pos                   limit           capacity
//! ```
//!
//! The buffer is refilled from offset 0 only when `pos == limit`, so a refill
//! never discards unread bytes.

use std::fmt;
use std::io::{self, Read};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{ReaderConfig, DEFAULT_BUFFER_CAPACITY};
use crate::error::{RespError, Result};
use super::{ByteSource, CR, LF};

/// Reads RESP primitives from a byte source through an owned buffer.
///
/// Every decode call may block inside a refill. A reader is meant to live as
/// long as its connection and to be driven from one thread; after any error
/// its position in the stream is unreliable and the connection should be
/// dropped.
pub struct RespReader<S> {
    /// Underlying connection. Never opened or closed by the reader.
    source: S,

    /// Fixed-capacity buffer
    buf: Box<[u8]>,

    /// Index of the next unread byte
    pos: usize,

    /// One past the last valid byte
    limit: usize,
}

impl<S: ByteSource> RespReader<S> {
    /// Create a reader with the default 8 KiB buffer
    pub fn new(source: S) -> Self {
        Self::from_parts(source, DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a reader with a buffer of `capacity` bytes
    ///
    /// Fails with [`RespError::Config`] when `capacity` is 0.
    pub fn with_capacity(source: S, capacity: usize) -> Result<Self> {
        let config = ReaderConfig::builder().buffer_capacity(capacity).build();
        Self::with_config(source, &config)
    }

    /// Create a reader from a [`ReaderConfig`]
    pub fn with_config(source: S, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(source, config.buffer_capacity))
    }

    fn from_parts(source: S, capacity: usize) -> Self {
        Self {
            source,
            buf: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            limit: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// Read the next raw byte
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure_fill()?;
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read a CRLF-terminated line as text
    ///
    /// Each byte becomes one `char` (Latin-1), so non-ASCII bytes survive
    /// unchanged as U+0080..=U+00FF. An empty line means the peer closed the
    /// connection and fails with [`RespError::ConnectionClosed`].
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.scan_line(|b| line.push(char::from(b)))?;

        if line.is_empty() {
            tracing::debug!("Empty reply line, treating as closed connection");
            return Err(RespError::ConnectionClosed);
        }

        Ok(line)
    }

    /// Read a CRLF-terminated line as raw bytes, without the terminator
    ///
    /// Unlike [`read_line`](Self::read_line) an empty line is returned as-is.
    pub fn read_line_bytes(&mut self) -> Result<Bytes> {
        self.ensure_fill()?;

        match find_line_end(&self.buf[self.pos..self.limit]) {
            Some(len) => {
                let line = Bytes::copy_from_slice(&self.buf[self.pos..self.pos + len]);
                self.pos += len + 2;
                Ok(line)
            }
            None => self.read_line_bytes_slowly(),
        }
    }

    /// Slow path for a line that crosses a refill boundary
    fn read_line_bytes_slowly(&mut self) -> Result<Bytes> {
        let mut line = BytesMut::new();
        self.scan_line(|b| line.put_u8(b))?;
        Ok(line.freeze())
    }

    /// Read a signed decimal terminated by CRLF, narrowed to `i32`
    pub fn read_int_crlf(&mut self) -> Result<i32> {
        let value = self.read_long_crlf()?;
        i32::try_from(value).map_err(|_| {
            tracing::warn!("Integer {} does not fit in i32", value);
            RespError::IntegerOverflow { width: "i32" }
        })
    }

    /// Read a signed decimal terminated by CRLF
    ///
    /// An empty field (`"\r\n"` or `"-\r\n"`) reads as 0. Non-digits and
    /// values outside `i64` are protocol errors.
    pub fn read_long_crlf(&mut self) -> Result<i64> {
        self.ensure_fill()?;

        let negative = self.buf[self.pos] == b'-';
        if negative {
            self.pos += 1;
        }

        // Accumulate toward the sign so that i64::MIN is representable.
        let mut value: i64 = 0;
        loop {
            let b = self.read_byte()?;
            if b == CR {
                let c = self.read_byte()?;
                if c != LF {
                    tracing::warn!("Integer field terminated by CR followed by 0x{:02x}", c);
                    return Err(RespError::UnexpectedCharacter { expected: LF, found: c });
                }
                return Ok(value);
            }

            if !b.is_ascii_digit() {
                tracing::warn!("Non-digit 0x{:02x} in integer field", b);
                return Err(RespError::UnexpectedCharacter { expected: b'0', found: b });
            }

            let digit = i64::from(b - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                })
                .ok_or_else(|| {
                    tracing::warn!("Integer field overflows i64");
                    RespError::IntegerOverflow { width: "i64" }
                })?;
        }
    }

    /// Copy whatever is buffered into `dest`, refilling once if empty
    ///
    /// This is a short read: the return value is the number of bytes copied
    /// and may be less than `dest.len()`. Callers that need exactly
    /// `dest.len()` bytes must loop (see [`read_exact_bulk`](Self::read_exact_bulk)).
    /// To copy into `destination` at `offset` for up to `length` bytes, pass
    /// `&mut destination[offset..offset + length]`.
    ///
    /// An empty `dest` returns 0 without touching the source.
    pub fn read_bulk(&mut self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }

        self.ensure_fill()?;

        let n = dest.len().min(self.limit - self.pos);
        dest[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    /// Fill all of `dest`, looping over [`read_bulk`](Self::read_bulk)
    ///
    /// Bytes copied before a failure stay in `dest`.
    pub fn read_exact_bulk(&mut self, dest: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < dest.len() {
            filled += self.read_bulk(&mut dest[filled..])?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Byte-at-a-time scan up to CRLF, feeding content bytes to `sink`
    ///
    /// After a CR the next byte is always consumed: if it is not LF both are
    /// content and scanning resumes after them.
    fn scan_line(&mut self, mut sink: impl FnMut(u8)) -> Result<()> {
        loop {
            let b = self.read_byte()?;
            if b == CR {
                let c = self.read_byte()?;
                if c == LF {
                    return Ok(());
                }
                sink(b);
                sink(c);
            } else {
                sink(b);
            }
        }
    }

    /// Make sure at least one unread byte is buffered
    fn ensure_fill(&mut self) -> Result<()> {
        if self.pos < self.limit {
            return Ok(());
        }

        let n = self.source.fill(&mut self.buf)?;
        debug_assert!(n <= self.buf.len(), "source overfilled the buffer");
        self.pos = 0;
        self.limit = n;

        if n == 0 {
            tracing::debug!("Source reported end of stream");
            return Err(RespError::UnexpectedEof);
        }

        tracing::trace!("Refilled {} bytes", n);
        Ok(())
    }
}

impl<S> RespReader<S> {
    /// Size of the internal buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of unread bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.limit - self.pos
    }

    /// Get a reference to the underlying source
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source
    ///
    /// Reading from it directly skips past whatever is still buffered.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the reader and return the source. Buffered bytes are lost.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> fmt::Debug for RespReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RespReader")
            .field("capacity", &self.buf.len())
            .field("pos", &self.pos)
            .field("limit", &self.limit)
            .finish()
    }
}

/// `std::io::Read` view over [`RespReader::read_bulk`]
///
/// End-of-stream is reported as `Ok(0)`, the `Read` convention.
impl<S: ByteSource> Read for RespReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.read_bulk(buf) {
            Ok(n) => Ok(n),
            Err(RespError::UnexpectedEof) => Ok(0),
            Err(RespError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }
}

/// Length of the line content if a full line lies in `window`
///
/// Mirrors [`RespReader::scan_line`]: a CR always pairs with the following
/// byte. `None` when the window ends before a terminator is seen.
fn find_line_end(window: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < window.len() {
        if window[i] == CR {
            match window.get(i + 1) {
                None => return None,
                Some(&LF) => return Some(i),
                Some(_) => i += 2,
            }
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_line_end() {
        assert_eq!(find_line_end(b"foo\r\n"), Some(3));
        assert_eq!(find_line_end(b"\r\n"), Some(0));
        assert_eq!(find_line_end(b"foo\r\nbar\r\n"), Some(3));
        assert_eq!(find_line_end(b"a\rb\r\n"), Some(3));
        assert_eq!(find_line_end(b"foo"), None);
        assert_eq!(find_line_end(b"foo\r"), None);
        assert_eq!(find_line_end(b""), None);
    }

    #[test]
    fn test_find_line_end_cr_pairs_with_next_byte() {
        // "\r\r" is content, so the first CRLF is at index 2
        assert_eq!(find_line_end(b"\r\r\n\r\n"), Some(3));
    }

    #[test]
    fn test_refill_resets_cursor() {
        let mut reader = RespReader::with_capacity(&b"abcdef"[..], 4).unwrap();
        assert_eq!(reader.read_byte().unwrap(), b'a');
        assert_eq!(reader.buffered(), 3);

        let mut dest = [0u8; 8];
        assert_eq!(reader.read_bulk(&mut dest).unwrap(), 3);
        assert_eq!(reader.buffered(), 0);

        assert_eq!(reader.read_byte().unwrap(), b'e');
        assert_eq!((reader.pos, reader.limit), (1, 2));
    }

    #[test]
    fn test_debug_omits_buffer() {
        let reader = RespReader::with_capacity(&b""[..], 16).unwrap();
        let dbg = format!("{:?}", reader);
        assert_eq!(dbg, "RespReader { capacity: 16, pos: 0, limit: 0 }");
    }
}

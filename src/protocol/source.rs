//! Byte sources
//!
//! The only thing the reader needs from a connection.

use std::io::{ErrorKind, Read};

/// A blocking supplier of raw bytes
pub trait ByteSource {
    /// Fill a prefix of `buf` and return how many bytes were written.
    ///
    /// `Ok(0)` signals end-of-stream.
    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            match self.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

//! Protocol Module
//!
//! Turns a raw byte stream into RESP wire primitives.
//!
//! ## Wire Primitives
//!
//! ```text
//! line     : <bytes...> \r \n          (a lone '\r' not followed by '\n' is content)
//! integer  : ['-'] <digit>+ \r \n
//! bulk     : <raw bytes>                (length known to the caller)
//! ```
//!
//! What a line or integer *means* (status, error, length prefix, ...) is left
//! to the calling command layer.

mod source;
mod reader;

pub use source::ByteSource;
pub use reader::RespReader;

/// Carriage return
pub const CR: u8 = b'\r';

/// Line feed
pub const LF: u8 = b'\n';

/// Line terminator
pub const CRLF: &[u8; 2] = b"\r\n";

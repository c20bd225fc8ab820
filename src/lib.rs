//! # respreader
//!
//! A buffered reader for Redis-style (RESP) wire streams:
//! - CRLF-terminated text and raw-byte lines
//! - Signed decimal integer fields
//! - Best-effort bulk payload copies
//! - Strict failure on truncated or malformed input
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Command / Reply Layer                        │
//! │            (interprets replies, not part of this crate)      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes, lines, integers, bulk chunks
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     RespReader                               │
//! │          (fixed buffer, pos / limit cursors)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ fill(buf)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     ByteSource                               │
//! │          (any std::io::Read: TcpStream, File, ...)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use respreader::RespReader;
//!
//! let mut reader = RespReader::new(&b"+OK\r\n:42\r\n"[..]);
//! assert_eq!(reader.read_byte().unwrap(), b'+');
//! assert_eq!(reader.read_line().unwrap(), "OK");
//! assert_eq!(reader.read_byte().unwrap(), b':');
//! assert_eq!(reader.read_long_crlf().unwrap(), 42);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RespError, Result};
pub use config::ReaderConfig;
pub use protocol::{ByteSource, RespReader};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of respreader
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

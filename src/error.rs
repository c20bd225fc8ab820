//! Error types for respreader
//!
//! Provides a unified error type for all decode operations.

use thiserror::Error;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Unified error type for respreader operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // Stream Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of stream.")]
    UnexpectedEof,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// An empty reply line: the peer has closed the connection.
    #[error("Server closed the connection (empty reply line)")]
    ConnectionClosed,

    #[error("Unexpected character: expected {}, found 0x{:02x}", describe(*.expected), .found)]
    UnexpectedCharacter { expected: u8, found: u8 },

    #[error("Integer overflow: value does not fit in {width}")]
    IntegerOverflow { width: &'static str },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RespError {
    /// I/O failure or end-of-stream during a refill. Fatal for the connection.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, RespError::Io(_) | RespError::UnexpectedEof)
    }

    /// Malformed framing on an otherwise healthy stream.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            RespError::ConnectionClosed
                | RespError::UnexpectedCharacter { .. }
                | RespError::IntegerOverflow { .. }
        )
    }
}

fn describe(expected: u8) -> String {
    match expected {
        b'\n' => "'\\n'".to_string(),
        b'0'..=b'9' => "digit".to_string(),
        other => format!("0x{:02x}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let io = RespError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));
        assert!(io.is_stream_error());
        assert!(!io.is_protocol_error());

        assert!(RespError::UnexpectedEof.is_stream_error());
        assert!(RespError::ConnectionClosed.is_protocol_error());
        assert!(RespError::UnexpectedCharacter { expected: b'\n', found: b'X' }.is_protocol_error());
        assert!(RespError::IntegerOverflow { width: "i64" }.is_protocol_error());

        let config = RespError::Config("bad".to_string());
        assert!(!config.is_stream_error());
        assert!(!config.is_protocol_error());
    }

    #[test]
    fn test_messages() {
        let err = RespError::UnexpectedCharacter { expected: b'\n', found: b'X' };
        assert_eq!(err.to_string(), "Unexpected character: expected '\\n', found 0x58");

        let err = RespError::UnexpectedCharacter { expected: b'0', found: b'a' };
        assert!(err.to_string().contains("expected digit"));

        assert!(RespError::ConnectionClosed.to_string().contains("closed the connection"));
        assert_eq!(RespError::UnexpectedEof.to_string(), "Unexpected end of stream.");
    }
}

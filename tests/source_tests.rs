//! Tests for byte sources
//!
//! These tests verify:
//! - Std readers (files, cursors, sockets) work as sources
//! - Interrupted reads are retried
//! - The `Read` view over a RespReader

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use respreader::{ByteSource, RespError, RespReader};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Source that reports `Interrupted` before every successful read
struct FlakySource {
    inner: Cursor<Vec<u8>>,
    interrupt_next: bool,
    interrupts: usize,
}

impl Read for FlakySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            self.interrupts += 1;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        self.interrupt_next = true;
        self.inner.read(buf)
    }
}

// =============================================================================
// ByteSource Tests
// =============================================================================

#[test]
fn test_slice_source_reports_end_of_stream() {
    let mut source: &[u8] = b"ab";
    let mut buf = [0u8; 4];
    assert_eq!(source.fill(&mut buf).unwrap(), 2);
    assert_eq!(source.fill(&mut buf).unwrap(), 0);
}

#[test]
fn test_interrupted_reads_are_retried() {
    let source = FlakySource {
        inner: Cursor::new(b"+PONG\r\n".to_vec()),
        interrupt_next: true,
        interrupts: 0,
    };
    let mut reader = RespReader::new(source);
    assert_eq!(reader.read_line().unwrap(), "+PONG");
    assert_eq!(reader.get_ref().interrupts, 1);
}

#[test]
fn test_file_source() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("replies.bin");
    {
        let mut file = File::create(&path).unwrap();
        file.write_all(b"*2\r\n$3\r\nfoo\r\n:-12\r\n").unwrap();
        file.sync_all().unwrap();
    }

    let mut reader = RespReader::with_capacity(File::open(&path).unwrap(), 5).unwrap();
    assert_eq!(reader.read_byte().unwrap(), b'*');
    assert_eq!(reader.read_int_crlf().unwrap(), 2);
    assert_eq!(reader.read_byte().unwrap(), b'$');
    assert_eq!(reader.read_int_crlf().unwrap(), 3);
    assert_eq!(&reader.read_line_bytes().unwrap()[..], b"foo");
    assert_eq!(reader.read_byte().unwrap(), b':');
    assert_eq!(reader.read_long_crlf().unwrap(), -12);
    assert!(matches!(reader.read_byte(), Err(RespError::UnexpectedEof)));
}

#[test]
fn test_tcp_source() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Split the reply over two writes
        stream.write_all(b"+HEL").unwrap();
        stream.flush().unwrap();
        stream.write_all(b"LO\r\n:7\r\n").unwrap();
    });

    let stream = TcpStream::connect(addr).unwrap();
    let mut reader = RespReader::new(stream);
    assert_eq!(reader.read_line().unwrap(), "+HELLO");
    assert_eq!(reader.read_byte().unwrap(), b':');
    assert_eq!(reader.read_long_crlf().unwrap(), 7);

    server.join().unwrap();
    assert!(reader.read_byte().unwrap_err().is_stream_error());
}

// =============================================================================
// Read Impl Tests
// =============================================================================

#[test]
fn test_read_to_end_after_header() {
    let mut reader = RespReader::with_capacity(&b"$11\r\nhello world"[..], 4).unwrap();
    assert_eq!(reader.read_byte().unwrap(), b'$');
    assert_eq!(reader.read_int_crlf().unwrap(), 11);

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"hello world");
}

#[test]
fn test_take_bulk_payload() {
    let mut reader = RespReader::with_capacity(&b"abcdefgh\r\n+OK\r\n"[..], 3).unwrap();

    let mut payload = Vec::new();
    (&mut reader).take(8).read_to_end(&mut payload).unwrap();
    assert_eq!(payload, b"abcdefgh");

    assert!(reader.read_line_bytes().unwrap().is_empty());
    assert_eq!(reader.read_line().unwrap(), "+OK");
}

#[test]
fn test_read_impl_forwards_io_errors() {
    struct Refused;
    impl Read for Refused {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
        }
    }

    let mut reader = RespReader::new(Refused);
    let err = reader.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
}

#[test]
fn test_into_inner_returns_source() {
    let reader = RespReader::new(Cursor::new(b"data".to_vec()));
    let cursor = reader.into_inner();
    assert_eq!(cursor.position(), 0);
}

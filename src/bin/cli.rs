//! respreader CLI
//!
//! Decodes a captured RESP byte stream by applying primitive reads in order.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::str::FromStr;

use clap::Parser;
use respreader::{ReaderConfig, RespReader, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// respreader CLI
#[derive(Parser, Debug)]
#[command(name = "respreader-cli")]
#[command(about = "Decode RESP wire primitives from a captured byte stream")]
#[command(version)]
struct Args {
    /// Input file ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Internal buffer size in bytes
    #[arg(short, long, default_value = "8192")]
    buffer_size: usize,

    /// Reads to perform: byte, line, line-bytes, int, long, bulk:N
    #[arg(required = true)]
    ops: Vec<Op>,
}

/// A single primitive read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Byte,
    Line,
    LineBytes,
    Int,
    Long,
    Bulk(usize),
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "byte" => Ok(Op::Byte),
            "line" => Ok(Op::Line),
            "line-bytes" => Ok(Op::LineBytes),
            "int" => Ok(Op::Int),
            "long" => Ok(Op::Long),
            _ => match s.strip_prefix("bulk:") {
                Some(len) => len
                    .parse()
                    .map(Op::Bulk)
                    .map_err(|e| format!("invalid bulk length '{}': {}", len, e)),
                None => Err(format!("unknown operation '{}'", s)),
            },
        }
    }
}

fn main() {
    // Logs go to stderr; stdout carries decoded values only
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,respreader=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("respreader-cli v{}", respreader::VERSION);
    tracing::debug!("Input: {}, buffer size: {}", args.input, args.buffer_size);

    let source: Box<dyn Read> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        match File::open(&args.input) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("error: cannot open {}: {}", args.input, e);
                std::process::exit(1);
            }
        }
    };

    let config = ReaderConfig::builder()
        .buffer_capacity(args.buffer_size)
        .build();

    let mut reader = match RespReader::with_config(source, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    for op in &args.ops {
        match apply(&mut reader, *op) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                tracing::warn!("{:?} failed: {}", op, e);
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Run one read and render its result
fn apply<R: Read>(reader: &mut RespReader<R>, op: Op) -> Result<String> {
    let out = match op {
        Op::Byte => reader.read_byte()?.to_string(),
        Op::Line => reader.read_line()?,
        Op::LineBytes => hex(&reader.read_line_bytes()?),
        Op::Int => reader.read_int_crlf()?.to_string(),
        Op::Long => reader.read_long_crlf()?.to_string(),
        Op::Bulk(len) => {
            let mut payload = vec![0u8; len];
            reader.read_exact_bulk(&mut payload)?;
            hex(&payload)
        }
    };
    Ok(out)
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

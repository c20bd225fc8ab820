//! Configuration for respreader
//!
//! Centralized reader configuration with sensible defaults.

use crate::error::{RespError, Result};

/// Default size of the reader's internal buffer (8 KiB)
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Configuration for a [`RespReader`](crate::protocol::RespReader)
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Fixed capacity of the internal buffer, in bytes. Must be > 0.
    pub buffer_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl ReaderConfig {
    /// Create a new config builder
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    /// Check that the configuration can back a reader
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(RespError::Config(
                "buffer capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ReaderConfig
#[derive(Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Set the internal buffer capacity (in bytes)
    pub fn buffer_capacity(mut self, size: usize) -> Self {
        self.config.buffer_capacity = size;
        self
    }

    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

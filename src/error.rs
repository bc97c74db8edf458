// In: src/error.rs

//! This module defines the single, unified error type for the symbol codec.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every failure is returned to the immediate caller. Nothing is retried here;
//! the storage engine decides whether a failed block read/write aborts the
//! enclosing segment.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymdbError>;

/// The stage of a block read or write at which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPhase {
    Header,
    LengthTable,
    Body,
}

impl fmt::Display for IoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoPhase::Header => f.write_str("header"),
            IoPhase::LengthTable => f.write_str("length table"),
            IoPhase::Body => f.write_str("body"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SymdbError {
    // =========================================================================
    // === Block integrity errors
    // =========================================================================
    /// The header's stored CRC does not match the CRC of its first 8 bytes.
    #[error("Block header checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// The header's width tag is neither 8 nor 16.
    #[error("Unsupported block encoding width: {0}")]
    UnsupportedEncoding(u8),

    /// The envelope carries a format tag no registered decoder understands.
    #[error("Unknown symbols block format: {0}")]
    UnknownFormat(u16),

    /// The number of elements declared by a header or envelope does not match
    /// the number of destination slots.
    #[error("Element count mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid symbols block size: {0}")]
    InvalidBlockSize(usize),

    // =========================================================================
    // === Encoding policy errors
    // =========================================================================
    /// Only returned when the encoder runs with `TruncationPolicy::Strict`.
    #[error("String at index {index} is {len} bytes, exceeding the block limit of 65535")]
    StringTooLong { index: usize, len: usize },

    #[error("Too many elements for a single block: {0}")]
    TooManyElements(usize),

    #[error("String at index {index} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        index: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// A read or write against the caller's sink/source failed.
    #[error("I/O error while processing block {phase}: {source}")]
    BlockIo {
        phase: IoPhase,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error outside of block processing (e.g. reading a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid codec configuration: {0}")]
    Config(String),
}

impl SymdbError {
    /// Returns a closure that tags an `io::Error` with the phase it occurred in.
    pub(crate) fn io(phase: IoPhase) -> impl FnOnce(std::io::Error) -> SymdbError {
        move |source| SymdbError::BlockIo { phase, source }
    }
}

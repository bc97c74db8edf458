//! This module defines the traits every concrete symbol block codec implements.
//!
//! The block envelope (header, checksum, framing) is shared; only the element
//! layout after the header differs between symbol kinds. `SymbolsEncoder` and
//! `SymbolsDecoder` drive any pair of these through the same write/read
//! sequencing.
//!
//! Implementations keep scratch buffers between calls, which is why every
//! operation takes `&mut self`. One instance serves one caller at a time;
//! concurrent blocks need independent instances.

use std::io::{Read, Write};

use crate::error::Result;
use crate::format::SymbolsBlockFormat;

/// Writes one block of `T` elements.
pub trait BlockEncoder<T>: Send {
    /// The format tag readers must present to get a matching decoder.
    fn format(&self) -> SymbolsBlockFormat;

    /// Size in bytes of the header this codec writes in front of every block.
    fn block_header_size(&self) -> usize;

    /// Encodes `elements` as a single block and writes it to `sink`.
    ///
    /// On error the sink may hold a partial block and must be discarded by
    /// the caller.
    fn encode(&mut self, sink: &mut dyn Write, elements: &[T]) -> Result<()>;

    /// Clears scratch state, keeping allocated capacity.
    fn reset(&mut self);
}

/// Reads one block of `T` elements.
pub trait BlockDecoder<T>: Send {
    fn format(&self) -> SymbolsBlockFormat;

    /// Decodes a single block from `source` into `out`.
    ///
    /// The block must hold exactly `out.len()` elements. On error `out` may
    /// be partially overwritten and must be discarded.
    fn decode(&mut self, source: &mut dyn Read, out: &mut [T]) -> Result<()>;

    fn reset(&mut self);
}

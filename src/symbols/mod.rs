// ====================================================================================
// ARCHITECTURAL OVERVIEW: Symbol Tables
// ====================================================================================
//
// A symbol table (all strings, all functions, ...) is written as a run of blocks
// of at most `block_size` elements each. The run is described by a
// `SymbolsBlockHeader` envelope that the storage engine keeps outside the blocks.
//
// Write path:
//
//   SymbolsEncoder::encode(sink, items)
//         |
//         `-> for each chunk of `block_size` items -> BlockEncoder::encode(sink, chunk)
//         |
//         `-> returns the envelope (format, length, block_size, block_header_size)
//
// Read path:
//
//   DecoderRegistry::decoder(&envelope)        (unknown tags rejected here)
//         |
//         `-> SymbolsDecoder::decode(source, out)
//                 |
//                 `-> for each block slice of `out` -> BlockDecoder::decode(source, slice)
//
// ====================================================================================

pub mod registry;

use std::io::{Read, Write};

use crate::block::strings::StringsBlockEncoder;
use crate::config::CodecConfig;
use crate::error::{Result, SymdbError};
use crate::format::{SymbolsBlockFormat, SymbolsBlockHeader};
use crate::traits::{BlockDecoder, BlockEncoder};

pub use registry::DecoderRegistry;

//==================================================================================
// 1. Encoder
//==================================================================================

/// Writes a whole symbol table as a run of blocks through any `BlockEncoder`.
pub struct SymbolsEncoder<T> {
    encoder: Box<dyn BlockEncoder<T>>,
    block_size: usize,
}

impl<T> SymbolsEncoder<T> {
    pub fn new(encoder: Box<dyn BlockEncoder<T>>, block_size: usize) -> Result<Self> {
        if block_size == 0 || block_size > u32::MAX as usize {
            return Err(SymdbError::InvalidBlockSize(block_size));
        }
        Ok(Self {
            encoder,
            block_size,
        })
    }

    pub fn format(&self) -> SymbolsBlockFormat {
        self.encoder.format()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Writes `items` to `sink` and returns the envelope a reader needs to
    /// decode them. Nothing is written for an empty table.
    pub fn encode<W: Write>(&mut self, sink: &mut W, items: &[T]) -> Result<SymbolsBlockHeader> {
        let length =
            u32::try_from(items.len()).map_err(|_| SymdbError::TooManyElements(items.len()))?;
        for (i, block) in items.chunks(self.block_size).enumerate() {
            log::debug!(
                "writing {:?} block {} ({} elements)",
                self.encoder.format(),
                i,
                block.len()
            );
            self.encoder.encode(sink, block)?;
        }
        Ok(SymbolsBlockHeader {
            format: self.encoder.format(),
            length,
            block_size: self.block_size as u32,
            block_header_size: self.encoder.block_header_size() as u16,
        })
    }

    pub fn reset(&mut self) {
        self.encoder.reset();
    }
}

//==================================================================================
// 2. Decoder
//==================================================================================

/// Reads a run of blocks described by an envelope. Build one through
/// `DecoderRegistry::decoder` so the format tag is checked first.
pub struct SymbolsDecoder<T> {
    header: SymbolsBlockHeader,
    decoder: Box<dyn BlockDecoder<T>>,
}

impl<T> SymbolsDecoder<T> {
    pub(crate) fn new(header: SymbolsBlockHeader, decoder: Box<dyn BlockDecoder<T>>) -> Self {
        Self { header, decoder }
    }

    pub fn header(&self) -> &SymbolsBlockHeader {
        &self.header
    }

    /// Decodes every block into `out`, which must have exactly
    /// `header.length` slots.
    pub fn decode<R: Read>(&mut self, source: &mut R, out: &mut [T]) -> Result<()> {
        let length = self.header.length as usize;
        if out.len() != length {
            return Err(SymdbError::SizeMismatch {
                expected: length,
                actual: out.len(),
            });
        }
        if length == 0 {
            return Ok(());
        }
        if self.header.block_size == 0 {
            return Err(SymdbError::InvalidBlockSize(0));
        }
        for (i, block) in out.chunks_mut(self.header.block_size as usize).enumerate() {
            log::debug!(
                "reading {:?} block {} ({} elements)",
                self.header.format,
                i,
                block.len()
            );
            self.decoder.decode(source, block)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.decoder.reset();
    }
}

impl<T: Default + Clone> SymbolsDecoder<T> {
    /// Convenience wrapper around `decode` that allocates the destination.
    pub fn decode_to_vec<R: Read>(&mut self, source: &mut R) -> Result<Vec<T>> {
        let mut out = vec![T::default(); self.header.length as usize];
        self.decode(source, &mut out)?;
        Ok(out)
    }
}

//==================================================================================
// 3. Constructors
//==================================================================================

pub fn new_strings_encoder(config: &CodecConfig) -> Result<SymbolsEncoder<String>> {
    config.validate()?;
    SymbolsEncoder::new(
        Box::new(StringsBlockEncoder::new(config.truncation)),
        config.block_size,
    )
}

/// Returns a strings decoder for `header`, or `UnknownFormat` if the envelope
/// was written by a different codec.
pub fn new_strings_decoder(header: &SymbolsBlockHeader) -> Result<SymbolsDecoder<String>> {
    DecoderRegistry::strings().decoder(header)
}

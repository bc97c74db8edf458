//! Maps format tags to decoder constructors.
//!
//! The registry is the only place a format tag is turned into a codec. A new
//! symbol kind is supported by adding its `SymbolsBlockFormat` variant and
//! registering a constructor here; nothing else branches on raw tag values.

use hashbrown::HashMap;

use crate::block::strings::StringsBlockDecoder;
use crate::error::{Result, SymdbError};
use crate::format::{SymbolsBlockFormat, SymbolsBlockHeader};
use crate::symbols::SymbolsDecoder;
use crate::traits::BlockDecoder;

type DecoderCtor<T> = fn() -> Box<dyn BlockDecoder<T>>;

pub struct DecoderRegistry<T> {
    constructors: HashMap<SymbolsBlockFormat, DecoderCtor<T>>,
}

impl<T> Default for DecoderRegistry<T> {
    fn default() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }
}

impl<T> DecoderRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ctor` for `format`, replacing any previous constructor.
    pub fn register(&mut self, format: SymbolsBlockFormat, ctor: DecoderCtor<T>) -> &mut Self {
        self.constructors.insert(format, ctor);
        self
    }

    pub fn supports(&self, format: SymbolsBlockFormat) -> bool {
        self.constructors.contains_key(&format)
    }

    /// Builds a decoder for the blocks described by `header`. Fails with
    /// `UnknownFormat` without touching any block bytes if the format has no
    /// registered constructor.
    pub fn decoder(&self, header: &SymbolsBlockHeader) -> Result<SymbolsDecoder<T>> {
        let ctor = self
            .constructors
            .get(&header.format)
            .ok_or(SymdbError::UnknownFormat(header.format.tag()))?;
        Ok(SymbolsDecoder::new(*header, ctor()))
    }

    /// Like `decoder`, for an envelope whose format is still a raw tag.
    pub fn decoder_for_tag(
        &self,
        tag: u16,
        length: u32,
        block_size: u32,
        block_header_size: u16,
    ) -> Result<SymbolsDecoder<T>> {
        let header = SymbolsBlockHeader {
            format: SymbolsBlockFormat::try_from(tag)?,
            length,
            block_size,
            block_header_size,
        };
        self.decoder(&header)
    }
}

impl DecoderRegistry<String> {
    /// A registry with every strings codec this crate ships.
    pub fn strings() -> Self {
        let mut registry = Self::new();
        registry.register(SymbolsBlockFormat::StringsV1, strings_v1);
        registry
    }
}

fn strings_v1() -> Box<dyn BlockDecoder<String>> {
    Box::new(StringsBlockDecoder::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BLOCK_HEADER_SIZE;

    fn envelope(format: SymbolsBlockFormat) -> SymbolsBlockHeader {
        SymbolsBlockHeader {
            format,
            length: 1,
            block_size: 1024,
            block_header_size: BLOCK_HEADER_SIZE as u16,
        }
    }

    #[test]
    fn test_strings_registry_contents() {
        let registry = DecoderRegistry::strings();
        assert!(registry.supports(SymbolsBlockFormat::StringsV1));
        assert!(!registry.supports(SymbolsBlockFormat::LocationsV1));
        assert!(!registry.supports(SymbolsBlockFormat::FunctionsV1));
        assert!(!registry.supports(SymbolsBlockFormat::MappingsV1));
    }

    #[test]
    fn test_unregistered_format_is_unknown() {
        let registry = DecoderRegistry::strings();
        let res = registry.decoder(&envelope(SymbolsBlockFormat::MappingsV1));
        assert!(matches!(res, Err(SymdbError::UnknownFormat(3))));
    }

    #[test]
    fn test_unknown_raw_tag_is_reported() {
        let registry = DecoderRegistry::strings();
        let res = registry.decoder_for_tag(99, 1, 1024, BLOCK_HEADER_SIZE as u16);
        assert!(matches!(res, Err(SymdbError::UnknownFormat(99))));
        assert!(registry
            .decoder_for_tag(4, 1, 1024, BLOCK_HEADER_SIZE as u16)
            .is_ok());
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = DecoderRegistry::<String>::new();
        let res = registry.decoder(&envelope(SymbolsBlockFormat::StringsV1));
        assert!(matches!(res, Err(SymdbError::UnknownFormat(4))));
    }
}

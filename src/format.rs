// In: src/format.rs

//! Defines all on-disk structures and constants for symbol blocks.
//! This is the single source of truth for the format tags carried by the
//! enclosing envelope, and for the fixed sizes every concrete block codec
//! agrees on.

use serde::{Deserialize, Serialize};

use crate::error::SymdbError;

//==================================================================================
// I. Block-Level Constants
//==================================================================================

/// Size in bytes of the fixed block header: count(4) + reserved(1) + width(1)
/// + padding(2) + crc(4).
pub const BLOCK_HEADER_SIZE: usize = 12;
/// Number of leading header bytes covered by the header CRC.
pub const BLOCK_HEADER_CRC_RANGE: usize = 8;
/// The longest string a strings block can represent.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;
/// Default number of elements written per block by `SymbolsEncoder`.
pub const DEFAULT_SYMBOLS_BLOCK_SIZE: usize = 1 << 10;

//==================================================================================
// II. Format Tags
//==================================================================================

/// Identifies which concrete codec (and wire version) produced a block.
///
/// The numeric values are stable and persisted by the enclosing envelope.
/// A new symbol kind or a new wire version is added as a new variant; readers
/// reject tags they do not know instead of guessing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum SymbolsBlockFormat {
    LocationsV1 = 1,
    FunctionsV1 = 2,
    MappingsV1 = 3,
    StringsV1 = 4,
}

impl SymbolsBlockFormat {
    pub fn tag(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for SymbolsBlockFormat {
    type Error = SymdbError;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(SymbolsBlockFormat::LocationsV1),
            2 => Ok(SymbolsBlockFormat::FunctionsV1),
            3 => Ok(SymbolsBlockFormat::MappingsV1),
            4 => Ok(SymbolsBlockFormat::StringsV1),
            other => Err(SymdbError::UnknownFormat(other)),
        }
    }
}

//==================================================================================
// III. Envelope
//==================================================================================

/// Describes a run of symbol blocks written by `SymbolsEncoder`.
///
/// The envelope lives outside the blocks themselves; the storage engine
/// persists it next to whatever else it tracks for the symbol table and hands
/// it back on read to pick a decoder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolsBlockHeader {
    /// Format of the encoded data.
    pub format: SymbolsBlockFormat,
    /// Total number of elements across all blocks.
    pub length: u32,
    /// Number of elements per block; the last block may hold fewer.
    pub block_size: u32,
    /// Size in bytes of each block's own header.
    pub block_header_size: u16,
}

impl SymbolsBlockHeader {
    /// Number of blocks covered by this envelope.
    pub fn block_count(&self) -> usize {
        if self.block_size == 0 {
            return 0;
        }
        (self.length as usize).div_ceil(self.block_size as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_stable() {
        assert_eq!(SymbolsBlockFormat::LocationsV1.tag(), 1);
        assert_eq!(SymbolsBlockFormat::FunctionsV1.tag(), 2);
        assert_eq!(SymbolsBlockFormat::MappingsV1.tag(), 3);
        assert_eq!(SymbolsBlockFormat::StringsV1.tag(), 4);
    }

    #[test]
    fn test_unknown_raw_tag_is_rejected() {
        for tag in [0u16, 5, 42, u16::MAX] {
            match SymbolsBlockFormat::try_from(tag) {
                Err(SymdbError::UnknownFormat(t)) => assert_eq!(t, tag),
                other => panic!("expected UnknownFormat({}), got {:?}", tag, other),
            }
        }
        assert_eq!(
            SymbolsBlockFormat::try_from(4).unwrap(),
            SymbolsBlockFormat::StringsV1
        );
    }

    #[test]
    fn test_block_count() {
        let mut header = SymbolsBlockHeader {
            format: SymbolsBlockFormat::StringsV1,
            length: 2049,
            block_size: 1024,
            block_header_size: BLOCK_HEADER_SIZE as u16,
        };
        assert_eq!(header.block_count(), 3);
        header.length = 2048;
        assert_eq!(header.block_count(), 2);
        header.length = 0;
        assert_eq!(header.block_count(), 0);
    }

    #[test]
    fn test_envelope_serializes_format_as_snake_case() {
        let header = SymbolsBlockHeader {
            format: SymbolsBlockFormat::StringsV1,
            length: 3,
            block_size: 1024,
            block_header_size: 12,
        };
        let json = serde_json::to_string(&header).unwrap();
        assert!(json.contains("\"strings_v1\""));
        let back: SymbolsBlockHeader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, header);
    }
}

//! This module contains the pure, stateless kernels for writing and reading the
//! fixed-width length table that precedes a block body.
//!
//! Each entry is an unsigned big-endian integer of either 8 or 16 bits. The
//! kernels are generic over the entry type so the 8-bit and 16-bit paths share
//! one implementation.

use num_traits::{PrimInt, Unsigned};

use crate::error::SymdbError;

//==================================================================================
// 1. Width Tag
//==================================================================================

/// The bit width of each length-table entry, as recorded in the block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    W8,
    W16,
}

impl LengthWidth {
    /// The tag value stored in the header's width byte.
    pub fn bits(self) -> u8 {
        match self {
            LengthWidth::W8 => 8,
            LengthWidth::W16 => 16,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Size in bytes of a table holding `entries` lengths.
    pub fn table_size(self, entries: usize) -> usize {
        entries * self.bytes()
    }

    /// The narrowest width that can hold every length in `lengths` without
    /// clamping below 65535.
    pub fn for_lengths<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        if lengths.into_iter().any(|len| len > u8::MAX as usize) {
            LengthWidth::W16
        } else {
            LengthWidth::W8
        }
    }
}

impl TryFrom<u8> for LengthWidth {
    type Error = SymdbError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(LengthWidth::W8),
            16 => Ok(LengthWidth::W16),
            other => Err(SymdbError::UnsupportedEncoding(other)),
        }
    }
}

//==================================================================================
// 2. Entry Types
//==================================================================================

/// An unsigned integer type usable as a length-table entry.
pub trait LengthEntry: PrimInt + Unsigned {
    const WIDTH: LengthWidth;

    fn put_be(self, out: &mut Vec<u8>);

    /// Reads one entry from the front of `bytes`, which holds exactly
    /// `Self::WIDTH.bytes()` bytes.
    fn get_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_length_entry {
    ($T:ty, $W:expr) => {
        impl LengthEntry for $T {
            const WIDTH: LengthWidth = $W;

            fn put_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            fn get_be(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$T>()];
                buf.copy_from_slice(&bytes[..std::mem::size_of::<$T>()]);
                <$T>::from_be_bytes(buf)
            }
        }
    };
}

impl_length_entry!(u8, LengthWidth::W8);
impl_length_entry!(u16, LengthWidth::W16);

//==================================================================================
// 3. Public API for Slice Operations
//==================================================================================

/// Appends one entry per length to `out`, clamping each to `T::max_value()`.
pub fn encode<T, I>(lengths: I, out: &mut Vec<u8>)
where
    T: LengthEntry,
    I: IntoIterator<Item = usize>,
{
    let max = T::max_value().to_usize().unwrap_or(usize::MAX);
    for len in lengths {
        // The clamped value always fits in T.
        let entry = T::from(len.min(max)).unwrap_or_else(T::max_value);
        entry.put_be(out);
    }
}

/// Decodes every entry in `table` into `out`, replacing its contents.
pub fn decode<T>(table: &[u8], out: &mut Vec<usize>) -> Result<(), SymdbError>
where
    T: LengthEntry,
{
    let width = T::WIDTH.bytes();
    if table.len() % width != 0 {
        return Err(SymdbError::SizeMismatch {
            expected: table.len() / width * width,
            actual: table.len(),
        });
    }
    out.clear();
    out.reserve(table.len() / width);
    for chunk in table.chunks_exact(width) {
        out.push(T::get_be(chunk).to_usize().unwrap_or(0));
    }
    Ok(())
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_selection_boundary() {
        assert_eq!(LengthWidth::for_lengths(Vec::<usize>::new()), LengthWidth::W8);
        assert_eq!(LengthWidth::for_lengths([0, 1, 255]), LengthWidth::W8);
        assert_eq!(LengthWidth::for_lengths([0, 256]), LengthWidth::W16);
        assert_eq!(LengthWidth::for_lengths([70_000]), LengthWidth::W16);
    }

    #[test]
    fn test_width_tag_parsing() {
        assert_eq!(LengthWidth::try_from(8).unwrap(), LengthWidth::W8);
        assert_eq!(LengthWidth::try_from(16).unwrap(), LengthWidth::W16);
        for bad in [0u8, 7, 9, 15, 32, 255] {
            assert!(matches!(
                LengthWidth::try_from(bad),
                Err(SymdbError::UnsupportedEncoding(b)) if b == bad
            ));
        }
    }

    #[test]
    fn test_u16_entries_are_big_endian() {
        let mut table = Vec::new();
        encode::<u16, _>([1, 256, 0xABCD], &mut table);
        assert_eq!(table, vec![0x00, 0x01, 0x01, 0x00, 0xAB, 0xCD]);

        let mut lengths = Vec::new();
        decode::<u16>(&table, &mut lengths).unwrap();
        assert_eq!(lengths, vec![1, 256, 0xABCD]);
    }

    #[test]
    fn test_entries_are_clamped_to_width() {
        let mut table = Vec::new();
        encode::<u16, _>([70_000], &mut table);
        assert_eq!(table, vec![0xFF, 0xFF]);

        table.clear();
        encode::<u8, _>([300], &mut table);
        assert_eq!(table, vec![0xFF]);
    }

    #[test]
    fn test_decode_rejects_ragged_table() {
        let mut lengths = Vec::new();
        let res = decode::<u16>(&[0x00, 0x01, 0x02], &mut lengths);
        assert!(matches!(res, Err(SymdbError::SizeMismatch { .. })));
    }
}

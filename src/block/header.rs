//! The fixed 12-byte header written in front of every symbol block.
//!
//! ```text
//! offset  size  field
//! 0       4     element count (u32, big-endian)
//! 4       1     reserved, 0
//! 5       1     encoding width tag
//! 6       2     reserved, 0
//! 8       4     CRC-32C of bytes [0, 8) (u32, big-endian)
//! ```
//!
//! `marshal`/`unmarshal` only move bytes. `read_block_header` is the helper
//! every concrete decoder uses: it reads the header and rejects it if the
//! checksum does not match, before any other field is looked at.

use bytemuck::{Pod, Zeroable};
use std::io::Read;

use crate::error::{IoPhase, Result, SymdbError};
use crate::format::{BLOCK_HEADER_CRC_RANGE, BLOCK_HEADER_SIZE};

/// Byte-exact image of the header. Every field is a byte array, so the struct
/// has alignment 1 and no padding.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawBlockHeader {
    element_count: [u8; 4],
    reserved: u8,
    encoding_width: u8,
    padding: [u8; 2],
    crc: [u8; 4],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHeader {
    pub element_count: u32,
    /// Raw width tag. Codecs validate it themselves after the checksum check.
    pub encoding_width: u8,
    pub checksum: u32,
}

impl BlockHeader {
    pub fn new(element_count: u32, encoding_width: u8) -> Self {
        Self {
            element_count,
            encoding_width,
            checksum: 0,
        }
    }

    /// Serializes the header, computing and storing the checksum.
    pub fn marshal(&mut self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut raw = RawBlockHeader::zeroed();
        raw.element_count = self.element_count.to_be_bytes();
        raw.encoding_width = self.encoding_width;

        let mut buf: [u8; BLOCK_HEADER_SIZE] = bytemuck::cast(raw);
        self.checksum = checksum(&buf);
        buf[BLOCK_HEADER_CRC_RANGE..].copy_from_slice(&self.checksum.to_be_bytes());
        buf
    }

    /// Parses a header without verifying its checksum.
    pub fn unmarshal(buf: &[u8; BLOCK_HEADER_SIZE]) -> Self {
        let raw: RawBlockHeader = bytemuck::cast(*buf);
        Self {
            element_count: u32::from_be_bytes(raw.element_count),
            encoding_width: raw.encoding_width,
            checksum: u32::from_be_bytes(raw.crc),
        }
    }
}

/// CRC-32C over the checksummed prefix of a marshalled header.
pub fn checksum(buf: &[u8; BLOCK_HEADER_SIZE]) -> u32 {
    crc32c::crc32c(&buf[..BLOCK_HEADER_CRC_RANGE])
}

/// Reads exactly one header from `source` into `scratch` and verifies it.
pub fn read_block_header<R: Read + ?Sized>(
    source: &mut R,
    scratch: &mut [u8; BLOCK_HEADER_SIZE],
) -> Result<BlockHeader> {
    source
        .read_exact(scratch)
        .map_err(SymdbError::io(IoPhase::Header))?;
    let header = BlockHeader::unmarshal(scratch);
    let computed = checksum(scratch);
    if computed != header.checksum {
        return Err(SymdbError::ChecksumMismatch {
            stored: header.checksum,
            computed,
        });
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_marshal_layout() {
        let mut header = BlockHeader::new(0x0102_0304, 16);
        let buf = header.marshal();

        assert_eq!(&buf[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf[4], 0);
        assert_eq!(buf[5], 16);
        assert_eq!(&buf[6..8], &[0, 0]);
        assert_eq!(header.checksum, crc32c::crc32c(&buf[..8]));
        assert_eq!(&buf[8..12], &header.checksum.to_be_bytes());
    }

    #[test]
    fn test_unmarshal_inverts_marshal() {
        let mut header = BlockHeader::new(1000, 8);
        let buf = header.marshal();
        assert_eq!(BlockHeader::unmarshal(&buf), header);
    }

    #[test]
    fn test_unmarshal_does_not_verify() {
        let mut buf = BlockHeader::new(3, 8).marshal();
        buf[0] ^= 0x80;
        let header = BlockHeader::unmarshal(&buf);
        assert_eq!(header.element_count, 0x8000_0003);
    }

    #[test]
    fn test_read_block_header_detects_corruption() {
        let mut buf = BlockHeader::new(3, 8).marshal();
        buf[5] = 16;
        let mut scratch = [0u8; BLOCK_HEADER_SIZE];
        let res = read_block_header(&mut Cursor::new(&buf[..]), &mut scratch);
        assert!(matches!(res, Err(SymdbError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_read_block_header_short_input_is_header_io_error() {
        let buf = BlockHeader::new(3, 8).marshal();
        let mut scratch = [0u8; BLOCK_HEADER_SIZE];
        let res = read_block_header(&mut Cursor::new(&buf[..7]), &mut scratch);
        assert!(matches!(
            res,
            Err(SymdbError::BlockIo {
                phase: IoPhase::Header,
                ..
            })
        ));
    }
}

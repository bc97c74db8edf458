//! Strings block codec (`SymbolsBlockFormat::StringsV1`).
//!
//! A strings block is the common header, a length table with one entry per
//! string, and the concatenated string bytes:
//!
//! ```text
//! | header (12) | len[0] .. len[N-1] | bytes[0] bytes[1] .. bytes[N-1] |
//! ```
//!
//! Length entries are 8 bits wide when every string fits in 255 bytes, and
//! 16 bits otherwise. Strings longer than 65535 bytes are truncated (or
//! rejected, under `TruncationPolicy::Strict`).

use std::io::{Read, Write};

use crate::block::header::{read_block_header, BlockHeader};
use crate::config::TruncationPolicy;
use crate::error::{IoPhase, Result, SymdbError};
use crate::format::{SymbolsBlockFormat, BLOCK_HEADER_SIZE, MAX_STRING_LEN};
use crate::kernels::length_table::{self, LengthEntry, LengthWidth};
use crate::traits::{BlockDecoder, BlockEncoder};

/// Returns the bytes of `s` that are written to a block: the whole string, or
/// exactly its first `MAX_STRING_LEN` bytes. The cut may land inside a
/// multibyte character; the decoder drops that partial tail.
fn clamp(s: &str) -> &[u8] {
    let bytes = s.as_bytes();
    &bytes[..bytes.len().min(MAX_STRING_LEN)]
}

//==================================================================================
// 1. Encoder
//==================================================================================

/// Writes strings blocks. Reuses its buffers across calls; not for concurrent use.
#[derive(Debug, Default)]
pub struct StringsBlockEncoder {
    truncation: TruncationPolicy,
    header: BlockHeader,
    lengths: Vec<u8>,
    body: Vec<u8>,
}

impl StringsBlockEncoder {
    pub fn new(truncation: TruncationPolicy) -> Self {
        Self {
            truncation,
            ..Self::default()
        }
    }

    /// The header of the most recently encoded block.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Encodes `strings` as one block and writes header, length table and body
    /// to `sink`, in that order.
    pub fn encode<W: Write + ?Sized>(&mut self, sink: &mut W, strings: &[String]) -> Result<()> {
        let count =
            u32::try_from(strings.len()).map_err(|_| SymdbError::TooManyElements(strings.len()))?;
        if self.truncation == TruncationPolicy::Strict {
            if let Some((index, s)) = strings
                .iter()
                .enumerate()
                .find(|(_, s)| s.len() > MAX_STRING_LEN)
            {
                return Err(SymdbError::StringTooLong {
                    index,
                    len: s.len(),
                });
            }
        }

        self.reset();
        // Width is picked from the untruncated lengths.
        let width = LengthWidth::for_lengths(strings.iter().map(String::len));
        self.header = BlockHeader::new(count, width.bits());

        self.lengths.reserve(width.table_size(strings.len()));
        let clamped = strings.iter().map(|s| clamp(s).len());
        match width {
            LengthWidth::W8 => length_table::encode::<u8, _>(clamped, &mut self.lengths),
            LengthWidth::W16 => length_table::encode::<u16, _>(clamped, &mut self.lengths),
        }

        let mut truncated = 0usize;
        for (index, s) in strings.iter().enumerate() {
            let kept = clamp(s);
            if kept.len() < s.len() {
                log::warn!(
                    "truncating string at index {} from {} to {} bytes",
                    index,
                    s.len(),
                    kept.len()
                );
                truncated += 1;
            }
            self.body.extend_from_slice(kept);
        }

        let header_bytes = self.header.marshal();
        sink.write_all(&header_bytes)
            .map_err(SymdbError::io(IoPhase::Header))?;
        sink.write_all(&self.lengths)
            .map_err(SymdbError::io(IoPhase::LengthTable))?;
        sink.write_all(&self.body)
            .map_err(SymdbError::io(IoPhase::Body))?;

        log_metric!(
            "event" = "strings_block_encoded",
            "count" = count,
            "width" = width.bits(),
            "body_bytes" = self.body.len(),
            "truncated" = truncated
        );
        Ok(())
    }

    pub fn reset(&mut self) {
        self.header = BlockHeader::default();
        self.lengths.clear();
        self.body.clear();
    }
}

impl BlockEncoder<String> for StringsBlockEncoder {
    fn format(&self) -> SymbolsBlockFormat {
        SymbolsBlockFormat::StringsV1
    }

    fn block_header_size(&self) -> usize {
        BLOCK_HEADER_SIZE
    }

    fn encode(&mut self, sink: &mut dyn Write, elements: &[String]) -> Result<()> {
        StringsBlockEncoder::encode(self, sink, elements)
    }

    fn reset(&mut self) {
        StringsBlockEncoder::reset(self)
    }
}

//==================================================================================
// 2. Decoder
//==================================================================================

/// Reads strings blocks. Every decoded string is an owned copy; nothing
/// returned borrows from the decoder.
#[derive(Debug, Default)]
pub struct StringsBlockDecoder {
    header: BlockHeader,
    header_buf: [u8; BLOCK_HEADER_SIZE],
    table: Vec<u8>,
    lengths: Vec<usize>,
}

impl StringsBlockDecoder {
    /// Creates a decoder for a block carrying `format`. Only `StringsV1` is
    /// accepted; no bytes are read either way.
    pub fn for_format(format: SymbolsBlockFormat) -> Result<Self> {
        match format {
            SymbolsBlockFormat::StringsV1 => Ok(Self::default()),
            other => Err(SymdbError::UnknownFormat(other.tag())),
        }
    }

    /// The header of the most recently read block.
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn decode<R: Read + ?Sized>(&mut self, source: &mut R, out: &mut [String]) -> Result<()> {
        self.header = read_block_header(source, &mut self.header_buf)?;
        let width = LengthWidth::try_from(self.header.encoding_width)?;
        if self.header.element_count as usize != out.len() {
            return Err(SymdbError::SizeMismatch {
                expected: self.header.element_count as usize,
                actual: out.len(),
            });
        }
        match width {
            LengthWidth::W8 => self.decode_strings::<u8, R>(source, out),
            LengthWidth::W16 => self.decode_strings::<u16, R>(source, out),
        }
    }

    fn decode_strings<T: LengthEntry, R: Read + ?Sized>(
        &mut self,
        source: &mut R,
        out: &mut [String],
    ) -> Result<()> {
        self.table.resize(T::WIDTH.table_size(out.len()), 0);
        source
            .read_exact(&mut self.table)
            .map_err(SymdbError::io(IoPhase::LengthTable))?;
        length_table::decode::<T>(&self.table, &mut self.lengths)?;

        for (index, (slot, &len)) in out.iter_mut().zip(&self.lengths).enumerate() {
            let mut bytes = vec![0u8; len];
            source
                .read_exact(&mut bytes)
                .map_err(SymdbError::io(IoPhase::Body))?;
            *slot = match String::from_utf8(bytes) {
                Ok(s) => s,
                // A clamped string can end in the first bytes of a character.
                Err(err) if len == MAX_STRING_LEN && err.utf8_error().error_len().is_none() => {
                    let valid = err.utf8_error().valid_up_to();
                    let mut bytes = err.into_bytes();
                    bytes.truncate(valid);
                    String::from_utf8(bytes)
                        .map_err(|source| SymdbError::InvalidUtf8 { index, source })?
                }
                Err(source) => return Err(SymdbError::InvalidUtf8 { index, source }),
            };
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.header = BlockHeader::default();
        self.table.clear();
        self.lengths.clear();
    }
}

impl BlockDecoder<String> for StringsBlockDecoder {
    fn format(&self) -> SymbolsBlockFormat {
        SymbolsBlockFormat::StringsV1
    }

    fn decode(&mut self, source: &mut dyn Read, out: &mut [String]) -> Result<()> {
        StringsBlockDecoder::decode(self, source, out)
    }

    fn reset(&mut self) {
        StringsBlockDecoder::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_exactly_max_len_bytes() {
        let ascii = "x".repeat(MAX_STRING_LEN + 10);
        assert_eq!(clamp(&ascii).len(), MAX_STRING_LEN);

        // 'é' is two bytes; place one straddling the limit.
        let mut s = "a".repeat(MAX_STRING_LEN - 1);
        s.push('é');
        assert_eq!(s.len(), MAX_STRING_LEN + 1);
        let kept = clamp(&s);
        assert_eq!(kept.len(), MAX_STRING_LEN);
        assert_eq!(kept[MAX_STRING_LEN - 1], "é".as_bytes()[0]);

        assert_eq!(clamp("short"), b"short");
    }

    #[test]
    fn test_strict_mode_writes_nothing() {
        let mut encoder = StringsBlockEncoder::new(TruncationPolicy::Strict);
        let strings = vec!["ok".to_string(), "y".repeat(MAX_STRING_LEN + 1)];
        let mut sink = Vec::new();
        let err = encoder.encode(&mut sink, &strings).unwrap_err();
        assert!(matches!(err, SymdbError::StringTooLong { index: 1, len } if len == MAX_STRING_LEN + 1));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_strict_mode_accepts_max_length() {
        let mut encoder = StringsBlockEncoder::new(TruncationPolicy::Strict);
        let strings = vec!["z".repeat(MAX_STRING_LEN)];
        let mut sink = Vec::new();
        encoder.encode(&mut sink, &strings).unwrap();
        assert_eq!(sink.len(), BLOCK_HEADER_SIZE + 2 + MAX_STRING_LEN);
    }

    #[test]
    fn test_for_format_only_accepts_strings() {
        assert!(StringsBlockDecoder::for_format(SymbolsBlockFormat::StringsV1).is_ok());
        for format in [
            SymbolsBlockFormat::LocationsV1,
            SymbolsBlockFormat::FunctionsV1,
            SymbolsBlockFormat::MappingsV1,
        ] {
            assert!(matches!(
                StringsBlockDecoder::for_format(format),
                Err(SymdbError::UnknownFormat(tag)) if tag == format.tag()
            ));
        }
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut encoder = StringsBlockEncoder::default();
        let strings: Vec<String> = (0..64).map(|i| format!("symbol_{}", i)).collect();
        encoder.encode(&mut Vec::<u8>::new(), &strings).unwrap();
        let capacity = encoder.body.capacity();
        encoder.reset();
        assert!(encoder.body.is_empty());
        assert_eq!(encoder.body.capacity(), capacity);
        assert_eq!(*encoder.header(), BlockHeader::default());
    }
}

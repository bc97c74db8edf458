//! Concrete block codecs and the header they share.
//!
//! Every block starts with the same checksummed `BlockHeader`; what follows it
//! is up to the codec for that symbol kind. Only strings live here today.

pub mod header;
pub mod strings;

pub use header::{read_block_header, BlockHeader};
pub use strings::{StringsBlockDecoder, StringsBlockEncoder};

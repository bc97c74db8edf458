//! This file is the root of the `symdb_codec` crate.
//!
//! The crate encodes and decodes the checksummed blocks a profiling symbol
//! database uses to persist its symbol tables. Strings are the only symbol
//! kind implemented here; the block traits, format tags and decoder registry
//! are shared by every kind.
//!
//! ```
//! use std::io::Cursor;
//! use symdb_codec::{new_strings_decoder, new_strings_encoder, CodecConfig};
//!
//! let names = vec!["main".to_string(), "runtime.mallocgc".to_string()];
//! let mut encoder = new_strings_encoder(&CodecConfig::default()).unwrap();
//! let mut buf = Vec::new();
//! let envelope = encoder.encode(&mut buf, &names).unwrap();
//!
//! let mut decoder = new_strings_decoder(&envelope).unwrap();
//! let decoded = decoder.decode_to_vec(&mut Cursor::new(&buf)).unwrap();
//! assert_eq!(decoded, names);
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod block;
pub mod config;
pub mod error;
pub mod format;
pub mod kernels;
pub mod symbols;
pub mod traits;

//==================================================================================
// 2. Public API
//==================================================================================
pub use block::{BlockHeader, StringsBlockDecoder, StringsBlockEncoder};
pub use config::{CodecConfig, TruncationPolicy};
pub use error::{IoPhase, Result, SymdbError};
pub use format::{SymbolsBlockFormat, SymbolsBlockHeader};
pub use observability::enable_verbose_logging;
pub use symbols::{
    new_strings_decoder, new_strings_encoder, DecoderRegistry, SymbolsDecoder, SymbolsEncoder,
};
pub use traits::{BlockDecoder, BlockEncoder};

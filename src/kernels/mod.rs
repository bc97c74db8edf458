//! Pure, stateless byte-level kernels shared by the block codecs.

pub mod length_table;

pub use length_table::{LengthEntry, LengthWidth};

// In: src/config.rs

//! The single source of truth for symbol codec configuration.
//!
//! `CodecConfig` is created once at the storage engine boundary (usually from
//! a JSON document) and handed to the encoder constructors. Decoders need no
//! configuration: everything they need is in the envelope and block headers.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SymdbError};
use crate::format::DEFAULT_SYMBOLS_BLOCK_SIZE;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// What the strings encoder does with a string longer than 65535 bytes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// **Default:** keep the first 65535 bytes and log a warning. This matches
    /// what existing readers and writers of the format expect.
    #[default]
    Truncate,

    /// Fail the whole block with `SymdbError::StringTooLong` before writing
    /// anything to the sink.
    Strict,
}

//==================================================================================
// II. The Unified CodecConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Number of elements per block. Must be greater than zero.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default)]
    pub truncation: TruncationPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            truncation: TruncationPolicy::default(),
        }
    }
}

impl CodecConfig {
    /// Parses and validates a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(SymdbError::Config("block_size must be greater than zero".into()));
        }
        if self.block_size > u32::MAX as usize {
            return Err(SymdbError::Config(format!(
                "block_size {} does not fit in a u32 element count",
                self.block_size
            )));
        }
        Ok(())
    }
}

/// Provides a sensible default for `block_size` for serde.
fn default_block_size() -> usize {
    DEFAULT_SYMBOLS_BLOCK_SIZE
}

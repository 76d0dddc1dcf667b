//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! an [`Ensemble`](crate::core::units::cache::Ensemble). It provides:
//! 1. **Defaults:** Baseline cache parameters (block size 16B, cache size 8192B,
//!    associativity 1, write-back, write-allocate, word size 4B).
//! 2. **Enums:** Write policy, allocation policy, and the closed set of recognised
//!    `set_param` options.
//! 3. **Settings:** A `Deserialize`-able `Settings` struct for loading a cache
//!    configuration from JSON.
//!
//! `CacheParam` replaces the original C driver's integer parameter codes
//! (`CACHE_PARAM_BLOCK_SIZE`, `CACHE_PARAM_USIZE`, ...) with a closed Rust enum.
//! [`CacheParam::from_name`] re-admits the original's string/integer parameter
//! interface for drivers that read configuration as text (e.g. a settings file),
//! turning an unrecognised name into `ConfigError::UnknownParameter` rather than
//! the original's `exit(-1)`.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the cache simulator.
pub mod defaults {
    /// Default cache block size in bytes.
    pub const BLOCK_SIZE: usize = 16;

    /// Default cache size in bytes (used for unified size, or each of I/D in split mode).
    pub const CACHE_SIZE: usize = 8192;

    /// Default associativity (direct-mapped).
    pub const ASSOCIATIVITY: usize = 1;

    /// Word size in bytes, used to convert blocks to demand-fetch/copy-back word counts.
    pub const WORD_SIZE: usize = 4;
}

/// Whether stores defer to eviction (write-back) or propagate immediately (write-through).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WritePolicy {
    /// Stores mark the line dirty; the write reaches memory only on eviction or flush.
    #[default]
    WriteBack,
    /// Stores propagate to memory immediately; resident lines are never dirty.
    WriteThrough,
}

/// Whether a store miss brings the block into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AllocPolicy {
    /// A store miss fetches the block and installs a line, as a load miss would.
    #[default]
    WriteAllocate,
    /// A store miss writes straight through to memory; the set is left unchanged.
    NoWriteAllocate,
}

/// A single recognised `set_param` configuration option.
///
/// This is the idiomatic replacement for the original C driver's integer
/// parameter codes. Construct directly, or via [`CacheParam::from_name`] when
/// parsing a configuration option supplied as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheParam {
    /// Cache block (line) size in bytes. Recomputes `words_per_block`.
    BlockSize(usize),
    /// Unified cache size in bytes. Selects unified mode.
    USize(usize),
    /// Instruction cache size in bytes. Selects split mode.
    ISize(usize),
    /// Data cache size in bytes. Selects split mode.
    DSize(usize),
    /// Associativity (ways per set).
    Assoc(usize),
    /// Select write-back policy.
    WriteBack,
    /// Select write-through policy.
    WriteThrough,
    /// Select write-allocate policy.
    WriteAlloc,
    /// Select no-write-allocate policy.
    NoWriteAlloc,
}

impl CacheParam {
    /// Parses a recognised parameter name and its integer value.
    ///
    /// `value` is ignored for the four policy-selecting options but still part
    /// of the signature so callers can forward a uniform `(name, value)` pair
    /// the way the original driver did.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownParameter`] for any name outside the
    /// recognised set (`BLOCK_SIZE`, `USIZE`, `ISIZE`, `DSIZE`, `ASSOC`,
    /// `WRITEBACK`, `WRITETHROUGH`, `WRITEALLOC`, `NOWRITEALLOC`).
    pub fn from_name(name: &str, value: usize) -> Result<Self, ConfigError> {
        match name {
            "BLOCK_SIZE" => Ok(Self::BlockSize(value)),
            "USIZE" => Ok(Self::USize(value)),
            "ISIZE" => Ok(Self::ISize(value)),
            "DSIZE" => Ok(Self::DSize(value)),
            "ASSOC" => Ok(Self::Assoc(value)),
            "WRITEBACK" => Ok(Self::WriteBack),
            "WRITETHROUGH" => Ok(Self::WriteThrough),
            "WRITEALLOC" => Ok(Self::WriteAlloc),
            "NOWRITEALLOC" => Ok(Self::NoWriteAlloc),
            other => Err(ConfigError::UnknownParameter(other.to_string())),
        }
    }
}

/// Deserializable cache settings, for drivers that load configuration from a
/// file instead of issuing individual `set_param` calls.
///
/// Every field defaults to the simulator's baseline default when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Cache block size in bytes.
    #[serde(default = "Settings::default_block_size")]
    pub block_size: usize,

    /// Run in split I+D mode instead of unified.
    #[serde(default)]
    pub split: bool,

    /// Unified cache size in bytes (used when `split` is false).
    #[serde(default = "Settings::default_cache_size")]
    pub usize_bytes: usize,

    /// Instruction cache size in bytes (used when `split` is true).
    #[serde(default = "Settings::default_cache_size")]
    pub isize_bytes: usize,

    /// Data cache size in bytes (used when `split` is true).
    #[serde(default = "Settings::default_cache_size")]
    pub dsize_bytes: usize,

    /// Associativity (ways per set).
    #[serde(default = "Settings::default_assoc")]
    pub assoc: usize,

    /// Write policy.
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Allocation policy.
    #[serde(default)]
    pub alloc_policy: AllocPolicy,
}

impl Settings {
    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    fn default_cache_size() -> usize {
        defaults::CACHE_SIZE
    }

    fn default_assoc() -> usize {
        defaults::ASSOCIATIVITY
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            split: false,
            usize_bytes: defaults::CACHE_SIZE,
            isize_bytes: defaults::CACHE_SIZE,
            dsize_bytes: defaults::CACHE_SIZE,
            assoc: defaults::ASSOCIATIVITY,
            write_policy: WritePolicy::default(),
            alloc_policy: AllocPolicy::default(),
        }
    }
}

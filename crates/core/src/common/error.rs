//! Configuration and access-path error types.
//!
//! This module defines the two fatal error kinds the cache simulator can
//! raise: a [`ConfigError`] from `set_param`/`init` when the cache's
//! parameters are invalid, and an [`AccessError`] from
//! `perform_access`/`flush` when the driver misuses the engine (calling it
//! before `init`, or feeding it an unrecognised access-type code). Neither
//! kind is raised for in-band conditions — a miss is not an error, nor is an
//! empty set.

use thiserror::Error;

/// Fatal configuration errors, raised by `set_param` parsing or `init`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `set_param` (or a driver's textual config loader) named a parameter
    /// outside the recognised set.
    #[error("unknown configuration parameter: {0}")]
    UnknownParameter(String),

    /// Block size must be a positive power of two.
    #[error("block size must be a positive power of two, got {0}")]
    BlockSizeNotPowerOfTwo(usize),

    /// Cache size must be nonzero.
    #[error("cache size must be nonzero")]
    ZeroSize,

    /// Associativity must be nonzero.
    #[error("associativity must be nonzero")]
    ZeroAssociativity,

    /// `size` must be an exact multiple of `block_size * associativity`.
    #[error(
        "cache size {size} is not divisible by block_size * associativity ({block_size} * {assoc})"
    )]
    SizeNotDivisible {
        /// The offending cache size, in bytes.
        size: usize,
        /// The configured block size, in bytes.
        block_size: usize,
        /// The configured associativity.
        assoc: usize,
    },

    /// The derived set count (`size / block_size / associativity`) must be a
    /// positive power of two.
    #[error("number of sets must be a positive power of two, got {0}")]
    SetCountNotPowerOfTwo(usize),
}

/// Fatal driver-misuse errors, raised by `perform_access`/`flush`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// `perform_access` or `flush` was called before `init`.
    #[error("perform_access called before init()")]
    NotInitialized,

    /// A trace fed an access-type code outside `{0=INST_LOAD, 1=DATA_LOAD, 2=DATA_STORE}`.
    #[error("unknown access type code: {0}")]
    UnknownAccessType(u8),
}

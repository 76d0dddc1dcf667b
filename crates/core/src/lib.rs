//! Trace-driven set-associative cache simulator library.
//!
//! This crate implements a configurable, single-threaded cache simulator:
//! 1. **Common:** Configuration and driver-misuse error types.
//! 2. **Config:** Defaults, write/allocation policy enums, the `CacheParam`
//!    configuration knobs, and a `Deserialize`-able `Settings` struct.
//! 3. **Core:** The address decoder, per-set intrusive LRU list, cache array,
//!    and the `Ensemble` access engine that a driver holds and drives.
//! 4. **Stats:** Per-bucket statistics and the bit-exact report renderer.

/// Configuration and access-path error types.
pub mod common;
/// Defaults, policy enums, `CacheParam`, and the `Settings` configuration struct.
pub mod config;
/// The cache simulator itself: address decoding, set container, and the access engine.
pub mod core;
/// Per-bucket statistics and report rendering.
pub mod stats;

/// The cache simulator's access engine; construct, configure with `set_param`, `init`, then drive.
pub use crate::core::units::cache::{AccessType, Ensemble};

//! Core simulator components.
//!
//! Nested as `core::units`, reduced to the single unit this crate models:
//! the set-associative cache.

/// Execution units (here: the cache simulator).
pub mod units;

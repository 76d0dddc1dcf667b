//! Execution units.
//!
//! This crate models a single unit: the trace-driven cache simulator.

/// Set-associative cache simulator: address decoder, LRU set container,
/// access engine, and the unified/split ensemble.
pub mod cache;

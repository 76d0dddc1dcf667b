//! Trace-driven set-associative cache simulator.
//!
//! Submodules, from the address up:
//!
//! - [`addr`] — address-to-`(index, tag)` decomposition.
//! - [`set`] — the per-set intrusive LRU list over a reusable slot arena.
//! - [`cache`] — one set-associative array built from `Set`s.
//! - [`ensemble`] — the public access engine: unified or split mode, the
//!   hit/miss/write-policy matrix, and the statistics report.
//!
//! Only [`Ensemble`] and [`AccessType`] are exposed outside the crate; the
//! address decoder, set container, and cache array are implementation
//! details a driver never touches directly.

mod addr;
mod cache;
mod ensemble;
mod set;

pub use ensemble::{AccessType, Ensemble};

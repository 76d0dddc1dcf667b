//! One set-associative cache array.
//!
//! A `Cache` is the set-associative structure parameterised by `size`,
//! `block_size`, and `associativity`: it owns `n_sets` independent [`Set`]s
//! and knows how to decode an address into `(index, tag)`. It has no notion
//! of statistics or write policy — those live in
//! [`super::ensemble::Ensemble`], which drives a `Cache` (or two, in split
//! mode) through the access engine.

use super::addr::{decode, log2_pow2};
use super::set::Set;
use crate::common::error::ConfigError;

/// A single set-associative cache array.
///
/// Invariant: `n_sets * associativity * block_size == size`.
#[derive(Debug, Clone)]
pub(crate) struct Cache {
    sets: Vec<Set>,
    associativity: usize,
    index_mask_offset: u32,
    index_bits: u32,
}

impl Cache {
    /// Validates `(size, block_size, associativity)` and builds a cache with
    /// `n_sets = size / block_size / associativity` empty sets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `size`/`associativity` are zero, if
    /// `block_size` is not a power of two, if `size` is not an exact
    /// multiple of `block_size * associativity`, or if the derived set count
    /// is not a positive power of two.
    pub(crate) fn new(
        size: usize,
        block_size: usize,
        associativity: usize,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(block_size));
        }

        let per_set = block_size * associativity;
        if size % per_set != 0 {
            return Err(ConfigError::SizeNotDivisible {
                size,
                block_size,
                assoc: associativity,
            });
        }

        let n_sets = size / per_set;
        if n_sets == 0 || !n_sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(n_sets));
        }

        Ok(Self {
            sets: (0..n_sets).map(|_| Set::new(associativity)).collect(),
            associativity,
            index_mask_offset: log2_pow2(block_size),
            index_bits: log2_pow2(n_sets),
        })
    }

    /// Decodes `addr` into `(index, tag)`.
    pub(crate) fn decode(&self, addr: u32) -> (usize, u64) {
        decode(addr, self.index_mask_offset, self.index_bits)
    }

    /// Looks up `tag` within set `index`, returning the hit slot if present.
    pub(crate) fn lookup(&self, index: usize, tag: u64) -> Option<usize> {
        self.sets[index].lookup(tag)
    }

    /// Promotes the hit at `(index, slot)` to MRU.
    pub(crate) fn promote(&mut self, index: usize, slot: usize) {
        self.sets[index].promote(slot);
    }

    /// Sets the dirty bit of the line at `(index, slot)`.
    pub(crate) fn set_dirty(&mut self, index: usize, slot: usize, dirty: bool) {
        self.sets[index].set_dirty(slot, dirty);
    }

    /// `true` if set `index` is at capacity and must evict before inserting.
    pub(crate) fn is_full(&self, index: usize) -> bool {
        self.sets[index].is_full()
    }

    /// Evicts the LRU line of set `index`, returning `(tag, dirty)`.
    pub(crate) fn evict(&mut self, index: usize) -> (u64, bool) {
        self.sets[index].evict_lru()
    }

    /// Installs a new line with the given `tag`/`dirty` at MRU in set `index`.
    pub(crate) fn insert_mru(&mut self, index: usize, tag: u64, dirty: bool) -> usize {
        self.sets[index].insert_mru(tag, dirty)
    }

    /// Clears every resident dirty bit across all sets; returns how many
    /// lines were dirty.
    pub(crate) fn flush(&mut self) -> usize {
        self.sets.iter_mut().map(Set::flush_dirty).sum()
    }

    /// Number of sets.
    #[cfg(test)]
    pub(crate) fn n_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity this cache was constructed with.
    pub(crate) fn associativity(&self) -> usize {
        self.associativity
    }
}

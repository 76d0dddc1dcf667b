//! Address decomposition.
//!
//! Splits a 32-bit address into `(index, tag)` given a block size and set
//! count. The low `index_mask_offset` bits (the block offset) are discarded;
//! the next `index_bits` bits select the set; the remainder is the tag.
//!
//! `block_size` and `n_sets` must both be powers of two — callers validate
//! this once, at [`super::Cache::new`], not on every decode.

/// Returns `log2(n)` for a power of two `n`.
///
/// # Panics
///
/// Panics if `n` is zero or not a power of two. Callers validate this
/// invariant before constructing a [`super::Cache`], so it never fires on
/// the access path.
pub(crate) fn log2_pow2(n: usize) -> u32 {
    debug_assert!(n.is_power_of_two(), "{n} is not a power of two");
    n.trailing_zeros()
}

/// Decodes `addr` into `(index, tag)`.
///
/// * `index_mask_offset` — `log2(block_size)`, the number of low bits to discard.
/// * `index_bits` — `log2(n_sets)`, the width of the index field.
pub(crate) fn decode(addr: u32, index_mask_offset: u32, index_bits: u32) -> (usize, u64) {
    let shift = index_mask_offset + index_bits;
    let index_mask = (1u64 << u64::from(index_mask_offset + index_bits)) - 1;
    let addr = u64::from(addr);
    let index = ((addr & index_mask) >> index_mask_offset) as usize;
    let tag = addr >> shift;
    (index, tag)
}

//! Cache statistics collection and bit-exact report formatting.
//!
//! This module tracks per-bucket access/miss/replacement counters and
//! renders the `*** CACHE STATISTICS ***` report text that a driver prints
//! to stdout. The format is reproduced byte-for-byte from the original
//! `print_stats`/`dump_settings` C functions for regression compatibility
//! against reference traces.

use std::fmt::Write as _;

/// One statistics bucket (`inst` or `data`), tracking five counters.
///
/// Invariant: `misses <= accesses` and `replacements <= misses` at every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBucket {
    /// Number of `perform_access` calls routed to this bucket.
    pub accesses: u64,
    /// Number of those accesses that missed.
    pub misses: u64,
    /// Number of misses that evicted a resident line.
    pub replacements: u64,
    /// Word count of read traffic from memory into cache (miss block fetches).
    pub demand_fetches: u64,
    /// Word count of write traffic from cache/CPU to memory.
    pub copies_back: u64,
}

impl StatBucket {
    /// Formats the `miss rate: ... (hit rate ...)` line, or the zero-access
    /// special case, matching `print_stats`'s `%2.4f` formatting exactly.
    fn miss_rate_line(&self) -> String {
        if self.accesses == 0 {
            "  miss rate: 0 (0)\n".to_string()
        } else {
            let miss_rate = self.misses as f64 / self.accesses as f64;
            format!(
                "  miss rate: {:.4} (hit rate {:.4})\n",
                miss_rate,
                1.0 - miss_rate
            )
        }
    }
}

/// Renders one bucket's `accesses`/`misses`/`miss rate`/`replace` block.
pub(crate) fn write_bucket(out: &mut String, bucket: &StatBucket) {
    let _ = writeln!(out, "  accesses:  {}", bucket.accesses);
    let _ = writeln!(out, "  misses:    {}", bucket.misses);
    out.push_str(&bucket.miss_rate_line());
    let _ = writeln!(out, "  replace:   {}", bucket.replacements);
}

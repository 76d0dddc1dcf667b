//! The cache ensemble: lifecycle, routing, and the access engine.
//!
//! An [`Ensemble`] owns either one unified [`Cache`] or a split
//! instruction/data pair, plus the `inst`/`data` [`StatBucket`]s. It is the
//! type a driver holds and passes to every operation — there is no
//! module-level mutable configuration state.

use std::fmt::Write as _;

use tracing::{debug, info};

use super::cache::Cache;
use crate::common::error::{AccessError, ConfigError};
use crate::config::{defaults, AllocPolicy, CacheParam, Settings, WritePolicy};
use crate::stats::{write_bucket, StatBucket};

/// The kind of memory reference fed to [`Ensemble::perform_access`].
///
/// Replaces the original driver's integer access-type codes with a closed
/// enum; [`AccessType::try_from`] re-admits the integer interface for a
/// trace-file driver (unknown codes are a driver-misuse error, not a silent
/// no-op).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch. Always routes to the `inst` bucket and the I-cache.
    InstLoad,
    /// Data load. Routes to the `data` bucket and the D-cache (or unified cache).
    DataLoad,
    /// Data store. Routes to the `data` bucket; subject to the write policy matrix.
    DataStore,
}

impl TryFrom<u8> for AccessType {
    type Error = AccessError;

    /// Parses the Dinero-style trace encoding (`0`=data load, `1`=data store, `2`=instruction fetch).
    fn try_from(code: u8) -> Result<Self, AccessError> {
        match code {
            0 => Ok(Self::DataLoad),
            1 => Ok(Self::DataStore),
            2 => Ok(Self::InstLoad),
            other => Err(AccessError::UnknownAccessType(other)),
        }
    }
}

/// The allocated cache(s): one unified array, or an independent I+D pair.
#[derive(Debug, Clone)]
enum Mode {
    Unified(Cache),
    Split { icache: Cache, dcache: Cache },
}

/// A configurable set-associative cache ensemble: unified or split I+D,
/// driving the access engine.
///
/// Configuration knobs are plain mutable fields, set via [`Ensemble::set_param`]
/// before [`Ensemble::init`]. `perform_access` and `flush` require `init` to
/// have run first; calling them earlier is a driver-misuse [`AccessError`].
#[derive(Debug, Clone)]
pub struct Ensemble {
    block_size: usize,
    words_per_block: usize,
    split: bool,
    usize_bytes: usize,
    isize_bytes: usize,
    dsize_bytes: usize,
    assoc: usize,
    write_policy: WritePolicy,
    alloc_policy: AllocPolicy,
    mode: Option<Mode>,
    inst: StatBucket,
    data: StatBucket,
}

impl Default for Ensemble {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            words_per_block: defaults::BLOCK_SIZE / defaults::WORD_SIZE,
            split: false,
            usize_bytes: defaults::CACHE_SIZE,
            isize_bytes: defaults::CACHE_SIZE,
            dsize_bytes: defaults::CACHE_SIZE,
            assoc: defaults::ASSOCIATIVITY,
            write_policy: WritePolicy::default(),
            alloc_policy: AllocPolicy::default(),
            mode: None,
            inst: StatBucket::default(),
            data: StatBucket::default(),
        }
    }
}

impl Ensemble {
    /// Creates an ensemble from a fully-formed [`Settings`] value, e.g. one
    /// deserialized from a driver's configuration file.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            block_size: settings.block_size,
            words_per_block: settings.block_size / defaults::WORD_SIZE,
            split: settings.split,
            usize_bytes: settings.usize_bytes,
            isize_bytes: settings.isize_bytes,
            dsize_bytes: settings.dsize_bytes,
            assoc: settings.assoc,
            write_policy: settings.write_policy,
            alloc_policy: settings.alloc_policy,
            mode: None,
            inst: StatBucket::default(),
            data: StatBucket::default(),
        }
    }

    /// Mutates one configuration knob. Has no effect on
    /// already-allocated caches until the next [`Ensemble::init`].
    pub fn set_param(&mut self, param: CacheParam) {
        match param {
            CacheParam::BlockSize(v) => {
                self.block_size = v;
                self.words_per_block = v / defaults::WORD_SIZE;
            }
            CacheParam::USize(v) => {
                self.split = false;
                self.usize_bytes = v;
            }
            CacheParam::ISize(v) => {
                self.split = true;
                self.isize_bytes = v;
            }
            CacheParam::DSize(v) => {
                self.split = true;
                self.dsize_bytes = v;
            }
            CacheParam::Assoc(v) => self.assoc = v,
            CacheParam::WriteBack => self.write_policy = WritePolicy::WriteBack,
            CacheParam::WriteThrough => self.write_policy = WritePolicy::WriteThrough,
            CacheParam::WriteAlloc => self.alloc_policy = AllocPolicy::WriteAllocate,
            CacheParam::NoWriteAlloc => self.alloc_policy = AllocPolicy::NoWriteAllocate,
        }
    }

    /// Allocates sets per the current parameters and zeroes all statistics.
    /// Must be called before the first `perform_access`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the current parameters don't satisfy the
    /// cache-shape invariants (see [`Cache::new`]).
    pub fn init(&mut self) -> Result<(), ConfigError> {
        self.mode = Some(if self.split {
            Mode::Split {
                icache: Cache::new(self.isize_bytes, self.block_size, self.assoc)?,
                dcache: Cache::new(self.dsize_bytes, self.block_size, self.assoc)?,
            }
        } else {
            Mode::Unified(Cache::new(self.usize_bytes, self.block_size, self.assoc)?)
        });
        self.inst = StatBucket::default();
        self.data = StatBucket::default();
        Ok(())
    }

    /// Performs one memory reference: lookup, hit/miss handling, write
    /// policy, and statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotInitialized`] if called before `init`.
    pub fn perform_access(&mut self, addr: u32, access_type: AccessType) -> Result<(), AccessError> {
        let words_per_block = self.words_per_block as u64;
        let write_back = self.write_policy == WritePolicy::WriteBack;
        let write_alloc = self.alloc_policy == AllocPolicy::WriteAllocate;

        let mode = self.mode.as_mut().ok_or(AccessError::NotInitialized)?;
        let cache = match (access_type, mode) {
            (AccessType::InstLoad, Mode::Split { icache, .. }) => icache,
            (AccessType::InstLoad, Mode::Unified(c)) => c,
            (_, Mode::Split { dcache, .. }) => dcache,
            (_, Mode::Unified(c)) => c,
        };

        let bucket = if access_type == AccessType::InstLoad {
            &mut self.inst
        } else {
            &mut self.data
        };
        bucket.accesses += 1;

        let (index, tag) = cache.decode(addr);

        if let Some(slot) = cache.lookup(index, tag) {
            // Hit path: promotion is mandatory for every access type.
            cache.promote(index, slot);
            if access_type == AccessType::DataStore {
                if write_back {
                    cache.set_dirty(index, slot, true);
                } else {
                    bucket.copies_back += 1;
                }
            }
            return Ok(());
        }

        // Miss path.
        bucket.misses += 1;

        match access_type {
            AccessType::InstLoad | AccessType::DataLoad => {
                bucket.demand_fetches += words_per_block;
                Self::evict_if_full(cache, index, bucket, words_per_block);
                cache.insert_mru(index, tag, false);
            }
            AccessType::DataStore if write_alloc => {
                bucket.demand_fetches += words_per_block;
                Self::evict_if_full(cache, index, bucket, words_per_block);
                cache.insert_mru(index, tag, write_back);
                if !write_back {
                    bucket.copies_back += 1;
                }
            }
            AccessType::DataStore => {
                // No-write-allocate: the set is left unchanged, not counted as a replacement.
                bucket.copies_back += 1;
            }
        }

        Ok(())
    }

    /// Shared full-set eviction protocol for load misses and write-allocate
    /// store misses: evicting a dirty line writes it back regardless of the
    /// current write policy.
    fn evict_if_full(cache: &mut Cache, index: usize, bucket: &mut StatBucket, words_per_block: u64) {
        if cache.is_full(index) {
            let (tag, dirty) = cache.evict(index);
            if dirty {
                bucket.copies_back += words_per_block;
            }
            bucket.replacements += 1;
            debug!(index, evicted_tag = tag, dirty, "evicted LRU line");
        }
    }

    /// Flushes all resident lines: every dirty line adds `words_per_block`
    /// to `data.copies_back` and is cleared; lines remain resident but
    /// clean. Attributed to `data` even in split mode, matching the
    /// original source's `flush()`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotInitialized`] if called before `init`.
    pub fn flush(&mut self) -> Result<(), AccessError> {
        let words_per_block = self.words_per_block as u64;
        let mode = self.mode.as_mut().ok_or(AccessError::NotInitialized)?;
        let dirty_lines = match mode {
            Mode::Unified(cache) => cache.flush(),
            Mode::Split { icache, dcache } => icache.flush() + dcache.flush(),
        };
        self.data.copies_back += dirty_lines as u64 * words_per_block;
        info!(dirty_lines, words_per_block, "flushed dirty lines to memory");
        Ok(())
    }

    /// Renders the settings + statistics report.
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str("*** CACHE SETTINGS ***\n");
        if self.split {
            out.push_str("  Split I- D-cache\n");
            let _ = writeln!(out, "  I-cache size: {}", self.isize_bytes);
            let _ = writeln!(out, "  D-cache size: {}", self.dsize_bytes);
        } else {
            out.push_str("  Unified I- D-cache\n");
            let _ = writeln!(out, "  Size: {}", self.usize_bytes);
        }
        let _ = writeln!(out, "  Associativity: {}", self.assoc);
        let _ = writeln!(out, "  Block size: {}", self.block_size);
        let _ = writeln!(
            out,
            "  Write policy: {}",
            if self.write_policy == WritePolicy::WriteBack {
                "WRITE BACK"
            } else {
                "WRITE THROUGH"
            }
        );
        let _ = writeln!(
            out,
            "  Allocation policy: {}",
            if self.alloc_policy == AllocPolicy::WriteAllocate {
                "WRITE ALLOCATE"
            } else {
                "WRITE NO ALLOCATE"
            }
        );

        out.push('\n');
        out.push_str("*** CACHE STATISTICS ***\n");
        out.push_str(" INSTRUCTIONS\n");
        write_bucket(&mut out, &self.inst);
        out.push_str(" DATA\n");
        write_bucket(&mut out, &self.data);
        out.push_str(" TRAFFIC (in words)\n");
        let _ = writeln!(
            out,
            "  demand fetch:  {}",
            self.inst.demand_fetches + self.data.demand_fetches
        );
        let _ = writeln!(
            out,
            "  copies back:   {}",
            self.inst.copies_back + self.data.copies_back
        );
        out
    }

    /// The `inst` statistics bucket, for drivers that want raw counters
    /// instead of (or in addition to) the rendered report.
    pub fn inst_stats(&self) -> StatBucket {
        self.inst
    }

    /// The `data` statistics bucket.
    pub fn data_stats(&self) -> StatBucket {
        self.data
    }
}

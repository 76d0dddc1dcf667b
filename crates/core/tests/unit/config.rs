//! Configuration parsing and validation tests.
//!
//! Covers `CacheParam::from_name`'s textual parameter interface and the
//! `ConfigError` variants surfaced through `Ensemble::init`.

use cachesim_core::common::ConfigError;
use cachesim_core::config::CacheParam;
use cachesim_core::Ensemble;

// ══════════════════════════════════════════════════════════
// CacheParam::from_name
// ══════════════════════════════════════════════════════════

#[test]
fn from_name_recognises_every_documented_parameter() {
    assert_eq!(
        CacheParam::from_name("BLOCK_SIZE", 32),
        Ok(CacheParam::BlockSize(32))
    );
    assert_eq!(CacheParam::from_name("USIZE", 4096), Ok(CacheParam::USize(4096)));
    assert_eq!(CacheParam::from_name("ISIZE", 2048), Ok(CacheParam::ISize(2048)));
    assert_eq!(CacheParam::from_name("DSIZE", 2048), Ok(CacheParam::DSize(2048)));
    assert_eq!(CacheParam::from_name("ASSOC", 4), Ok(CacheParam::Assoc(4)));
    assert_eq!(CacheParam::from_name("WRITEBACK", 0), Ok(CacheParam::WriteBack));
    assert_eq!(
        CacheParam::from_name("WRITETHROUGH", 0),
        Ok(CacheParam::WriteThrough)
    );
    assert_eq!(CacheParam::from_name("WRITEALLOC", 0), Ok(CacheParam::WriteAlloc));
    assert_eq!(
        CacheParam::from_name("NOWRITEALLOC", 0),
        Ok(CacheParam::NoWriteAlloc)
    );
}

#[test]
fn from_name_rejects_unknown_parameter() {
    let err = CacheParam::from_name("CACHE_PARAM_NONSENSE", 1).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownParameter("CACHE_PARAM_NONSENSE".to_string())
    );
}

// ══════════════════════════════════════════════════════════
// Ensemble::init validation
// ══════════════════════════════════════════════════════════

#[test]
fn init_rejects_zero_sized_cache() {
    let mut ensemble = Ensemble::default();
    ensemble.set_param(CacheParam::USize(0));
    assert_eq!(ensemble.init(), Err(ConfigError::ZeroSize));
}

#[test]
fn init_rejects_non_power_of_two_block_size() {
    let mut ensemble = Ensemble::default();
    ensemble.set_param(CacheParam::BlockSize(24));
    assert_eq!(
        ensemble.init(),
        Err(ConfigError::BlockSizeNotPowerOfTwo(24))
    );
}

#[test]
fn init_rejects_non_power_of_two_set_count() {
    let mut ensemble = Ensemble::default();
    // 96 bytes / 16-byte blocks / 1-way => 6 sets, not a power of two.
    ensemble.set_param(CacheParam::USize(96));
    ensemble.set_param(CacheParam::BlockSize(16));
    ensemble.set_param(CacheParam::Assoc(1));
    assert_eq!(ensemble.init(), Err(ConfigError::SetCountNotPowerOfTwo(6)));
}

#[test]
fn defaults_match_documented_values() {
    let mut ensemble = Ensemble::default();
    ensemble.init().expect("documented defaults are valid");
    let report = ensemble.report();
    assert!(report.contains("  Size: 8192\n"));
    assert!(report.contains("  Block size: 16\n"));
    assert!(report.contains("  Associativity: 1\n"));
    assert!(report.contains("  Write policy: WRITE BACK\n"));
    assert!(report.contains("  Allocation policy: WRITE ALLOCATE\n"));
}

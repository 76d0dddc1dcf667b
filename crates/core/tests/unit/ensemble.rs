//! Access-engine end-to-end scenarios, exercised through the public API only.
//!
//! The concrete scenarios here mirror the ones exercised in-crate against
//! private internals; these instead drive everything through `Ensemble`,
//! `AccessType`, and `config`, the way the `cachesim-cli` driver does.

use cachesim_core::common::AccessError;
use cachesim_core::config::CacheParam;
use cachesim_core::{AccessType, Ensemble};
use pretty_assertions::assert_eq;

fn direct_mapped(size: usize, block_size: usize) -> Ensemble {
    let mut ensemble = Ensemble::default();
    ensemble.set_param(CacheParam::USize(size));
    ensemble.set_param(CacheParam::BlockSize(block_size));
    ensemble.set_param(CacheParam::Assoc(1));
    ensemble.init().expect("valid shape");
    ensemble
}

// ══════════════════════════════════════════════════════════
// Driver misuse
// ══════════════════════════════════════════════════════════

#[test]
fn access_before_init_is_fatal() {
    let mut ensemble = Ensemble::default();
    let err = ensemble
        .perform_access(0, AccessType::DataLoad)
        .unwrap_err();
    assert_eq!(err, AccessError::NotInitialized);
}

#[test]
fn unrecognised_access_type_code_is_rejected() {
    let err = AccessType::try_from(7u8).unwrap_err();
    assert_eq!(err, AccessError::UnknownAccessType(7));
}

// ══════════════════════════════════════════════════════════
// Repeated trace replay yields identical reports
// ══════════════════════════════════════════════════════════

#[test]
fn replaying_the_same_trace_is_deterministic() {
    let trace = [
        (AccessType::DataLoad, 0x0u32),
        (AccessType::DataStore, 0x10),
        (AccessType::DataLoad, 0x20),
        (AccessType::DataLoad, 0x0),
    ];

    let run = || {
        let mut e = direct_mapped(16, 4);
        for &(kind, addr) in &trace {
            e.perform_access(addr, kind).unwrap();
        }
        e.flush().unwrap();
        e.report()
    };

    assert_eq!(run(), run());
}

// ══════════════════════════════════════════════════════════
// A fresh repeat of an address is a hit, unless displaced
// ══════════════════════════════════════════════════════════

#[test]
fn repeat_access_without_intervening_conflict_is_a_hit() {
    let mut e = direct_mapped(64, 16); // 4 sets, direct-mapped.
    e.perform_access(0x0, AccessType::DataLoad).unwrap();
    e.perform_access(0x0, AccessType::DataLoad).unwrap();
    assert_eq!(e.data_stats().accesses, 2);
    assert_eq!(e.data_stats().misses, 1);
}

#[test]
fn split_mode_keeps_independent_statistics_and_caches() {
    let mut e = Ensemble::default();
    e.set_param(CacheParam::ISize(32));
    e.set_param(CacheParam::DSize(32));
    e.set_param(CacheParam::BlockSize(16));
    e.set_param(CacheParam::Assoc(1));
    e.init().unwrap();

    e.perform_access(0x0, AccessType::InstLoad).unwrap();
    e.perform_access(0x0, AccessType::InstLoad).unwrap();
    e.perform_access(0x0, AccessType::DataLoad).unwrap();

    assert_eq!(e.inst_stats().accesses, 2);
    assert_eq!(e.inst_stats().misses, 1);
    assert_eq!(e.data_stats().accesses, 1);
    assert_eq!(e.data_stats().misses, 1);
}

// ══════════════════════════════════════════════════════════
// Report formatting
// ══════════════════════════════════════════════════════════

#[test]
fn split_report_names_each_cache_independently() {
    let mut e = Ensemble::default();
    e.set_param(CacheParam::ISize(32));
    e.set_param(CacheParam::DSize(64));
    e.set_param(CacheParam::BlockSize(16));
    e.set_param(CacheParam::Assoc(1));
    e.init().unwrap();

    let report = e.report();
    assert!(report.contains("  Split I- D-cache\n"));
    assert!(report.contains("  I-cache size: 32\n"));
    assert!(report.contains("  D-cache size: 64\n"));
}

#[test]
fn traffic_totals_sum_instruction_and_data_buckets() {
    let mut e = direct_mapped(16, 4);
    e.perform_access(0x0, AccessType::DataLoad).unwrap(); // miss, fetches 1 word
    e.perform_access(0x10, AccessType::DataLoad).unwrap(); // miss, fetches 1 word, evicts
    let report = e.report();
    assert!(report.contains("  demand fetch:  2\n"));
}

//! Property tests over arbitrary access sequences.
//!
//! A small, fixed cache shape (16 sets, 2-way, 4-byte blocks) is driven with
//! randomly generated sequences of `(access_type, addr)` pairs restricted to
//! a small address range, so sets see realistic contention without the
//! property tests needing to reason about the full `u32` space.

use proptest::prelude::*;

use cachesim_core::config::CacheParam;
use cachesim_core::{AccessType, Ensemble};

fn fresh_ensemble() -> Ensemble {
    let mut ensemble = Ensemble::default();
    ensemble.set_param(CacheParam::USize(128));
    ensemble.set_param(CacheParam::BlockSize(4));
    ensemble.set_param(CacheParam::Assoc(2));
    ensemble.init().expect("128/4/2 is a valid shape");
    ensemble
}

fn access_type_strategy() -> impl Strategy<Value = AccessType> {
    prop_oneof![
        Just(AccessType::InstLoad),
        Just(AccessType::DataLoad),
        Just(AccessType::DataStore),
    ]
}

proptest! {
    /// Invariant 1 (spec §8): `misses <= accesses` and `replacements <= misses`
    /// in both buckets after every access in the sequence.
    #[test]
    fn misses_and_replacements_never_exceed_their_bound(
        ops in prop::collection::vec((access_type_strategy(), 0u32..64), 0..200)
    ) {
        let mut e = fresh_ensemble();
        for (kind, addr) in ops {
            e.perform_access(addr, kind).unwrap();
            for bucket in [e.inst_stats(), e.data_stats()] {
                prop_assert!(bucket.misses <= bucket.accesses);
                prop_assert!(bucket.replacements <= bucket.misses);
            }
        }
    }

    /// Invariant 5 (spec §8): `demand_fetches` only ever grows, and grows by
    /// whole blocks (1 word per block here).
    #[test]
    fn demand_fetches_is_non_decreasing(
        ops in prop::collection::vec((access_type_strategy(), 0u32..64), 0..200)
    ) {
        let mut e = fresh_ensemble();
        let mut prev_inst = 0u64;
        let mut prev_data = 0u64;
        for (kind, addr) in ops {
            e.perform_access(addr, kind).unwrap();
            prop_assert!(e.inst_stats().demand_fetches >= prev_inst);
            prop_assert!(e.data_stats().demand_fetches >= prev_data);
            prev_inst = e.inst_stats().demand_fetches;
            prev_data = e.data_stats().demand_fetches;
        }
    }

    /// Round-trip (spec §8): a second flush immediately after the first adds
    /// nothing further to `copies_back`.
    #[test]
    fn second_consecutive_flush_is_a_no_op(
        ops in prop::collection::vec((access_type_strategy(), 0u32..64), 0..100)
    ) {
        let mut e = fresh_ensemble();
        for (kind, addr) in ops {
            e.perform_access(addr, kind).unwrap();
        }
        e.flush().unwrap();
        let after_first = e.data_stats().copies_back;
        e.flush().unwrap();
        prop_assert_eq!(e.data_stats().copies_back, after_first);
    }

    /// Replaying an identical sequence from a fresh ensemble is deterministic.
    #[test]
    fn identical_sequences_produce_identical_reports(
        ops in prop::collection::vec((access_type_strategy(), 0u32..64), 0..100)
    ) {
        let run = |ops: &[(AccessType, u32)]| {
            let mut e = fresh_ensemble();
            for &(kind, addr) in ops {
                e.perform_access(addr, kind).unwrap();
            }
            e.flush().unwrap();
            e.report()
        };
        prop_assert_eq!(run(&ops), run(&ops));
    }
}

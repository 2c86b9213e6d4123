// ==============================================
// REFERENCE SCENARIOS (integration)
// ==============================================
//
// Small hand-checked traces replayed through the public API, the same way
// the comparison runner and the binary drive the policies.

use evictkit::builder::{PolicyKind, SimulatorBuilder};
use evictkit::compare::Comparison;
use evictkit::error::CacheError;
use evictkit::policy::arc::{ArcCache, ArcList};
use evictkit::policy::ideal::IdealCache;
use evictkit::policy::lru::LruCache;
use evictkit::traits::{HitCounter, ReadOnlyCache, TraceReplay};

fn double(key: &i64) -> i64 {
    key * 2
}

fn replay_lru(capacity: usize, trace: &[i64]) -> LruCache<i64, i64> {
    let mut cache = LruCache::new(capacity);
    for &key in trace {
        cache.lookup_update(key, double);
    }
    cache
}

fn replay_arc(capacity: usize, trace: &[i64]) -> ArcCache<i64, i64> {
    let mut cache = ArcCache::new(capacity);
    for &key in trace {
        cache.lookup_update(key, double).unwrap();
    }
    cache
}

fn ideal_hits(capacity: usize, trace: &[i64]) -> u64 {
    let mut ideal = IdealCache::new(capacity);
    for &key in trace {
        ideal.lookup_update(key);
    }
    ideal.hits()
}

#[test]
fn lru_all_misses() {
    let cache = replay_lru(2, &[1, 2, 3]);
    assert_eq!(cache.hits(), 0);
    assert_eq!(cache.requests(), 3);
    let mut resident: Vec<_> = cache.keys_mru().copied().collect();
    resident.sort_unstable();
    assert_eq!(resident, vec![2, 3]);
}

#[test]
fn lru_reuse() {
    let cache = replay_lru(2, &[1, 2, 1, 3, 1]);
    assert_eq!(cache.hits(), 2);
    let mut resident: Vec<_> = cache.keys_mru().copied().collect();
    resident.sort_unstable();
    assert_eq!(resident, vec![1, 3]);
    assert_eq!(cache.peek(&1), Some(&2));
    assert_eq!(cache.peek(&3), Some(&6));
}

#[test]
fn arc_promotion_to_frequency_list() {
    let cache = replay_arc(2, &[1, 1, 2, 2]);
    assert_eq!(cache.hits(), 2);
    assert_eq!(cache.residency(&1), Some(ArcList::T2));
    assert_eq!(cache.residency(&2), Some(ArcList::T2));
    assert_eq!(cache.t1_len(), 0);
    assert_eq!(cache.b1_len() + cache.b2_len(), 0);
    assert!(cache.check_invariants().is_ok());
}

#[test]
fn cyclic_trace_defeats_lru_but_not_the_oracle() {
    let trace = [1, 2, 3, 1, 2, 3];
    assert_eq!(replay_lru(2, &trace).hits(), 0);
    assert_eq!(ideal_hits(2, &trace), 2);
}

#[test]
fn oracle_beats_lru_on_mixed_reuse() {
    let trace = [1, 2, 1, 3, 1, 2];
    let lru = replay_lru(2, &trace).hits();
    let ideal = ideal_hits(2, &trace);
    assert_eq!(lru, 2);
    assert!(ideal >= 2);
    assert!(ideal > lru);
}

#[test]
fn arc_ghost_hit_shifts_target() {
    let mut cache = replay_arc(2, &[1, 1, 2, 3]);
    assert_eq!(cache.residency(&2), Some(ArcList::B1));
    assert_eq!(cache.p_value(), 0);

    cache.lookup_update(2, double).unwrap();
    assert_eq!(cache.p_value(), 1);
    assert_eq!(cache.residency(&2), Some(ArcList::T2));
    assert_eq!(cache.peek(&2), Some(&4));
    assert!(cache.check_invariants().is_ok());
}

#[test]
fn failed_fetch_changes_nothing() {
    let mut cache = replay_arc(2, &[1, 2]);
    let err = cache
        .try_lookup_update(9, |_| Err::<i64, _>("disk offline"))
        .unwrap_err();
    assert_eq!(err, CacheError::Fetch("disk offline"));
    assert_eq!(cache.requests(), 2);
    assert!(!cache.contains(&9));
    assert_eq!(cache.keys(ArcList::T1).copied().collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn simulators_agree_with_direct_use() {
    let trace = [4i64, 5, 4, 6, 7, 4, 5, 6];
    let builder = SimulatorBuilder::new(3);

    for kind in PolicyKind::ALL {
        let mut sim = builder.build(kind, double).unwrap();
        for key in &trace {
            sim.replay(key).unwrap();
        }
        let expected = match kind {
            PolicyKind::Arc => replay_arc(3, &trace).hits(),
            PolicyKind::Lru => replay_lru(3, &trace).hits(),
            PolicyKind::Ideal => ideal_hits(3, &trace),
        };
        assert_eq!(sim.hits(), expected, "{}", sim.policy_name());
        assert_eq!(sim.requests(), trace.len() as u64);
    }
}

#[test]
fn comparison_report_matches_individual_runs() {
    let trace = [1i64, 2, 1, 3, 1, 2];
    let report = Comparison::new(2).run(&trace, double).unwrap();

    let arc = replay_arc(2, &trace).hits();
    let lru = replay_lru(2, &trace).hits();
    let ideal = ideal_hits(2, &trace);
    assert_eq!(report.render_compact(), format!("{arc}\n{lru}\n{ideal}\n"));
    assert!(report.outcomes().iter().all(|o| o.requests == 6));
}

#[test]
fn read_only_views_agree() {
    let arc = replay_arc(3, &[1, 2, 3, 4]);
    let lru = replay_lru(3, &[1, 2, 3, 4]);
    let views: [&dyn ReadOnlyCache<i64>; 2] = [&arc, &lru];
    for view in views {
        assert_eq!(view.len(), 3);
        assert_eq!(view.capacity(), 3);
        assert!(!view.contains(&1));
        assert!(view.contains(&4));
    }
}

/// Deterministic pseudo-random keys in `[0, modulus)` (64-bit LCG).
fn lcg_trace(count: usize, seed: u64, modulus: u64) -> Vec<i64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) % modulus) as i64
        })
        .collect()
}

#[test]
fn golden_hit_counts_on_pseudo_random_traces() {
    let small = lcg_trace(1_000, 275, 31);
    assert_eq!(&small[..5], &[27, 7, 14, 9, 26]);

    let arc = replay_arc(15, &small);
    assert_eq!(arc.hits(), 479);
    assert_eq!(arc.p_value(), 2);
    assert_eq!(
        (arc.t1_len(), arc.t2_len(), arc.b1_len(), arc.b2_len()),
        (1, 14, 0, 15)
    );
    assert_eq!(replay_lru(15, &small).hits(), 479);
    assert_eq!(ideal_hits(15, &small), 749);

    let wide = lcg_trace(2_000, 275, 120);
    let arc = replay_arc(30, &wide);
    assert_eq!(arc.hits(), 480);
    assert_eq!(arc.p_value(), 8);
    assert_eq!(
        (arc.t1_len(), arc.t2_len(), arc.b1_len(), arc.b2_len()),
        (7, 23, 21, 9)
    );
    assert_eq!(replay_lru(30, &wide).hits(), 480);
    assert_eq!(ideal_hits(30, &wide), 1_147);
}

#[test]
fn capacity_far_beyond_trace_size() {
    let trace = [1i64, 2, 1];
    let report = Comparison::new(usize::MAX / 2).run(&trace, double).unwrap();
    assert_eq!(report.render_compact(), "1\n1\n1\n");
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use evictkit::policy::arc::ArcCache;
use evictkit::policy::ideal::{IdealCache, optimal_hits};
use evictkit::policy::lru::LruCache;

// The offline optimum bounds every online policy on the same trace
//
// First byte picks the capacity, the rest is the reference trace.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, trace)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 16) + 1;

    let mut arc = ArcCache::new(capacity);
    let mut lru = LruCache::new(capacity);
    let mut ideal = IdealCache::new(capacity);
    for &key in trace {
        arc.lookup_update(key, |k| *k).unwrap();
        lru.lookup_update(key, |k| *k);
        ideal.lookup_update(key);
    }

    let best = ideal.hits();
    assert_eq!(best, ideal.hits());
    assert_eq!(best, optimal_hits(trace, capacity));
    assert!(best <= trace.len() as u64);
    assert!(arc.hits() <= best);
    assert!(lru.hits() <= best);
    assert!(best <= optimal_hits(trace, capacity + 1));
});

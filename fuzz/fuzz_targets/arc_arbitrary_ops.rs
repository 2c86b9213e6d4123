#![no_main]

use libfuzzer_sys::fuzz_target;
use evictkit::policy::arc::ArcCache;

// Fuzz arbitrary lookup sequences on ArcCache
//
// First byte picks the capacity; each following pair is (op, key). Ops cover
// successful lookups, failing fetches, peek and clear. Structural invariants
// are checked after every operation.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 32) + 1;
    let mut cache: ArcCache<u8, u16> = ArcCache::new(capacity);

    for pair in rest.chunks_exact(2) {
        let (op, key) = (pair[0] % 8, pair[1] % 64);
        let (hits, requests) = (cache.hits(), cache.requests());

        match op {
            0..=4 => {
                // lookup_update
                let was_resident = cache.contains(&key);
                let page = *cache.lookup_update(key, |k| u16::from(*k) * 3).unwrap();
                assert_eq!(page, u16::from(key) * 3);
                assert_eq!(cache.requests(), requests + 1);
                assert_eq!(cache.hits(), hits + u64::from(was_resident));
            }
            5 => {
                // failing fetch
                let before: Vec<_> = cache.residency(&key).into_iter().collect();
                let p = cache.p_value();
                if cache.try_lookup_update(key, |_| Err(())).is_err() {
                    assert_eq!(cache.requests(), requests);
                    assert_eq!(cache.p_value(), p);
                    let after: Vec<_> = cache.residency(&key).into_iter().collect();
                    assert_eq!(before, after);
                }
            }
            6 => {
                // peek
                if let Some(page) = cache.peek(&key) {
                    assert_eq!(*page, u16::from(key) * 3);
                    assert!(cache.contains(&key));
                }
            }
            _ => {
                // clear
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                    assert_eq!(cache.p_value(), 0);
                }
            }
        }

        assert!(cache.check_invariants().is_ok());
        assert!(cache.len() <= capacity);
        assert!(cache.t1_len() + cache.b1_len() <= capacity);
        assert!(cache.len() + cache.b1_len() + cache.b2_len() <= 2 * capacity);
    }
});

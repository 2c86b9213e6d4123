//! Walks an ARC cache through promotion, ghost hits and adaptation of `p`.
//!
//! Run with: cargo run --example basic_arc

use evictkit::policy::arc::{ArcCache, ArcList};

fn show(cache: &ArcCache<u32, u32>, step: &str) {
    println!("{step}");
    for list in ArcList::ALL {
        let keys: Vec<_> = cache.keys(list).collect();
        println!("   {list}: {keys:?}");
    }
    println!("   p = {}", cache.p_value());
}

fn main() {
    let mut cache = ArcCache::new(2);
    let fetch = |k: &u32| k * 100;

    for key in [1, 1, 2] {
        let _ = cache.lookup_update(key, fetch);
    }
    show(&cache, "1. after 1, 1, 2 (key 1 promoted to T2)");

    let _ = cache.lookup_update(3, fetch);
    show(&cache, "2. after 3 (key 2 demoted to ghost list B1)");

    let _ = cache.lookup_update(2, fetch);
    show(&cache, "3. after 2 (B1 ghost hit grows p, key 1 demoted to B2)");

    let _ = cache.lookup_update(1, fetch);
    show(&cache, "4. after 1 (B2 ghost hit shrinks p)");

    println!(
        "hits: {} out of {} requests",
        cache.hits(),
        cache.requests()
    );
    match cache.check_invariants() {
        Ok(()) => println!("invariants hold"),
        Err(err) => println!("{err}"),
    }
}

// Expected output (final state):
//    T1: []
//    T2: [1, 2]
//    B1: [3]
//    B2: []
//    p = 0
// hits: 1 out of 6 requests
// invariants hold

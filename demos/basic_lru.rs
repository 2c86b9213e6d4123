use evictkit::policy::lru::LruCache;

fn main() {
    let mut cache: LruCache<u32, String> = LruCache::new(2);

    cache.lookup_update(1, |k| format!("page-{k}"));
    cache.lookup_update(2, |k| format!("page-{k}"));

    if cache.lookup_update(1, |k| format!("page-{k}")) {
        println!("hit 1: {}", cache.peek(&1).map_or("", String::as_str));
    }

    cache.lookup_update(3, |k| format!("page-{k}"));

    println!("contains 2? {}", cache.contains(&2));
    println!("hits: {} out of {} requests", cache.hits(), cache.requests());
}

// Expected output:
// hit 1: page-1
// contains 2? false
// hits: 1 out of 4 requests
//
// Explanation: capacity=2; the hit on 1 makes it MRU and key 2 LRU.
// Looking up key 3 fetches its page and evicts key 2.

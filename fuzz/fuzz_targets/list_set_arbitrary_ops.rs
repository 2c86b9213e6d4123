#![no_main]

use libfuzzer_sys::fuzz_target;
use evictkit::ds::ListSet;

// Fuzz arbitrary operation sequences on a four-list ListSet
//
// Tests push_front, pop_back, remove, move_to_front across lists and clear,
// validating the shared arena after every step.
fuzz_target!(|data: &[u8]| {
    let mut set: ListSet<u32, 4> = ListSet::new();
    let mut ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 6;
        let list = usize::from(pair[0] >> 4) % 4;
        let value = u32::from(pair[1]);

        match op {
            0 | 1 => {
                // push_front
                let id = set.push_front(list, value);
                ids.push(id);
                assert_eq!(set.front_id(list), Some(id));
                assert_eq!(set.list_of(id), Some(list));
                assert_eq!(set.get(id), Some(&value));
            }
            2 => {
                // pop_back
                let old_len = set.list_len(list);
                let popped = set.pop_back(list);
                assert_eq!(popped.is_some(), old_len > 0);
                assert_eq!(set.list_len(list), old_len.saturating_sub(1));
            }
            3 => {
                // move_to_front, possibly into another list
                if !ids.is_empty() {
                    let id = ids[value as usize % ids.len()];
                    if set.move_to_front(id, list) {
                        assert_eq!(set.front_id(list), Some(id));
                        assert_eq!(set.list_of(id), Some(list));
                    } else {
                        assert!(!set.contains(id));
                    }
                }
            }
            4 => {
                // remove
                if !ids.is_empty() {
                    let id = ids.swap_remove(value as usize % ids.len());
                    let was_live = set.contains(id);
                    assert_eq!(set.remove(id).is_some(), was_live);
                    assert!(!set.contains(id));
                }
            }
            _ => {
                // clear
                if value == 0 {
                    set.clear();
                    ids.clear();
                    assert!(set.is_empty());
                }
            }
        }

        let total: usize = (0..4).map(|l| set.list_len(l)).sum();
        assert_eq!(total, set.len());
        assert_eq!(set.iter(list).count(), set.list_len(list));
        #[cfg(debug_assertions)]
        set.debug_validate_invariants();
    }
});

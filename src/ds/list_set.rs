//! A fixed number of doubly linked lists sharing one `SlotArena`.
//!
//! Every node records which list it belongs to, so a node can be spliced from
//! one list to the front of another in O(1) while its `SlotId` stays valid.
//! ARC keeps its four lists (T1, T2, B1, B2) in a single `ListSet<_, 4>`;
//! [`IntrusiveList`](crate::ds::IntrusiveList) is the single-list case.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, list, prev, next }                     │
//!   ├────────┼──────────────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, list: 0, prev: None,       next: id_3 }  │
//!   │ id_2   │ { value: B, list: 1, prev: None,       next: None }  │
//!   │ id_3   │ { value: C, list: 0, prev: Some(id_1), next: None }  │
//!   └────────┴──────────────────────────────────────────────────────┘
//!
//!   list 0: head ─► [id_1] ◄──► [id_3] ◄── tail
//!   list 1: head ─► [id_2] ◄── tail
//! ```
//!
//! ## Operations
//! - `push_front(list, v)`: allocate a node at the MRU end of `list`
//! - `move_to_front(id, list)`: detach `id` from its list, attach at MRU of `list`
//! - `pop_back(list)`: remove the LRU node of `list`
//! - `remove(id)`: detach + free the slot
//!
//! All of the above are O(1). `debug_validate_invariants()` is available in
//! debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    list: usize,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Clone, Copy)]
struct Ends {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl Ends {
    const EMPTY: Ends = Ends {
        head: None,
        tail: None,
        len: 0,
    };
}

/// `N` intrusive lists whose nodes live in one shared arena.
///
/// Lists are addressed by index `0..N`; passing an index `>= N` panics.
#[derive(Debug)]
pub struct ListSet<T, const N: usize> {
    arena: SlotArena<Node<T>>,
    ends: [Ends; N],
}

impl<T, const N: usize> ListSet<T, N> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            ends: [Ends::EMPTY; N],
        }
    }

    /// Creates a set with room for `capacity` nodes across all lists.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            ends: [Ends::EMPTY; N],
        }
    }

    /// Total number of nodes across all lists.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of nodes in `list`.
    pub fn list_len(&self, list: usize) -> usize {
        self.ends[list].len
    }

    /// Returns the list `id` currently belongs to, or `None` for a stale handle.
    pub fn list_of(&self, id: SlotId) -> Option<usize> {
        self.arena.get(id).map(|node| node.list)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Handle of the MRU node of `list`.
    pub fn front_id(&self, list: usize) -> Option<SlotId> {
        self.ends[list].head
    }

    /// Handle of the LRU node of `list`.
    pub fn back_id(&self, list: usize) -> Option<SlotId> {
        self.ends[list].tail
    }

    /// Inserts `value` at the front of `list` and returns its handle.
    pub fn push_front(&mut self, list: usize, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            list,
            prev: None,
            next: None,
        });
        self.attach_front(id, list);
        id
    }

    /// Removes and returns the back (LRU) value of `list`.
    pub fn pop_back(&mut self, list: usize) -> Option<T> {
        let id = self.ends[list].tail?;
        self.remove(id)
    }

    /// Removes node `id` from whichever list holds it.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Splices `id` to the front of `list`; returns `false` for a stale handle.
    ///
    /// `list` may be the node's current list, in which case this is a plain
    /// move-to-front.
    pub fn move_to_front(&mut self, id: SlotId, list: usize) -> bool {
        let current = match self.arena.get(id) {
            Some(node) => node.list,
            None => return false,
        };
        if current == list && self.ends[list].head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id, list)
    }

    /// Iterates `list` from front (MRU) to back (LRU).
    pub fn iter(&self, list: usize) -> ListSetIter<'_, T, N> {
        ListSetIter {
            set: self,
            current: self.ends[list].head,
        }
    }

    /// Frees every node of every list.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.ends = [Ends::EMPTY; N];
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (list, prev, next) = {
            let node = self.arena.get(id)?;
            (node.list, node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.ends[list].head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.ends[list].tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        self.ends[list].len -= 1;
        Some(())
    }

    fn attach_front(&mut self, id: SlotId, list: usize) -> bool {
        let old_head = self.ends[list].head;
        match self.arena.get_mut(id) {
            Some(node) => {
                node.list = list;
                node.prev = None;
                node.next = old_head;
            },
            None => return false,
        }

        match old_head {
            Some(head_id) => {
                if let Some(head) = self.arena.get_mut(head_id) {
                    head.prev = Some(id);
                }
            },
            None => self.ends[list].tail = Some(id),
        }

        self.ends[list].head = Some(id);
        self.ends[list].len += 1;
        true
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let mut total = 0usize;
        for (list, ends) in self.ends.iter().enumerate() {
            if ends.head.is_none() || ends.tail.is_none() {
                assert!(ends.head.is_none(), "list {list}: head without tail");
                assert!(ends.tail.is_none(), "list {list}: tail without head");
                assert_eq!(ends.len, 0, "list {list}: empty list with nonzero len");
                continue;
            }

            let mut count = 0usize;
            let mut prev = None;
            let mut current = ends.head;
            while let Some(id) = current {
                let node = self.arena.get(id).expect("linked node missing from arena");
                assert_eq!(node.list, list, "node linked into the wrong list");
                assert_eq!(node.prev, prev, "broken back link in list {list}");
                if node.next.is_none() {
                    assert_eq!(ends.tail, Some(id), "tail mismatch in list {list}");
                }
                prev = Some(id);
                current = node.next;
                count += 1;
                assert!(count <= self.arena.len(), "cycle detected in list {list}");
            }
            assert_eq!(count, ends.len, "list {list}: len out of sync");
            total += count;
        }
        assert_eq!(total, self.arena.len(), "arena holds unlinked nodes");
    }
}

impl<T, const N: usize> Default for ListSet<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over one list of a [`ListSet`].
pub struct ListSetIter<'a, T, const N: usize> {
    set: &'a ListSet<T, N>,
    current: Option<SlotId>,
}

impl<'a, T, const N: usize> Iterator for ListSetIter<'a, T, N> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.set.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<const N: usize>(set: &ListSet<&'static str, N>, list: usize) -> Vec<&'static str> {
        set.iter(list).map(|(_, v)| *v).collect()
    }

    #[test]
    fn push_front_orders_mru_first() {
        let mut set: ListSet<&str, 2> = ListSet::new();
        set.push_front(0, "a");
        set.push_front(0, "b");
        set.push_front(1, "x");

        assert_eq!(values(&set, 0), vec!["b", "a"]);
        assert_eq!(values(&set, 1), vec!["x"]);
        assert_eq!(set.list_len(0), 2);
        assert_eq!(set.list_len(1), 1);
        assert_eq!(set.len(), 3);
        set.debug_validate_invariants();
    }

    #[test]
    fn move_between_lists_keeps_handle() {
        let mut set: ListSet<&str, 2> = ListSet::new();
        let a = set.push_front(0, "a");
        set.push_front(0, "b");

        assert!(set.move_to_front(a, 1));
        assert_eq!(set.list_of(a), Some(1));
        assert_eq!(set.get(a), Some(&"a"));
        assert_eq!(values(&set, 0), vec!["b"]);
        assert_eq!(values(&set, 1), vec!["a"]);
        set.debug_validate_invariants();
    }

    #[test]
    fn move_within_list_reorders() {
        let mut set: ListSet<&str, 1> = ListSet::new();
        let a = set.push_front(0, "a");
        set.push_front(0, "b");
        set.push_front(0, "c");

        assert!(set.move_to_front(a, 0));
        assert_eq!(values(&set, 0), vec!["a", "c", "b"]);
        assert!(set.move_to_front(a, 0));
        assert_eq!(values(&set, 0), vec!["a", "c", "b"]);
        set.debug_validate_invariants();
    }

    #[test]
    fn pop_back_takes_lru() {
        let mut set: ListSet<u32, 2> = ListSet::new();
        set.push_front(0, 1);
        set.push_front(0, 2);
        set.push_front(1, 9);

        assert_eq!(set.pop_back(0), Some(1));
        assert_eq!(set.pop_back(0), Some(2));
        assert_eq!(set.pop_back(0), None);
        assert_eq!(set.len(), 1);
        set.debug_validate_invariants();
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut set: ListSet<u32, 2> = ListSet::new();
        let id = set.push_front(0, 1);
        assert_eq!(set.remove(id), Some(1));

        assert_eq!(set.list_of(id), None);
        assert!(!set.move_to_front(id, 1));
        assert_eq!(set.remove(id), None);
        assert_eq!(set.list_len(1), 0);
        set.debug_validate_invariants();
    }

    #[test]
    fn remove_middle_relinks_neighbours() {
        let mut set: ListSet<&str, 1> = ListSet::new();
        set.push_front(0, "a");
        let b = set.push_front(0, "b");
        set.push_front(0, "c");

        assert_eq!(set.remove(b), Some("b"));
        assert_eq!(values(&set, 0), vec!["c", "a"]);
        assert_eq!(set.front_id(0).and_then(|id| set.get(id)), Some(&"c"));
        assert_eq!(set.back_id(0).and_then(|id| set.get(id)), Some(&"a"));
        set.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_every_list() {
        let mut set: ListSet<u32, 3> = ListSet::with_capacity(8);
        for list in 0..3 {
            set.push_front(list, list as u32);
        }
        set.clear();

        assert!(set.is_empty());
        assert!((0..3).all(|list| set.list_len(list) == 0));
        set.debug_validate_invariants();
    }
}

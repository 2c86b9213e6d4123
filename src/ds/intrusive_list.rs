//! Doubly linked recency list with stable `SlotId` handles.
//!
//! The single-list case of [`ListSet`]: nodes live in a `SlotArena`, so
//! `move_to_front` and `remove` are O(1) through a handle the caller keeps in
//! its own index.
//!
//! ```text
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!    MRU                                LRU
//! ```

use crate::ds::list_set::ListSet;
use crate::ds::slot_arena::SlotId;

const LIST: usize = 0;

/// Recency-ordered list; front is MRU, back is LRU.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    nodes: ListSet<T, 1>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self {
            nodes: ListSet::new(),
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: ListSet::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id)
    }

    /// Value at the front (MRU).
    pub fn front(&self) -> Option<&T> {
        self.nodes.front_id(LIST).and_then(|id| self.nodes.get(id))
    }

    /// Value at the back (LRU).
    pub fn back(&self) -> Option<&T> {
        self.nodes.back_id(LIST).and_then(|id| self.nodes.get(id))
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        self.nodes.push_front(LIST, value)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.nodes.pop_back(LIST)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.nodes.remove(id)
    }

    /// Moves `id` to the front; returns `false` if the handle is stale.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        self.nodes.move_to_front(id, LIST)
    }

    /// Iterates values from front (MRU) to back (LRU).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter(LIST).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.nodes.debug_validate_invariants();
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_move_and_pop() {
        let mut list = IntrusiveList::new();
        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["c", "b", "a"]);

        assert!(list.move_to_front(a));
        assert_eq!(list.front(), Some(&"a"));
        assert_eq!(list.back(), Some(&"b"));

        assert_eq!(list.pop_back(), Some("b"));
        assert_eq!(list.len(), 2);
        list.debug_validate_invariants();
    }

    #[test]
    fn remove_by_handle() {
        let mut list = IntrusiveList::with_capacity(2);
        let a = list.push_front(1);
        let b = list.push_front(2);

        assert_eq!(list.remove(a), Some(1));
        assert!(!list.contains(a));
        assert!(!list.move_to_front(a));
        assert_eq!(list.get(b), Some(&2));

        if let Some(v) = list.get_mut(b) {
            *v = 20;
        }
        assert_eq!(list.front(), Some(&20));
        list.clear();
        assert!(list.is_empty());
        list.debug_validate_invariants();
    }
}

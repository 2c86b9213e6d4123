pub mod intrusive_list;
pub mod list_set;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use list_set::{ListSet, ListSetIter};
pub use slot_arena::{SlotArena, SlotId};

pub mod dll;
pub mod sll;

pub use self::{
    dll::{Cursor, CursorMut, DoublyLinkedList},
    sll::{Cursor as SllCursor, CursorMut as SllCursorMut, SinglyLinkedList},
};

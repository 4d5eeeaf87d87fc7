pub mod prelude {
    pub use super::{
        ds::{Cursor, CursorMut, DoublyLinkedList, SinglyLinkedList, SllCursor, SllCursorMut},
        Error,
    };

    pub type Idx = usize;
    pub type IResult<T> = Result<T, Error>;
}

mod ds;

pub use ds::{dll, sll, Cursor, CursorMut, DoublyLinkedList, SinglyLinkedList};
pub use prelude::IResult;

/// Recoverable failures of the list operations.
///
/// Every variant carries the name of the operation that failed. A failed call
/// never leaves the list partially modified.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `index >= len` for an index based operation
    #[error("index {index} out of range for list of length {len} in {op}")]
    IndexOutOfRange { op: &'static str, index: usize, len: usize },
    /// first/last access on a list without elements
    #[error("empty list in {op}")]
    EmptyContainer { op: &'static str },
    /// dereference of, or step from, the sentinel position
    #[error("iterator out of range in {op}")]
    IteratorOutOfRange { op: &'static str },
}

/// some common property check
#[allow(dead_code)]
mod compile_time_assertions {
    use crate::prelude::*;

    #[allow(unreachable_code)]
    fn assert_lists_send_sync() {
        _assert_send_sync::<DoublyLinkedList<String>>(unreachable!());
        _assert_send_sync::<SinglyLinkedList<String>>(unreachable!());
        _assert_send_sync::<crate::dll::Iter<'static, String>>(unreachable!());
        _assert_send_sync::<crate::dll::IterMut<'static, String>>(unreachable!());
        _assert_send_sync::<Cursor<'static, String>>(unreachable!());
        _assert_send_sync::<CursorMut<'static, String>>(unreachable!());
        _assert_send_sync::<Error>(unreachable!());
    }

    fn _assert_send_sync<S: Send + Sync>(_: &S) {}
}

/// double linked list
///
/// Nodes are allocated once with `Box` and leaked into `NonNull` handles.
/// The forward chain `head -> next -> ...` is the single owner of every node:
/// a node is reclaimed with `Box::from_raw` exactly when it is unlinked, in
/// `unlink` or `release`. The `prev` links and `tail` are back references
/// copied from the same handles, so no reference ever aliases them.
use crate::prelude::*;
use std::{fmt, iter::FromIterator, marker::PhantomData, ptr::NonNull};

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    item: T,
    prev: Link<T>,
    next: Link<T>,
}

impl<T> Node<T> {
    fn new(item: T, prev: Link<T>, next: Link<T>) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self { item, prev, next })))
    }
}

pub struct DoublyLinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    size: usize,
    marker: PhantomData<Box<Node<T>>>,
}

#[allow(unsafe_code)]
unsafe impl<T: Send> Send for DoublyLinkedList<T> {}

#[allow(unsafe_code)]
unsafe impl<T: Sync> Sync for DoublyLinkedList<T> {}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self {
            head: None,
            tail: None,
            size: 0,
            marker: PhantomData,
        }
    }
}

impl<T> DoublyLinkedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` as the new head, O(1)
    pub fn add_first(&mut self, item: T) {
        let node = Node::new(item, None, self.head);

        match self.head {
            Some(head) => unsafe { (*head.as_ptr()).prev = Some(node) },
            None => self.tail = Some(node),
        }

        self.head = Some(node);
        self.size += 1;
    }

    /// Insert `item` as the new tail, O(1)
    pub fn add_last(&mut self, item: T) {
        let node = Node::new(item, self.tail, None);

        match self.tail {
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }

        self.tail = Some(node);
        self.size += 1;
    }

    /// Detach the head and hand back its item, O(1)
    pub fn remove_first(&mut self) -> IResult<T> {
        match self.head {
            Some(head) => Ok(unsafe { self.unlink(head) }),
            None => Err(Error::EmptyContainer { op: "remove_first" }),
        }
    }

    /// Detach the tail and hand back its item, O(1)
    pub fn remove_last(&mut self) -> IResult<T> {
        match self.tail {
            Some(tail) => Ok(unsafe { self.unlink(tail) }),
            None => Err(Error::EmptyContainer { op: "remove_last" }),
        }
    }

    /// Remove the item at `idx`.
    ///
    /// Both ends are O(1), anything in between walks from the head.
    pub fn remove(&mut self, idx: Idx) -> IResult<T> {
        self.check_index("remove", idx)?;

        if idx == 0 {
            return self.remove_first()
        } else if idx == self.size - 1 {
            return self.remove_last()
        }

        match self.node(idx) {
            Some(node) => Ok(unsafe { self.unlink(node) }),
            None => Err(Error::IndexOutOfRange {
                op: "remove",
                index: idx,
                len: self.size,
            }),
        }
    }

    /// Overwrite the item at `idx`
    pub fn set(&mut self, idx: Idx, item: T) -> IResult<()> {
        self.check_index("set", idx)?;

        match self.node(idx) {
            Some(node) => {
                unsafe { (*node.as_ptr()).item = item };
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                op: "set",
                index: idx,
                len: self.size,
            }),
        }
    }

    pub fn set_first(&mut self, item: T) -> IResult<()> {
        match self.head {
            Some(head) => {
                unsafe { (*head.as_ptr()).item = item };
                Ok(())
            }
            None => Err(Error::EmptyContainer { op: "set_first" }),
        }
    }

    pub fn set_last(&mut self, item: T) -> IResult<()> {
        match self.tail {
            Some(tail) => {
                unsafe { (*tail.as_ptr()).item = item };
                Ok(())
            }
            None => Err(Error::EmptyContainer { op: "set_last" }),
        }
    }

    /// Borrow the item at `idx`
    pub fn get_ref(&self, idx: Idx) -> IResult<&T> {
        self.check_index("get", idx)?;

        self.node(idx)
            .map(|node| unsafe { &(*node.as_ptr()).item })
            .ok_or(Error::IndexOutOfRange {
                op: "get",
                index: idx,
                len: self.size,
            })
    }

    /// Position of the first item equal to `item`, counted from the head
    pub fn index_of(&self, item: &T) -> Option<Idx>
    where
        T: PartialEq,
    {
        self.iter().position(|curr| curr == item)
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    /// Release every node, the list is empty afterwards
    pub fn clear(&mut self) {
        let released = self.release();
        log::trace!("dll cleared, {} nodes released", released);
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn len(&self) -> usize {
        self.size
    }

    /// Cursor on the head, or the sentinel if the list is empty
    pub fn front(&self) -> Cursor<'_, T> {
        Cursor::new(self.head)
    }

    /// Cursor on the tail, or the sentinel if the list is empty
    pub fn back(&self) -> Cursor<'_, T> {
        Cursor::new(self.tail)
    }

    /// The sentinel cursor, past the tail and before the head alike
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(None)
    }

    pub fn front_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.head)
    }

    pub fn back_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.tail)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head,
            tail: self.tail,
            len: self.size,
            marker: PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            tail: self.tail,
            len: self.size,
            marker: PhantomData,
        }
    }

    fn check_index(&self, op: &'static str, idx: Idx) -> IResult<()> {
        if idx >= self.size {
            return Err(Error::IndexOutOfRange {
                op,
                index: idx,
                len: self.size,
            })
        }
        Ok(())
    }

    fn node(&self, idx: Idx) -> Link<T> {
        let mut curr = self.head;
        for _ in 0..idx {
            curr = unsafe { (*curr?.as_ptr()).next };
        }
        curr
    }

    /// Relink the neighbours of `node` around it and reclaim its allocation.
    ///
    /// `node` must belong to this list.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        let node = Box::from_raw(node.as_ptr());

        match node.prev {
            Some(prev) => (*prev.as_ptr()).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => (*next.as_ptr()).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.size -= 1;
        node.item
    }

    fn release(&mut self) -> usize {
        let released = self.size;
        while let Some(head) = self.head {
            let node = unsafe { Box::from_raw(head.as_ptr()) };
            self.head = node.next;
        }

        self.tail = None;
        self.size = 0;
        released
    }
}

impl<T: Clone> DoublyLinkedList<T> {
    /// Copy of the item at `idx`, O(idx)
    pub fn get(&self, idx: Idx) -> IResult<T> {
        self.get_ref(idx).map(Clone::clone)
    }

    pub fn get_first(&self) -> IResult<T> {
        self.head
            .map(|head| unsafe { (*head.as_ptr()).item.clone() })
            .ok_or(Error::EmptyContainer { op: "get_first" })
    }

    pub fn get_last(&self) -> IResult<T> {
        self.tail
            .map(|tail| unsafe { (*tail.as_ptr()).item.clone() })
            .ok_or(Error::EmptyContainer { op: "get_last" })
    }

    /// Rebuild this list as a deep copy of `other`.
    ///
    /// The old chain is released first, then `other` is walked with its own
    /// cursor and every item is appended, so no node is ever shared.
    fn copy(&mut self, other: &Self) {
        self.release();

        let mut cursor = other.front();
        while let Ok(item) = cursor.get() {
            self.add_last(item.clone());
            if cursor.move_next().is_err() {
                break
            }
        }

        log::trace!("dll copied, {} items", self.size);
    }
}

impl<T> Drop for DoublyLinkedList<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Clone> Clone for DoublyLinkedList<T> {
    fn clone(&self) -> Self {
        let mut list = Self::new();
        list.copy(self);
        list
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy(source);
    }
}

impl<T: PartialEq> PartialEq for DoublyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DoublyLinkedList<T> {}

/// `[a, b, c]`, or `[]` for an empty list
impl<T: fmt::Display> fmt::Display for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;

        let mut cursor = self.front();
        while let Ok(item) = cursor.get() {
            write!(f, "{}", item)?;
            if cursor.move_next().is_ok() && !cursor.is_end() {
                f.write_str(", ")?;
            }
        }

        f.write_str("]")
    }
}

impl<T: fmt::Debug> fmt::Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add_last(item);
        }
    }
}

/// A position in a `DoublyLinkedList`: on a node, or on the sentinel.
///
/// Only the list hands out cursors. A cursor borrows its list, so the node it
/// points at cannot be removed while the cursor is alive.
pub struct Cursor<'a, T> {
    curr: Link<T>,
    marker: PhantomData<&'a Node<T>>,
}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Send for Cursor<'a, T> {}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Sync for Cursor<'a, T> {}

impl<'a, T> Cursor<'a, T> {
    fn new(curr: Link<T>) -> Self {
        Self {
            curr,
            marker: PhantomData,
        }
    }

    /// Dereference, fails on the sentinel
    pub fn get(&self) -> IResult<&'a T> {
        self.curr
            .map(|node| unsafe { &(*node.as_ptr()).item })
            .ok_or(Error::IteratorOutOfRange { op: "Cursor::get" })
    }

    /// Step toward the tail, the tail steps onto the sentinel
    pub fn move_next(&mut self) -> IResult<()> {
        let node = self.curr.ok_or(Error::IteratorOutOfRange {
            op: "Cursor::move_next",
        })?;
        self.curr = unsafe { (*node.as_ptr()).next };
        Ok(())
    }

    /// Step toward the head, the head steps onto the sentinel
    pub fn move_prev(&mut self) -> IResult<()> {
        let node = self.curr.ok_or(Error::IteratorOutOfRange {
            op: "Cursor::move_prev",
        })?;
        self.curr = unsafe { (*node.as_ptr()).prev };
        Ok(())
    }

    pub fn is_end(&self) -> bool {
        self.curr.is_none()
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

/// Cursors are equal when they sit on the same node, or both on the sentinel
impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.curr == other.curr
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get().ok()).finish()
    }
}

/// A cursor that can write through to the item it sits on.
///
/// It holds the list mutably, so `list.end()` cannot be taken next to it:
/// `is_end` is the `!= end()` test, and two `CursorMut`s compare by node
/// identity like `Cursor`.
pub struct CursorMut<'a, T> {
    curr: Link<T>,
    marker: PhantomData<&'a mut Node<T>>,
}

#[allow(unsafe_code)]
unsafe impl<'a, T: Send> Send for CursorMut<'a, T> {}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Sync for CursorMut<'a, T> {}

impl<'a, T> CursorMut<'a, T> {
    fn new(curr: Link<T>) -> Self {
        Self {
            curr,
            marker: PhantomData,
        }
    }

    pub fn get(&self) -> IResult<&T> {
        self.curr
            .map(|node| unsafe { &(*node.as_ptr()).item })
            .ok_or(Error::IteratorOutOfRange {
                op: "CursorMut::get",
            })
    }

    /// Mutable dereference, fails on the sentinel
    pub fn get_mut(&mut self) -> IResult<&mut T> {
        self.curr
            .map(|node| unsafe { &mut (*node.as_ptr()).item })
            .ok_or(Error::IteratorOutOfRange {
                op: "CursorMut::get_mut",
            })
    }

    pub fn move_next(&mut self) -> IResult<()> {
        let node = self.curr.ok_or(Error::IteratorOutOfRange {
            op: "CursorMut::move_next",
        })?;
        self.curr = unsafe { (*node.as_ptr()).next };
        Ok(())
    }

    pub fn move_prev(&mut self) -> IResult<()> {
        let node = self.curr.ok_or(Error::IteratorOutOfRange {
            op: "CursorMut::move_prev",
        })?;
        self.curr = unsafe { (*node.as_ptr()).prev };
        Ok(())
    }

    /// True on the sentinel, where `get`, `get_mut` and every step fail
    pub fn is_end(&self) -> bool {
        self.curr.is_none()
    }
}

impl<'a, T> PartialEq for CursorMut<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.curr == other.curr
    }
}

impl<'a, T> Eq for CursorMut<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for CursorMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get().ok()).finish()
    }
}

/// Borrowing iterator over the items, head to tail
pub struct Iter<'a, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    marker: PhantomData<&'a Node<T>>,
}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Send for Iter<'a, T> {}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Sync for Iter<'a, T> {}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None
        }

        self.head.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.head = node.next;
            self.len -= 1;
            &node.item
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None
        }

        self.tail.map(|node| unsafe {
            let node = &*node.as_ptr();
            self.tail = node.prev;
            self.len -= 1;
            &node.item
        })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }
}

pub struct IterMut<'a, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    marker: PhantomData<&'a mut Node<T>>,
}

#[allow(unsafe_code)]
unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}

#[allow(unsafe_code)]
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None
        }

        self.head.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.head = node.next;
            self.len -= 1;
            &mut node.item
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None
        }

        self.tail.map(|node| unsafe {
            let node = &mut *node.as_ptr();
            self.tail = node.prev;
            self.len -= 1;
            &mut node.item
        })
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

/// Owning iterator, drains the list from both ends
pub struct IntoIter<T> {
    list: DoublyLinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.remove_first().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.remove_last().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DoublyLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

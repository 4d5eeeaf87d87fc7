/// singly linked list, new items go in at the head
use crate::prelude::*;
use std::{fmt, iter::FromIterator, ops::Deref, ptr};

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    inner: T,
    next: Link<T>,
}

impl<T> Node<T> {
    fn new(inner: T, next: Link<T>) -> Self {
        Self { inner, next }
    }
}

impl<T> Deref for Node<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}

pub struct SinglyLinkedList<T> {
    head: Link<T>,
    size: usize,
}

impl<T> Default for SinglyLinkedList<T> {
    fn default() -> Self {
        Self { head: None, size: 0 }
    }
}

impl<T> SinglyLinkedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `item` in front of the current head
    pub fn add(&mut self, item: T) {
        let node = Box::new(Node::new(item, self.head.take()));
        self.head = Some(node);
        self.size += 1;
    }

    /// Unlink the node at `idx` and hand back its item
    pub fn remove(&mut self, idx: Idx) -> IResult<T> {
        self.check_index("remove", idx)?;

        let out_of_range = Error::IndexOutOfRange {
            op: "remove",
            index: idx,
            len: self.size,
        };
        let link = self.link_mut(idx).ok_or_else(|| out_of_range.clone())?;
        let mut node = link.take().ok_or(out_of_range)?;
        *link = node.next.take();

        self.size -= 1;
        Ok(node.inner)
    }

    pub fn set(&mut self, idx: Idx, item: T) -> IResult<()> {
        self.check_index("set", idx)?;

        match self.link_mut(idx).and_then(|link| link.as_deref_mut()) {
            Some(node) => {
                node.inner = item;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                op: "set",
                index: idx,
                len: self.size,
            }),
        }
    }

    pub fn get_ref(&self, idx: Idx) -> IResult<&T> {
        self.check_index("get", idx)?;

        let mut curr = self.head.as_deref();
        for _ in 0..idx {
            curr = curr.and_then(|node| node.next.as_deref());
        }

        curr.map(Deref::deref).ok_or(Error::IndexOutOfRange {
            op: "get",
            index: idx,
            len: self.size,
        })
    }

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

    pub fn clear(&mut self) {
        let released = self.release();
        log::trace!("sll cleared, {} nodes released", released);
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn front(&self) -> Cursor<'_, T> {
        Cursor {
            curr: self.head.as_deref(),
        }
    }

    /// The sentinel, one past the last node
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor { curr: None }
    }

    pub fn front_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            curr: self.head.as_deref_mut(),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
            len: self.size,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head.as_deref_mut(),
            len: self.size,
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

    // the link owning the node at `idx`
    fn link_mut(&mut self, idx: Idx) -> Option<&mut Link<T>> {
        let mut link = &mut self.head;
        for _ in 0..idx {
            link = &mut link.as_mut()?.next;
        }
        Some(link)
    }

    fn pop(&mut self) -> Option<T> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.size -= 1;
        Some(node.inner)
    }

    fn release(&mut self) -> usize {
        let released = self.size;
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
        }

        self.size = 0;
        released
    }
}

impl<T: Clone> SinglyLinkedList<T> {
    pub fn get(&self, idx: Idx) -> IResult<T> {
        self.get_ref(idx).map(Clone::clone)
    }

    /// A uniformly chosen item, the caller owns the randomness
    #[cfg(feature = "rand")]
    pub fn get_random<R: rand::Rng>(&self, rng: &mut R) -> IResult<T> {
        if self.is_empty() {
            return Err(Error::EmptyContainer { op: "get_random" })
        }

        let idx = rng.gen_range(0..self.size);
        self.get(idx)
    }

    // rebuild in source order by appending through the trailing link
    fn copy(&mut self, other: &Self) {
        self.release();

        let mut link = &mut self.head;
        let mut cursor = other.front();
        while let Ok(item) = cursor.get() {
            let node = link.insert(Box::new(Node::new(item.clone(), None)));
            link = &mut node.next;
            self.size += 1;

            if cursor.move_next().is_err() {
                break
            }
        }

        log::trace!("sll copied, {} items", self.size);
    }
}

impl<T> Drop for SinglyLinkedList<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Clone> Clone for SinglyLinkedList<T> {
    fn clone(&self) -> Self {
        let mut list = Self::new();
        list.copy(self);
        list
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy(source);
    }
}

impl<T: PartialEq> PartialEq for SinglyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SinglyLinkedList<T> {}

impl<T: fmt::Display> fmt::Display for SinglyLinkedList<T> {
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

impl<T: fmt::Debug> fmt::Debug for SinglyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Items are pushed to the head one by one, so they come out reversed
impl<T> FromIterator<T> for SinglyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for SinglyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

/// Forward only cursor over a `SinglyLinkedList`
pub struct Cursor<'a, T> {
    curr: Option<&'a Node<T>>,
}

impl<'a, T> Cursor<'a, T> {
    pub fn get(&self) -> IResult<&'a T> {
        self.curr
            .map(Deref::deref)
            .ok_or(Error::IteratorOutOfRange {
                op: "SllCursor::get",
            })
    }

    pub fn move_next(&mut self) -> IResult<()> {
        let node = self.curr.ok_or(Error::IteratorOutOfRange {
            op: "SllCursor::move_next",
        })?;
        self.curr = node.next.as_deref();
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

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.curr, other.curr) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SllCursor").field(&self.get().ok()).finish()
    }
}

pub struct CursorMut<'a, T> {
    curr: Option<&'a mut Node<T>>,
}

impl<'a, T> CursorMut<'a, T> {
    pub fn get(&self) -> IResult<&T> {
        self.curr
            .as_deref()
            .map(Deref::deref)
            .ok_or(Error::IteratorOutOfRange {
                op: "SllCursorMut::get",
            })
    }

    pub fn get_mut(&mut self) -> IResult<&mut T> {
        self.curr
            .as_deref_mut()
            .map(|node| &mut node.inner)
            .ok_or(Error::IteratorOutOfRange {
                op: "SllCursorMut::get_mut",
            })
    }

    pub fn move_next(&mut self) -> IResult<()> {
        let node = self.curr.take().ok_or(Error::IteratorOutOfRange {
            op: "SllCursorMut::move_next",
        })?;
        self.curr = node.next.as_deref_mut();
        Ok(())
    }

    pub fn is_end(&self) -> bool {
        self.curr.is_none()
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    len: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.len -= 1;
        Some(&node.inner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            len: self.len,
        }
    }
}

pub struct IterMut<'a, T> {
    next: Option<&'a mut Node<T>>,
    len: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let node = self.next.take()?;
        self.next = node.next.as_deref_mut();
        self.len -= 1;
        Some(&mut node.inner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

pub struct IntoIter<T> {
    list: SinglyLinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for SinglyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a SinglyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SinglyLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn letters() -> SinglyLinkedList<char> {
        let mut list = SinglyLinkedList::new();
        for c in 'A'..='Z' {
            list.add(c);
        }
        list
    }

    fn scaled(n: usize) -> usize {
        if cfg!(miri) {
            n / 50
        } else {
            n
        }
    }

    #[test]
    fn test_cursor_get() {
        let mut list = SinglyLinkedList::new();
        list.add(0);
        let it = list.front();
        assert_eq!(it.get(), Ok(&0));

        let it = list.end();
        assert_eq!(
            it.get(),
            Err(Error::IteratorOutOfRange {
                op: "SllCursor::get"
            })
        );
    }

    #[test]
    fn test_cursor_move_next() {
        let list: SinglyLinkedList<char> = ('a'..='z').collect();

        let mut it = list.front();
        for c in ('a'..='z').rev() {
            assert_eq!(it.get(), Ok(&c));
            it.move_next().unwrap();
        }
        assert_eq!(it, list.end());
        assert!(matches!(
            it.move_next(),
            Err(Error::IteratorOutOfRange { .. })
        ));
    }

    #[test]
    fn test_cursor_mut() {
        let mut list: SinglyLinkedList<String> = vec!["b", "a"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut it = list.front_mut();
        while let Ok(item) = it.get_mut() {
            item.push('!');
            it.move_next().unwrap();
        }
        assert!(it.is_end());
        assert!(it.get().is_err());
        assert!(it.move_next().is_err());

        assert_eq!(list.to_string(), "[a!, b!]");
    }

    #[test]
    fn test_copy_constructor() {
        init_logger();

        let mut list1 = SinglyLinkedList::new();
        for i in 0..5 {
            list1.add(i);
        }

        let mut list2 = list1.clone();
        assert_eq!(list2.len(), list1.len());
        for i in 0..5 {
            assert_eq!(list2.get(i), Ok(4 - i));
        }

        list2.set(2, 40).unwrap();
        list2.add(9);
        assert_eq!(list1.get(2), Ok(2));
        assert_eq!(list1.len(), 5);
    }

    #[test]
    fn test_add() {
        let mut list = SinglyLinkedList::new();
        list.add(1);
        assert_eq!(list.get(0), Ok(1));
        assert_eq!(list.len(), 1);
        list.add(2);
        assert_eq!(list.get(0), Ok(2));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_clear() {
        init_logger();

        let mut list = SinglyLinkedList::new();
        for i in 0..100 {
            list.add(i);
        }
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.front(), list.end());
    }

    #[test]
    fn test_index_of() {
        let list = letters();
        assert_eq!(list.index_of(&'Z'), Some(0));
        assert_eq!(list.index_of(&'A'), Some(25));
        assert_eq!(list.index_of(&'M'), Some(13));
        assert_eq!(list.index_of(&'a'), None);
        assert!(list.contains(&'B'));
    }

    #[test]
    fn test_end() {
        let mut list = SinglyLinkedList::<f64>::new();
        let mut it = list.front();
        let mut count = 0;
        while it != list.end() {
            count += 1;
            it.move_next().unwrap();
        }
        assert_eq!(count, 0);

        for i in 0..5 {
            list.add(f64::from(i));
        }
        let mut it = list.front();
        let mut count = 0;
        while it != list.end() {
            count += 1;
            it.move_next().unwrap();
        }
        assert_eq!(count, 5);
    }

    #[test]
    fn test_get() {
        let list = letters();
        assert_eq!(list.get(0), Ok('Z'));
        assert_eq!(list.get(25), Ok('A'));
        assert_eq!(list.get(13), Ok('M'));
        assert_eq!(
            list.get(26),
            Err(Error::IndexOutOfRange {
                op: "get",
                index: 26,
                len: 26
            })
        );
    }

    #[test]
    fn test_remove() {
        let mut list = letters();
        assert_eq!(list.remove(0), Ok('Z'));
        assert_eq!(list.len(), 25);
        assert_eq!(list.get(0), Ok('Y'));
        assert_eq!(list.remove(24), Ok('A'));
        assert_eq!(list.len(), 24);
        assert_eq!(list.get(23), Ok('B'));
        assert_eq!(list.remove(12), Ok('M'));
        assert_eq!(list.len(), 23);
        assert_eq!(list.get(12), Ok('L'));

        let before = list.clone();
        assert!(matches!(
            list.remove(26),
            Err(Error::IndexOutOfRange { op: "remove", .. })
        ));
        assert_eq!(list, before);
    }

    #[test]
    fn test_set() {
        let mut list = letters();
        list.set(0, 'z').unwrap();
        assert_eq!(list.get(0), Ok('z'));
        list.set(25, 'a').unwrap();
        assert_eq!(list.get(25), Ok('a'));
        list.set(13, 'm').unwrap();
        assert_eq!(list.get(13), Ok('m'));
        assert!(matches!(
            list.set(26, 'X'),
            Err(Error::IndexOutOfRange { op: "set", .. })
        ));
    }

    #[test]
    fn test_assignment() {
        let mut list1 = SinglyLinkedList::new();
        let mut list2 = SinglyLinkedList::new();
        for i in 0..5 {
            list1.add(i);
            if i % 2 == 0 {
                list2.add(i);
            }
        }

        list1.clone_from(&list2);
        assert_eq!(list1.len(), list2.len());
        for i in 0..list1.len() {
            assert_eq!(list1.get(i), list2.get(i));
        }
        assert_eq!(list1.to_string(), "[4, 2, 0]");

        list1.clone_from(&SinglyLinkedList::new());
        assert!(list1.is_empty());
    }

    #[test]
    fn test_display() {
        let mut list = SinglyLinkedList::new();
        assert_eq!(list.to_string(), "[]");
        for i in 0..5 {
            list.add(i);
        }
        assert_eq!(list.to_string(), "[4, 3, 2, 1, 0]");
        assert_eq!(format!("{:?}", list), "[4, 3, 2, 1, 0]");
    }

    #[test]
    fn test_iterators() {
        let mut list: SinglyLinkedList<i32> = (1..=3).collect();
        assert_eq!(list.iter().len(), 3);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);

        for item in list.iter_mut() {
            *item *= 2;
        }
        assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![6, 4, 2]);
    }

    #[test]
    fn test_long_list_drop() {
        let len = scaled(200_000);
        let list: SinglyLinkedList<usize> = (0..len).collect();
        assert_eq!(list.len(), len);
        drop(list);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_get_random() {
        let mut rng = StdRng::seed_from_u64(42);

        let empty = SinglyLinkedList::<u8>::new();
        assert_eq!(
            empty.get_random(&mut rng),
            Err(Error::EmptyContainer { op: "get_random" })
        );

        let list = letters();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            let picked = list.get_random(&mut rng).unwrap();
            assert!(list.contains(&picked));
            seen.insert(picked);
        }
        // every letter turns up with overwhelming probability
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn test_random_operations_against_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed_511);
        let mut list = SinglyLinkedList::new();
        let mut model: Vec<u32> = Vec::new();

        for step in 0..scaled(3_000) as u32 {
            match rng.gen_range(0..4) {
                0 => {
                    list.add(step);
                    model.insert(0, step);
                }
                1 => {
                    let idx = rng.gen_range(0..=model.len());
                    let expected = if idx < model.len() {
                        Some(model.remove(idx))
                    } else {
                        None
                    };
                    assert_eq!(list.remove(idx).ok(), expected);
                }
                2 => {
                    let idx = rng.gen_range(0..=model.len());
                    let res = list.set(idx, step);
                    if let Some(slot) = model.get_mut(idx) {
                        *slot = step;
                        assert!(res.is_ok());
                    } else {
                        assert!(res.is_err());
                    }
                }
                _ => {
                    let idx = rng.gen_range(0..=model.len());
                    assert_eq!(list.get(idx).ok(), model.get(idx).copied());
                }
            }
            assert_eq!(list.len(), model.len());
        }

        assert!(list.iter().eq(model.iter()));
    }
}

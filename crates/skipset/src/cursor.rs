//! Base-level traversal: borrowing and owning iterators, plus a cursor that
//! can remove what it just returned.

use std::iter::FusedIterator;

use skipset_coin::CoinFlip;

use crate::error::{Result, SkipSetError};
use crate::node::{Arena, NodeId};
use crate::set::SkipListSet;

/// Ascending iterator over the elements of a [`SkipListSet`].
pub struct Iter<'a, T> {
    nodes: &'a Arena<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(
        nodes: &'a Arena<T>,
        front: Option<NodeId>,
        back: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Self {
            nodes,
            front,
            back,
            remaining,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = &self.nodes[id];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = &self.nodes[id];
        self.back = node.previous;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning ascending iterator, produced by `SkipListSet::into_iter`.
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(values: Vec<T>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Forward cursor over the base level with removal.
///
/// [`next`](Self::next) returns the element under the cursor and steps past
/// it. [`remove`](Self::remove) deletes the element most recently returned;
/// the following `next` yields whatever came after it.
pub struct CursorMut<'a, T, C> {
    set: &'a mut SkipListSet<T, C>,
    last: Option<NodeId>,
    started: bool,
    removable: bool,
}

impl<'a, T: Ord + Clone, C: CoinFlip> CursorMut<'a, T, C> {
    pub(crate) fn new(set: &'a mut SkipListSet<T, C>) -> Self {
        Self {
            set,
            last: None,
            started: false,
            removable: false,
        }
    }

    fn candidate(&self) -> Option<NodeId> {
        if self.started {
            self.last.and_then(|id| self.set.nodes[id].next)
        } else {
            self.set.bottom_head
        }
    }

    pub fn has_next(&self) -> bool {
        self.candidate().is_some()
    }

    /// The element the next call to `next` would return.
    pub fn peek(&self) -> Option<&T> {
        self.candidate().map(|id| &self.set.nodes[id].value)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let id = self.candidate()?;
        self.last = Some(id);
        self.started = true;
        self.removable = true;
        Some(&self.set.nodes[id].value)
    }

    /// Remove the element most recently returned by `next`.
    pub fn remove(&mut self) -> Result<T> {
        let Some(id) = self.last.filter(|_| self.removable) else {
            return Err(SkipSetError::NoCurrentElement);
        };
        self.removable = false;

        if Some(id) == self.set.bottom_head {
            // The head column is relabelled in place, so the successor now
            // sits where the cursor has not yet looked.
            self.started = false;
            self.last = None;
        } else {
            self.last = self.set.nodes[id].previous;
        }

        self.set
            .remove_node(id)
            .ok_or_else(|| SkipSetError::Corrupted("cursor lost its position".to_string()))
    }
}

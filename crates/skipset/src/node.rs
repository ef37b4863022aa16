//! Tower nodes and the arena that owns them.
//!
//! Nodes refer to each other by [`NodeId`] rather than by pointer. The arena
//! is owned by exactly one set and ids never leave the crate, so a stale id
//! can only come from a bug inside the set itself.

use std::ops::{Index, IndexMut};

/// Stable index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// One cell of a tower: a value at a single level plus its four neighbours.
#[derive(Debug, Clone)]
pub(crate) struct TowerNode<T> {
    pub(crate) value: T,
    /// 1 is the base level.
    pub(crate) level: usize,
    pub(crate) previous: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) above: Option<NodeId>,
    pub(crate) below: Option<NodeId>,
}

impl<T> TowerNode<T> {
    pub(crate) fn new(value: T, level: usize) -> Self {
        Self {
            value,
            level,
            previous: None,
            next: None,
            above: None,
            below: None,
        }
    }
}

/// Slot storage for tower nodes with a free list for reuse.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<TowerNode<T>>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn alloc(&mut self, node: TowerNode<T>) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Take a node out of the arena, freeing its slot.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<TowerNode<T>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&TowerNode<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Number of live nodes across every level.
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = TowerNode<T>;

    fn index(&self, id: NodeId) -> &TowerNode<T> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("node {} was released while still linked", id.0),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut TowerNode<T> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("node {} was released while still linked", id.0),
        }
    }
}

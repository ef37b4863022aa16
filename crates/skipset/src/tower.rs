//! Search, insertion, deletion and rebalancing.
//!
//! The head column always holds the current minimum at every level, from
//! the base up to `height`. Inserting a new minimum relabels that column and
//! demotes the old minimum into an ordinary tower right behind it; removing
//! the minimum relabels the column with its successor and unlinks the
//! successor's own tower.

use std::borrow::Borrow;
use std::cmp::Ordering;

use skipset_coin::{CoinFlip, promotion_count};
use skipset_logging::LogLevel;

use crate::node::{NodeId, TowerNode};
use crate::set::{INSERT, REBALANCE, REMOVE, SkipListSet};

impl<T: Ord, C> SkipListSet<T, C> {
    /// Base-level node closest to `value` from below.
    ///
    /// Returns the greatest base node whose value is `<= value`, except when
    /// `value` is below the minimum: then nothing is ever stepped over and
    /// the head column's base cell (greater than `value`) comes back.
    /// `None` only for an empty set.
    pub(crate) fn search<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.head?;
        while let Some(below) = self.nodes[current].below {
            current = below;
            while let Some(next) = self.nodes[current].next {
                if self.nodes[next].value.borrow() > value {
                    break;
                }
                current = next;
            }
        }
        Some(current)
    }

    /// Base node holding exactly `value`.
    pub(crate) fn find<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.search(value)?;
        (self.nodes[found].value.borrow().cmp(value) == Ordering::Equal).then_some(found)
    }

    /// Number of levels the tower rooted at `base` spans.
    pub(crate) fn tower_height(&self, base: NodeId) -> usize {
        self.nodes[self.tower_top(base)].level
    }

    pub(crate) fn tower_top(&self, base: NodeId) -> NodeId {
        let mut top = base;
        while let Some(above) = self.nodes[top].above {
            top = above;
        }
        top
    }

    /// Splice `node` in right after `left` on `left`'s level.
    fn link_after(&mut self, left: NodeId, mut node: TowerNode<T>) -> NodeId {
        let next = self.nodes[left].next;
        let level = node.level;
        node.previous = Some(left);
        node.next = next;
        let id = self.nodes.alloc(node);
        match next {
            Some(next) => self.nodes[next].previous = Some(id),
            None if level == 1 => self.bottom_tail = Some(id),
            None => {}
        }
        self.nodes[left].next = Some(id);
        id
    }

    /// Unlink one cell from its level and release it. Vertical links of
    /// the neighbours above and below are left to the caller.
    fn unlink(&mut self, id: NodeId) -> Option<TowerNode<T>> {
        let node = self.nodes.release(id)?;
        if let Some(previous) = node.previous {
            self.nodes[previous].next = node.next;
        }
        match node.next {
            Some(next) => self.nodes[next].previous = node.previous,
            None if node.level == 1 => self.bottom_tail = node.previous,
            None => {}
        }
        Some(node)
    }

    /// Nearest cell one level up, searching leftwards from `cell`.
    fn promoted_predecessor(&self, cell: NodeId) -> Option<NodeId> {
        let mut cursor = self.nodes[cell].previous;
        while let Some(id) = cursor {
            if let Some(above) = self.nodes[id].above {
                return Some(above);
            }
            cursor = self.nodes[id].previous;
        }
        None
    }
}

impl<T: Ord + Clone, C: CoinFlip> SkipListSet<T, C> {
    /// Insert `value`. Returns `false` if it was already present.
    ///
    /// The promotion count is drawn before the position is known, so a
    /// duplicate insertion still consumes coin flips.
    pub fn add(&mut self, value: T) -> bool {
        let promotion = promotion_count(&mut self.coin);

        let Some(found) = self.search(&value) else {
            self.init_head(value);
            self.size = 1;
            return true;
        };

        match self.nodes[found].value.cmp(&value) {
            Ordering::Equal => return false,
            Ordering::Greater => self.change_head(value, promotion),
            Ordering::Less => {
                let base = self.link_after(found, TowerNode::new(value, 1));
                self.grow_tower(base, promotion);
            }
        }

        self.size += 1;
        true
    }

    /// Remove `value`. Returns `false` if it was not present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Remove `value` and hand back the stored element.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.find(value)?;
        self.remove_node(found)
    }

    /// Best-effort reshaping of tower heights toward the ideal layout.
    ///
    /// Levels above `floor(log2(len))` are dropped (never below the
    /// two-level head column), then each element at 1-based position `p`
    /// is grown to `floor(log2(len) - log2(p))` levels if shorter. This is
    /// a heuristic: it does not guarantee faster searches afterwards.
    pub fn rebalance(&mut self) {
        if self.size == 0 {
            return;
        }
        let ideal = self.size.ilog2() as usize;
        let floor = ideal.max(2);
        let before = self.height;

        while self.height > floor {
            if !self.drop_top_level() {
                break;
            }
        }

        while self.height < ideal {
            self.grow_head();
        }

        let mut position = 1usize;
        let mut cursor = self.bottom_head.and_then(|id| self.nodes[id].next);
        while let Some(id) = cursor {
            position += 1;
            let target = ideal.saturating_sub(ceil_log2(position));
            let current = self.tower_height(id);
            if current < target {
                self.grow_tower(id, target - current);
            }
            cursor = self.nodes[id].next;
        }

        let (after, size) = (self.height, self.size);
        self.log.log(LogLevel::Info, REBALANCE, "rebalanced", |e| {
            e.with_field("from", before)
                .with_field("to", after)
                .with_field("size", size)
        });
    }

    /// Unlink the element whose base cell is `base`.
    pub(crate) fn remove_node(&mut self, base: NodeId) -> Option<T> {
        if self.size == 1 {
            let value = self.nodes.release(base).map(|node| node.value);
            self.reset();
            return value;
        }
        let value = if Some(base) == self.bottom_head {
            self.remove_head()
        } else {
            self.remove_column(base)
        }?;
        self.size -= 1;
        Some(value)
    }

    /// Two-level head column for the first element.
    fn init_head(&mut self, value: T) {
        let base = self.nodes.alloc(TowerNode::new(value.clone(), 1));
        let mut top = TowerNode::new(value, 2);
        top.below = Some(base);
        let top = self.nodes.alloc(top);
        self.nodes[base].above = Some(top);

        self.head = Some(top);
        self.bottom_head = Some(base);
        self.bottom_tail = Some(base);
        self.height = 2;
    }

    /// `value` becomes the minimum: relabel the head column, then give the
    /// old minimum its own tower right behind it.
    fn change_head(&mut self, value: T, promotion: usize) {
        let Some(base) = self.bottom_head else { return };

        let old = std::mem::replace(&mut self.nodes[base].value, value.clone());
        let mut cell = self.nodes[base].above;
        while let Some(id) = cell {
            self.nodes[id].value = value.clone();
            cell = self.nodes[id].above;
        }

        let demoted = self.link_after(base, TowerNode::new(old, 1));
        self.grow_tower(demoted, promotion);

        let height = self.height;
        self.log.log(LogLevel::Debug, INSERT, "head column relabelled", |e| {
            e.with_field("promotion", promotion).with_field("height", height)
        });
    }

    /// Add `count` levels on top of the tower rooted at `base`.
    pub(crate) fn grow_tower(&mut self, base: NodeId, count: usize) {
        let mut top = self.tower_top(base);
        for _ in 0..count {
            let level = self.nodes[top].level + 1;
            while level >= self.height {
                self.grow_head();
            }
            let left = self.promoted_predecessor(top);
            debug_assert!(left.is_some(), "no promoted predecessor on level {level}");
            let Some(left) = left else {
                self.log.log(LogLevel::Error, INSERT, "tower growth stopped early", |e| {
                    e.with_field("level", level)
                });
                return;
            };
            let mut cell = TowerNode::new(self.nodes[top].value.clone(), level);
            cell.below = Some(top);
            let id = self.link_after(left, cell);
            self.nodes[top].above = Some(id);
            top = id;
        }
    }

    /// Extend the head column by one level.
    fn grow_head(&mut self) {
        let Some(top) = self.head else { return };
        let mut cell = TowerNode::new(self.nodes[top].value.clone(), self.nodes[top].level + 1);
        cell.below = Some(top);
        let id = self.nodes.alloc(cell);
        self.nodes[top].above = Some(id);
        self.head = Some(id);
        self.height += 1;

        let height = self.height;
        self.log.log(LogLevel::Debug, INSERT, "head column grown", |e| {
            e.with_field("height", height)
        });
    }

    /// Remove the minimum by relabelling the head column with its successor
    /// and unlinking the successor's tower. Needs at least two elements.
    fn remove_head(&mut self) -> Option<T> {
        let base = self.bottom_head?;
        let successor = self.nodes[base].next?;

        let new_min = self.nodes[successor].value.clone();
        let removed = std::mem::replace(&mut self.nodes[base].value, new_min.clone());

        let mut head_cell = Some(base);
        let mut successor_cell = Some(successor);
        while let Some(cell) = head_cell {
            if cell != base {
                self.nodes[cell].value = new_min.clone();
            }
            if let Some(dup) = successor_cell
                && self.nodes[cell].next == Some(dup)
            {
                successor_cell = self.unlink(dup).and_then(|node| node.above);
            }
            head_cell = self.nodes[cell].above;
        }

        let height = self.height;
        self.log.log(LogLevel::Debug, REMOVE, "minimum removed", |e| {
            e.with_field("height", height)
        });
        Some(removed)
    }

    /// Unlink every cell of the tower rooted at `base`.
    fn remove_column(&mut self, base: NodeId) -> Option<T> {
        let bottom = self.unlink(base)?;
        let mut cell = bottom.above;
        while let Some(id) = cell {
            cell = self.unlink(id).and_then(|node| node.above);
        }
        Some(bottom.value)
    }

    /// Release every cell on the top level and lower the head by one.
    fn drop_top_level(&mut self) -> bool {
        let Some(top) = self.head else { return false };
        let Some(below) = self.nodes[top].below else {
            return false;
        };

        let mut cursor = self.nodes[top].next;
        while let Some(id) = cursor {
            let Some(node) = self.nodes.release(id) else { break };
            if let Some(under) = node.below {
                self.nodes[under].above = None;
            }
            cursor = node.next;
        }

        self.nodes.release(top);
        self.nodes[below].above = None;
        self.head = Some(below);
        self.height -= 1;
        true
    }
}

/// `ceil(log2(n))` for `n >= 1`.
fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else if n.is_power_of_two() {
        n.ilog2() as usize
    } else {
        n.ilog2() as usize + 1
    }
}

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use skipset_coin::{CoinFlip, SeededCoin};
use skipset_config::SkipSetConfig;
use skipset_logging::{LogCollector, LogEntry, LogLevel, Logger, LoggingConfig};

use crate::cursor::{CursorMut, IntoIter, Iter};
use crate::error::{Result, SkipSetError};
use crate::node::{Arena, NodeId};

pub(crate) const INSERT: &str = "skipset::insert";
pub(crate) const REMOVE: &str = "skipset::remove";
pub(crate) const REBALANCE: &str = "skipset::rebalance";
pub(crate) const RETAIN: &str = "skipset::retain";
pub(crate) const CLEAR: &str = "skipset::clear";

/// An ordered set backed by a skip list.
///
/// Elements are kept unique and in ascending natural order. The column
/// holding the current minimum doubles as the head of every level, so
/// there is no sentinel node; see [`add`](Self::add) and
/// [`remove`](Self::remove) for how that column is relabelled.
///
/// `C` is the source of level-promotion coin flips. The default
/// [`SeededCoin`] is seeded deterministically, so two sets fed the same
/// insertions end up with identical towers.
#[derive(Clone)]
pub struct SkipListSet<T, C = SeededCoin> {
    pub(crate) nodes: Arena<T>,
    /// Top of the head column.
    pub(crate) head: Option<NodeId>,
    /// Base cell of the head column (the minimum).
    pub(crate) bottom_head: Option<NodeId>,
    /// Base cell holding the maximum.
    pub(crate) bottom_tail: Option<NodeId>,
    pub(crate) height: usize,
    pub(crate) size: usize,
    pub(crate) coin: C,
    pub(crate) log: Logger,
}

impl<T> SkipListSet<T, SeededCoin> {
    /// Create an empty set with the default seed.
    pub fn new() -> Self {
        Self::with_coin(SeededCoin::default())
    }

    /// Create an empty set whose promotion coin starts from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_coin(SeededCoin::new(seed))
    }

    /// Create an empty set from configuration.
    pub fn from_config(config: &SkipSetConfig) -> Self {
        Self::with_coin(config.coin()).with_logging(config.logging.clone())
    }
}

impl<T: Ord + Clone> SkipListSet<T, SeededCoin> {
    /// Create a set holding every value of `values` (duplicates collapse).
    pub fn from_collection<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut set = Self::new();
        set.add_all(values);
        set
    }
}

impl<T> Default for SkipListSet<T, SeededCoin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> SkipListSet<T, C> {
    /// Create an empty set that draws promotions from `coin`.
    pub fn with_coin(coin: C) -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            bottom_head: None,
            bottom_tail: None,
            height: 1,
            size: 0,
            coin,
            log: Logger::default(),
        }
    }

    /// Replace the structural event log configuration.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.log = Logger::new(config);
        self
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels, including the base. An empty set has one.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Smallest element.
    pub fn first(&self) -> Result<&T> {
        self.bottom_head
            .map(|id| &self.nodes[id].value)
            .ok_or(SkipSetError::Empty)
    }

    /// Largest element.
    pub fn last(&self) -> Result<&T> {
        self.bottom_tail
            .map(|id| &self.nodes[id].value)
            .ok_or(SkipSetError::Empty)
    }

    /// Borrowing iterator in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.bottom_head, self.bottom_tail, self.size)
    }

    /// Always `None`: only natural ordering is supported.
    pub fn comparator(&self) -> Option<fn(&T, &T) -> Ordering> {
        None
    }

    /// Range views are not supported.
    pub fn sub_set(&self, _from: &T, _to: &T) -> Result<Self> {
        Err(SkipSetError::Unsupported("sub_set"))
    }

    /// Range views are not supported.
    pub fn head_set(&self, _to: &T) -> Result<Self> {
        Err(SkipSetError::Unsupported("head_set"))
    }

    /// Range views are not supported.
    pub fn tail_set(&self, _from: &T) -> Result<Self> {
        Err(SkipSetError::Unsupported("tail_set"))
    }

    /// Structural events recorded so far.
    pub fn log(&self) -> &LogCollector {
        self.log.collector()
    }

    /// Remove and return the recorded structural events.
    pub fn take_log(&mut self) -> Vec<LogEntry> {
        self.log.drain()
    }

    /// Configuration gating the structural event log.
    pub fn logging_config(&self) -> &LoggingConfig {
        self.log.config()
    }

    /// Recorded events, one per line, in the configured format.
    pub fn render_log(&self) -> String {
        self.log.render()
    }

    /// Discard recorded events without returning them.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Drop every element. The promotion coin is not rewound.
    pub fn clear(&mut self) {
        let removed = self.size;
        self.reset();
        self.log.log(LogLevel::Debug, CLEAR, "cleared", |e| {
            e.with_field("removed", removed)
        });
    }

    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.bottom_head = None;
        self.bottom_tail = None;
        self.height = 1;
        self.size = 0;
    }
}

impl<T: Ord, C> SkipListSet<T, C> {
    /// Whether `value` is an element of the set.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(value).is_some()
    }

    /// Whether every value yielded by `values` is an element of the set.
    pub fn contains_all<'a, Q, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        T: Borrow<Q>,
        Q: Ord + ?Sized + 'a,
    {
        values.into_iter().all(|value| self.contains(value))
    }
}

impl<T: Ord + Clone, C: CoinFlip> SkipListSet<T, C> {
    /// Insert every value. Always returns `true`, whatever each insertion did.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, values: I) -> bool {
        for value in values {
            self.add(value);
        }
        true
    }

    /// Remove every value that is present. Always returns `true`.
    pub fn remove_all<'a, Q, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        T: Borrow<Q>,
        Q: Ord + ?Sized + 'a,
    {
        for value in values {
            self.remove(value);
        }
        true
    }

    /// Keep only the elements that also appear in `values`. Always returns `true`.
    pub fn retain_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut wanted: Vec<&T> = values.into_iter().collect();
        wanted.sort();
        wanted.dedup();
        self.retain(|value| wanted.binary_search_by(|held| (*held).cmp(value)).is_ok());
        true
    }

    /// Keep only the elements for which `keep` returns `true`.
    ///
    /// `keep` is evaluated for every element before anything changes; the
    /// survivors are then rebuilt into a fresh structure that replaces
    /// this one.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        let verdicts: Vec<bool> = self.iter().map(&mut keep).collect();
        let before = self.size;

        let mut old = std::mem::take(&mut self.nodes);
        let mut cursor = self.bottom_head;
        self.reset();

        for kept in verdicts {
            let Some(id) = cursor else { break };
            let Some(node) = old.release(id) else { break };
            cursor = node.next;
            if kept {
                self.add(node.value);
            }
        }

        let after = self.size;
        self.log.log(LogLevel::Info, RETAIN, "retained", |e| {
            e.with_field("before", before).with_field("after", after)
        });
    }

    /// Ascending snapshot of the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Clear `out` and fill it with an ascending snapshot of the elements.
    pub fn write_to(&self, out: &mut Vec<T>) {
        out.clear();
        out.reserve(self.size);
        out.extend(self.iter().cloned());
    }

    /// A cursor over the base level that can remove the element it just returned.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut::new(self)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SkipListSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, D> PartialEq<SkipListSet<T, D>> for SkipListSet<T, C> {
    fn eq(&self, other: &SkipListSet<T, D>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for SkipListSet<T, C> {}

impl<T: Ord + Clone> FromIterator<T> for SkipListSet<T, SeededCoin> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_collection(iter)
    }
}

impl<T: Ord + Clone, C: CoinFlip> Extend<T> for SkipListSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T, C> IntoIterator for &'a SkipListSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for SkipListSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let mut values = Vec::with_capacity(self.size);
        let mut cursor = self.bottom_head;
        while let Some(id) = cursor {
            let Some(node) = self.nodes.release(id) else { break };
            cursor = node.next;
            values.push(node.value);
        }
        IntoIter::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipset_coin::ScriptedCoin;

    #[test]
    fn empty_set() {
        let set: SkipListSet<i32> = SkipListSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 1);
        assert_eq!(set.first(), Err(SkipSetError::Empty));
        assert_eq!(set.last(), Err(SkipSetError::Empty));
        assert!(!set.contains(&1));
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn first_and_last() {
        let set = SkipListSet::from_collection([5, 3, 8, 1]);
        assert_eq!(set.first(), Ok(&1));
        assert_eq!(set.last(), Ok(&8));
    }

    #[test]
    fn contains_all_and_borrowed_lookup() {
        let set = SkipListSet::from_collection(["b".to_string(), "a".to_string()]);
        assert!(set.contains("a"));
        assert!(!set.contains("c"));
        assert!(set.contains_all(["a", "b"]));
        assert!(!set.contains_all(["a", "z"]));
        assert!(set.contains_all(std::iter::empty::<&str>()));
    }

    #[test]
    fn add_all_and_remove_all_always_report_success() {
        let mut set = SkipListSet::new();
        assert!(set.add_all([1, 1, 2]));
        assert_eq!(set.len(), 2);
        assert!(set.remove_all(&[2, 7]));
        assert_eq!(set.to_vec(), vec![1]);
    }

    #[test]
    fn retain_all_keeps_intersection() {
        let mut set = SkipListSet::from_collection(1..=10);
        assert!(set.retain_all(&[2, 4, 6, 11]));
        assert_eq!(set.to_vec(), vec![2, 4, 6]);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn retain_all_with_nothing_empties() {
        let mut set = SkipListSet::from_collection([3, 1, 2]);
        set.retain_all(&[]);
        assert!(set.is_empty());
        assert_eq!(set.height(), 1);
        assert_eq!(set.first(), Err(SkipSetError::Empty));
    }

    #[test]
    fn retain_with_predicate() {
        let mut set = SkipListSet::from_collection(0..20);
        set.retain(|v| v % 3 == 0);
        assert_eq!(set.to_vec(), vec![0, 3, 6, 9, 12, 15, 18]);
        assert_eq!(set.first(), Ok(&0));
        assert_eq!(set.last(), Ok(&18));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn retain_logs_summary() {
        let mut set = SkipListSet::from_collection(0..4);
        set.retain(|v| *v < 2);
        let entries = set.log().filter_by_component(RETAIN);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fields.get("before").map(String::as_str), Some("4"));
        assert_eq!(entries[0].fields.get("after").map(String::as_str), Some("2"));
    }

    #[test]
    fn write_to_replaces_buffer() {
        let set = SkipListSet::from_collection([9, 1, 5]);
        let mut out = vec![100, 200, 300, 400];
        set.write_to(&mut out);
        assert_eq!(out, vec![1, 5, 9]);
    }

    #[test]
    fn clear_resets_structure() {
        let mut set = SkipListSet::from_collection(0..50);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.height(), 1);
        assert_eq!(set.iter().next(), None);
        assert!(set.validate().is_ok());
        assert!(set.add(4));
        assert_eq!(set.to_vec(), vec![4]);
    }

    #[test]
    fn range_views_are_unsupported() {
        let set = SkipListSet::from_collection([1, 2, 3]);
        assert_eq!(
            set.sub_set(&1, &3).unwrap_err(),
            SkipSetError::Unsupported("sub_set")
        );
        assert_eq!(set.head_set(&2).unwrap_err(), SkipSetError::Unsupported("head_set"));
        assert_eq!(set.tail_set(&2).unwrap_err(), SkipSetError::Unsupported("tail_set"));
        assert!(set.comparator().is_none());
    }

    #[test]
    fn debug_uses_set_notation() {
        let set = SkipListSet::from_collection([3, 1, 2]);
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    }

    #[test]
    fn equality_ignores_tower_shape() {
        let a = SkipListSet::from_collection([1, 2, 3]);
        let mut b = SkipListSet::with_coin(ScriptedCoin::from_counts(&[4, 0, 2]));
        b.add_all([3, 2, 1]);
        assert!(a == b);
        b.remove(&2);
        assert!(a != b);
    }

    #[test]
    fn collect_and_extend() {
        let mut set: SkipListSet<i32> = [4, 2, 4].into_iter().collect();
        set.extend([1, 3]);
        assert_eq!(set.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn into_iter_drains_in_order() {
        let set = SkipListSet::from_collection([7, 3, 5]);
        let values: Vec<i32> = set.into_iter().collect();
        assert_eq!(values, vec![3, 5, 7]);
    }

    #[test]
    fn borrowed_into_iter() {
        let set = SkipListSet::from_collection([2, 1]);
        let mut seen = Vec::new();
        for v in &set {
            seen.push(*v);
        }
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn from_config_uses_seed_and_logging() {
        let config = SkipSetConfig::new()
            .with_seed(5)
            .with_logging(LoggingConfig::disabled());
        let mut a: SkipListSet<i32> = SkipListSet::from_config(&config);
        let mut b: SkipListSet<i32> = SkipListSet::with_seed(5);
        a.add_all(0..64);
        b.add_all(0..64);
        assert_eq!(a.stats(), b.stats());
        a.retain(|_| true);
        assert!(a.log().is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let mut a = SkipListSet::from_collection([1, 2, 3]);
        let b = a.clone();
        a.remove(&1);
        assert_eq!(b.to_vec(), vec![1, 2, 3]);
        assert_eq!(a.to_vec(), vec![2, 3]);
        assert!(b.validate().is_ok());
    }
}

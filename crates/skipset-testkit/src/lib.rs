//! Test helpers shared across skipset crates.
//!
//! Strategies generate small value domains on purpose so that duplicate
//! inserts, removals of present values and new minimums all show up often.
//! [`apply_ops`] replays an operation sequence against anything that
//! implements [`OrderedSet`], and [`check_against_model`] compares it step by
//! step with `std::collections::BTreeSet`.

use std::collections::BTreeSet;
use std::fmt::Debug;

use proptest::prelude::*;

// ============================================================================
// Operation model
// ============================================================================

/// One step of a generated workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOp<T> {
    Add(T),
    Remove(T),
    Contains(T),
    Rebalance,
    Clear,
}

/// The surface an ordered set must expose to be checked against the model.
pub trait OrderedSet<T> {
    fn insert(&mut self, value: T) -> bool;
    fn delete(&mut self, value: &T) -> bool;
    fn has(&self, value: &T) -> bool;
    fn size(&self) -> usize;
    fn ascending(&self) -> Vec<T>;
    fn wipe(&mut self);

    /// Reshape without changing contents. The model has nothing to do.
    fn reshape(&mut self) {}
}

impl<T: Ord + Clone> OrderedSet<T> for BTreeSet<T> {
    fn insert(&mut self, value: T) -> bool {
        BTreeSet::insert(self, value)
    }

    fn delete(&mut self, value: &T) -> bool {
        self.remove(value)
    }

    fn has(&self, value: &T) -> bool {
        self.contains(value)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn ascending(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    fn wipe(&mut self) {
        self.clear();
    }
}

/// Apply one operation. Boolean-returning operations report their result.
pub fn apply_op<T: Clone, S: OrderedSet<T>>(subject: &mut S, op: &SetOp<T>) -> Option<bool> {
    match op {
        SetOp::Add(value) => Some(subject.insert(value.clone())),
        SetOp::Remove(value) => Some(subject.delete(value)),
        SetOp::Contains(value) => Some(subject.has(value)),
        SetOp::Rebalance => {
            subject.reshape();
            None
        }
        SetOp::Clear => {
            subject.wipe();
            None
        }
    }
}

/// Replay `ops` in order, collecting each step's result.
pub fn apply_ops<T: Clone, S: OrderedSet<T>>(subject: &mut S, ops: &[SetOp<T>]) -> Vec<Option<bool>> {
    ops.iter().map(|op| apply_op(subject, op)).collect()
}

/// Replay `ops` against `subject` and a `BTreeSet`, failing at the first
/// step where results, sizes or contents disagree.
pub fn check_against_model<T, S>(subject: &mut S, ops: &[SetOp<T>]) -> Result<(), String>
where
    T: Ord + Clone + Debug,
    S: OrderedSet<T>,
{
    let mut model: BTreeSet<T> = BTreeSet::new();
    for (step, op) in ops.iter().enumerate() {
        let expected = apply_op(&mut model, op);
        let actual = apply_op(subject, op);
        if expected != actual {
            return Err(format!(
                "step {step} {op:?}: expected {expected:?}, got {actual:?}"
            ));
        }
        if model.size() != subject.size() {
            return Err(format!(
                "step {step} {op:?}: expected len {}, got {}",
                model.size(),
                subject.size()
            ));
        }
    }
    let expected = model.ascending();
    let actual = subject.ascending();
    if expected != actual {
        return Err(format!("final contents: expected {expected:?}, got {actual:?}"));
    }
    Ok(())
}

// ============================================================================
// Strategies
// ============================================================================

/// Values from a narrow range, so collisions are common.
pub fn strategy_value() -> impl Strategy<Value = i32> {
    -50i32..50
}

/// Up to `max_len` values, duplicates allowed, in arbitrary order.
pub fn strategy_values(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(strategy_value(), 0..=max_len)
}

/// Strategy for a single operation; additions dominate so sets grow.
pub fn strategy_op() -> impl Strategy<Value = SetOp<i32>> {
    prop_oneof![
        6 => strategy_value().prop_map(SetOp::Add),
        3 => strategy_value().prop_map(SetOp::Remove),
        2 => strategy_value().prop_map(SetOp::Contains),
        1 => Just(SetOp::Rebalance),
        1 => Just(SetOp::Clear),
    ]
}

pub fn strategy_ops(max_len: usize) -> impl Strategy<Value = Vec<SetOp<i32>>> {
    prop::collection::vec(strategy_op(), 0..=max_len)
}

/// Promotion counts for a scripted coin, mostly small with the odd tall tower.
pub fn strategy_promotions(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(
        prop_oneof![8 => 0usize..=2, 1 => 3usize..=8],
        0..=max_len,
    )
}

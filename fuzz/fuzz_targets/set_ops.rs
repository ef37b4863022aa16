//! Fuzz harness for set operations
//!
//! Bytes are decoded into an operation stream plus a scripted promotion
//! source; every step is checked against `BTreeSet` and the structure is
//! validated after each mutation.

#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;
use skipset::SkipListSet;
use skipset_coin::ScriptedCoin;

fuzz_target!(|data: &[u8]| {
    let (script, ops) = data.split_at(data.len() / 4);
    let coin = ScriptedCoin::new(script.iter().map(|b| b & 1 == 1));
    let mut set = SkipListSet::with_coin(coin);
    let mut model = BTreeSet::new();

    for chunk in ops.chunks(2) {
        let [op, value] = *chunk else { break };
        let value = value % 64;
        match op % 8 {
            0..=3 => assert_eq!(set.add(value), model.insert(value)),
            4 | 5 => assert_eq!(set.remove(&value), model.remove(&value)),
            6 => set.rebalance(),
            _ => assert_eq!(set.contains(&value), model.contains(&value)),
        }
        assert!(set.validate().is_ok());
        assert_eq!(set.len(), model.len());
    }

    assert!(set.iter().eq(model.iter()));
});

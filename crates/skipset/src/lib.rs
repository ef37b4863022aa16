//! An ordered set backed by a skip list.
//!
//! [`SkipListSet`] keeps unique elements in ascending order and offers
//! expected logarithmic `add`, `remove` and `contains`. Towers are grown by
//! an injectable coin ([`CoinFlip`]); the default [`SeededCoin`] is seeded,
//! so identical insertion sequences produce identical structures.
//!
//! ```
//! use skipset::SkipListSet;
//!
//! let mut set = SkipListSet::from_collection([5, 3, 8, 1]);
//! assert_eq!(set.first(), Ok(&1));
//! assert!(!set.add(3));
//! assert!(set.remove(&1));
//! assert_eq!(set.to_vec(), vec![3, 5, 8]);
//! ```

mod cursor;
mod diagnostics;
mod error;
mod node;
mod serde_impl;
mod set;
mod tower;

pub use cursor::{CursorMut, IntoIter, Iter};
pub use diagnostics::SkipSetStats;
pub use error::{Result, SkipSetError};
pub use set::SkipListSet;

pub use skipset_coin::{CoinFlip, DEFAULT_SEED, ScriptedCoin, SeededCoin, promotion_count};
pub use skipset_config::{ConfigFormat, SkipSetConfig, load_config, save_config};
pub use skipset_logging::{LogCollector, LogEntry, LogFormat, LogLevel, LoggingConfig};

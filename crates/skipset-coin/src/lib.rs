//! Level-promotion coin sources for skipset.
//!
//! Every insertion into a skip list set draws a promotion count by tossing a
//! fair coin until it comes up tails. The source of those tosses is injected
//! into the set, so tests can replace the seeded generator with a fixed script
//! and assert exact tower shapes.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seed used when no seed is configured.
pub const DEFAULT_SEED: u64 = 1;

/// A source of fair coin tosses.
pub trait CoinFlip {
    /// Toss once. `true` promotes the new node one more level.
    fn flip(&mut self) -> bool;
}

impl<C: CoinFlip + ?Sized> CoinFlip for &mut C {
    fn flip(&mut self) -> bool {
        (**self).flip()
    }
}

impl<C: CoinFlip + ?Sized> CoinFlip for Box<C> {
    fn flip(&mut self) -> bool {
        (**self).flip()
    }
}

/// Count consecutive heads before the first tails.
///
/// Geometrically distributed with expected value 1 for a fair coin.
pub fn promotion_count<C: CoinFlip + ?Sized>(coin: &mut C) -> usize {
    let mut count = 0;
    while coin.flip() {
        count += 1;
    }
    count
}

/// A deterministic coin backed by a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededCoin {
    seed: u64,
    rng: StdRng,
}

impl SeededCoin {
    /// Create a new coin from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this coin was created (or last reset) with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind the coin to the start of the sequence for `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for SeededCoin {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl CoinFlip for SeededCoin {
    fn flip(&mut self) -> bool {
        self.rng.random()
    }
}

/// A coin that replays a fixed sequence of tosses.
///
/// Once the script runs out every toss is tails, so a promotion count
/// drawn from an exhausted script is always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedCoin {
    flips: VecDeque<bool>,
}

impl ScriptedCoin {
    /// Replay `flips` in order.
    pub fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Self {
            flips: flips.into_iter().collect(),
        }
    }

    /// One promotion count per draw: `n` heads followed by a tails.
    pub fn from_counts(counts: &[usize]) -> Self {
        let mut flips = VecDeque::new();
        for &count in counts {
            flips.extend(std::iter::repeat_n(true, count));
            flips.push_back(false);
        }
        Self { flips }
    }

    /// Append further promotion counts to the script.
    pub fn push_counts(&mut self, counts: &[usize]) {
        for &count in counts {
            self.flips.extend(std::iter::repeat_n(true, count));
            self.flips.push_back(false);
        }
    }

    /// Number of tosses not yet replayed.
    pub fn remaining(&self) -> usize {
        self.flips.len()
    }
}

impl CoinFlip for ScriptedCoin {
    fn flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

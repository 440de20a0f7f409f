//! Fibonacci Q-matrix state.
//!
//! The chain carries a pair `(F(n+1), F(n))` that advances by one step per
//! appended block: `Q * [F(n+1), F(n)]ᵀ = [F(n+2), F(n+1)]ᵀ`.
//!
//! Values are tracked modulo 2^64 so long chains never overflow; the pair is
//! only used as hash material and a height witness.

use serde::{Deserialize, Serialize};

/// Immutable `(F(n+1), F(n))` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FibState {
    pub f_next: u64,
    pub f_current: u64,
}

impl FibState {
    /// `(F(2), F(1))`, the state the genesis block is built on.
    pub const GENESIS: FibState = FibState {
        f_next: 1,
        f_current: 1,
    };

    pub const fn new(f_next: u64, f_current: u64) -> Self {
        Self { f_next, f_current }
    }

    /// One Q-matrix step: `(a, b) -> (a + b, a)`.
    #[must_use]
    pub fn evolve(self) -> Self {
        Self {
            f_next: self.f_next.wrapping_add(self.f_current),
            f_current: self.f_next,
        }
    }

    /// Applies `steps` Q-matrix steps.
    #[must_use]
    pub fn advanced_by(self, steps: u64) -> Self {
        (0..steps).fold(self, |state, _| state.evolve())
    }

    pub fn as_pair(self) -> (u64, u64) {
        (self.f_next, self.f_current)
    }
}

impl Default for FibState {
    fn default() -> Self {
        Self::GENESIS
    }
}

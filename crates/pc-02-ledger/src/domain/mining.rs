//! Proof-of-work nonce search.
//!
//! A block meets difficulty `d` when its hex hash starts with `d` zeros. The
//! search is brute force: `nonce` counts up from its current value until the
//! target is met or the attempt budget runs out.

use crate::error::MiningError;
use shared_types::Block;
use tracing::debug;

/// A SHA-256 hex digest has 64 digits.
pub const MAX_DIFFICULTY: u32 = 64;

/// Mining operations on a block.
pub trait BlockMining {
    /// Searches without an attempt cap. Only sensible for small difficulties.
    fn mine(&mut self, difficulty: u32) -> Result<u64, MiningError>;

    /// Searches at most `max_attempts` nonces. Returns the attempts used.
    ///
    /// On failure the block keeps its last tried nonce and is not sealed at
    /// the target; callers discard it.
    fn mine_bounded(&mut self, difficulty: u32, max_attempts: u64) -> Result<u64, MiningError>;
}

impl BlockMining for Block {
    fn mine(&mut self, difficulty: u32) -> Result<u64, MiningError> {
        self.mine_bounded(difficulty, u64::MAX)
    }

    fn mine_bounded(&mut self, difficulty: u32, max_attempts: u64) -> Result<u64, MiningError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(MiningError::DifficultyOutOfRange {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }

        let root = self.transactions_root();
        let start = self.nonce;
        for attempt in 0..max_attempts {
            self.nonce = start.wrapping_add(attempt);
            self.hash = self.hash_with_root(&root);
            if self.meets_difficulty(difficulty) {
                debug!(
                    index = self.index,
                    nonce = self.nonce,
                    attempts = attempt + 1,
                    "Block mined"
                );
                return Ok(attempt + 1);
            }
        }

        Err(MiningError::IterationLimitReached {
            attempts: max_attempts,
        })
    }
}

//! Protocol parameter set.
//!
//! Every constant is `F(n)` for a fixed protocol index, computed once on first
//! access and never mutated afterwards.

use crate::sequence::{fib, golden_ratio};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Fibonacci index of each protocol constant.
pub mod index {
    pub const SLOT_DURATION: i8 = 6;
    pub const EPOCH_DURATION: i8 = 18;
    pub const MIN_VALIDATOR_STAKE: i8 = 20;
    pub const MAX_VALIDATOR_COUNT: i8 = 17;
    pub const TARGET_COMMITTEE_SIZE: i8 = 14;
    pub const FINALITY_THRESHOLD: i8 = 15;
    pub const GENESIS_SUPPLY: i8 = 33;
    pub const BLOCK_REWARD: i8 = 11;
    pub const FEE_BASE: i8 = 8;
    pub const GENESIS_TIMESTAMP: i8 = 33;
    pub const SLASHING_FLOOR: i8 = 20;
}

lazy_static! {
    /// Process-wide parameter snapshot.
    pub static ref PROTOCOL_PARAMS: ProtocolParams = ProtocolParams::derive();
}

/// Fibonacci-derived protocol constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Seconds per slot, `F(6) = 8`.
    pub slot_duration: u64,
    /// Seconds per epoch, `F(18) = 2584`.
    pub epoch_duration: u64,
    /// `F(20) = 6765`.
    pub min_validator_stake: u64,
    /// `F(17) = 1597`.
    pub max_validator_count: u64,
    /// `F(14) = 377`.
    pub target_committee_size: u64,
    /// Signatures required for finality, `F(15) = 610`.
    pub finality_threshold: u64,
    /// `F(33) = 3_524_578`, minted to the treasury in genesis.
    pub genesis_supply: u64,
    /// `F(11) = 89`.
    pub block_reward: u64,
    /// Per-transaction fee credited to the proposer, `F(8) = 21`.
    pub fee_base: u64,
    /// Genesis block timestamp, `F(33)` seconds after the Unix epoch.
    pub genesis_timestamp: u64,
    /// Stake below which a slashed validator is deactivated, `F(20)`.
    pub slashing_floor: u64,
}

impl ProtocolParams {
    /// Shared snapshot.
    pub fn get() -> &'static ProtocolParams {
        &PROTOCOL_PARAMS
    }

    /// Computes the table from the Fibonacci indices in [`index`].
    pub fn derive() -> Self {
        Self {
            slot_duration: constant(index::SLOT_DURATION),
            epoch_duration: constant(index::EPOCH_DURATION),
            min_validator_stake: constant(index::MIN_VALIDATOR_STAKE),
            max_validator_count: constant(index::MAX_VALIDATOR_COUNT),
            target_committee_size: constant(index::TARGET_COMMITTEE_SIZE),
            finality_threshold: constant(index::FINALITY_THRESHOLD),
            genesis_supply: constant(index::GENESIS_SUPPLY),
            block_reward: constant(index::BLOCK_REWARD),
            fee_base: constant(index::FEE_BASE),
            genesis_timestamp: constant(index::GENESIS_TIMESTAMP),
            slashing_floor: constant(index::SLASHING_FLOOR),
        }
    }

    /// Golden ratio as used by the protocol, `F(79) / F(78)`.
    pub fn phi(&self) -> f64 {
        golden_ratio()
    }

    /// Epoch containing `slot`.
    pub fn epoch_of_slot(&self, slot: u64) -> u64 {
        let slots_per_epoch = (self.epoch_duration / self.slot_duration).max(1);
        slot / slots_per_epoch
    }

    /// All constants as `(name, value)` pairs, in declaration order.
    pub fn entries(&self) -> [(&'static str, u64); 11] {
        [
            ("slot_duration", self.slot_duration),
            ("epoch_duration", self.epoch_duration),
            ("min_validator_stake", self.min_validator_stake),
            ("max_validator_count", self.max_validator_count),
            ("target_committee_size", self.target_committee_size),
            ("finality_threshold", self.finality_threshold),
            ("genesis_supply", self.genesis_supply),
            ("block_reward", self.block_reward),
            ("fee_base", self.fee_base),
            ("genesis_timestamp", self.genesis_timestamp),
            ("slashing_floor", self.slashing_floor),
        ]
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        PROTOCOL_PARAMS.clone()
    }
}

// Protocol indices are all small and positive, so the value always fits.
fn constant(index: i8) -> u64 {
    u64::try_from(fib(index)).unwrap_or(u64::MAX)
}

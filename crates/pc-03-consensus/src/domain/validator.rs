//! Validator domain entities

use serde::{Deserialize, Serialize};

/// Validator identifier.
pub type ValidatorId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorStatus {
    Active,
    /// Terminal.
    Inactive,
}

/// A registered validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub id: ValidatorId,
    pub stake: u64,
    pub active: bool,
    pub blocks_proposed: u64,
    pub blocks_finalized: u64,
    pub slashing_count: u32,
    /// Votes cast; feeds the coherence score.
    pub participation: u64,
    /// Block rewards credited so far.
    pub total_rewards: u64,
}

impl Validator {
    /// Create an active validator with no history.
    pub fn new(id: impl Into<ValidatorId>, stake: u64) -> Self {
        Self {
            id: id.into(),
            stake,
            active: true,
            blocks_proposed: 0,
            blocks_finalized: 0,
            slashing_count: 0,
            participation: 0,
            total_rewards: 0,
        }
    }

    pub fn status(&self) -> ValidatorStatus {
        if self.active {
            ValidatorStatus::Active
        } else {
            ValidatorStatus::Inactive
        }
    }

    /// `(finalized / proposed + (1 - 0.1 * slashing_count)) / 2`, or 0.5
    /// before the first proposal.
    pub fn performance_score(&self) -> f64 {
        if self.blocks_proposed == 0 {
            return 0.5;
        }
        let finalization_rate = self.blocks_finalized as f64 / self.blocks_proposed as f64;
        let slashing_penalty = 1.0 - 0.1 * f64::from(self.slashing_count);
        (finalization_rate + slashing_penalty) / 2.0
    }

    pub fn info(&self) -> ValidatorInfo {
        ValidatorInfo {
            id: self.id.clone(),
            stake: self.stake,
            status: self.status(),
            blocks_proposed: self.blocks_proposed,
            blocks_finalized: self.blocks_finalized,
            slashing_count: self.slashing_count,
            participation: self.participation,
            total_rewards: self.total_rewards,
            performance_score: self.performance_score(),
        }
    }
}

/// Read-only view of a validator for API layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidatorInfo {
    pub id: ValidatorId,
    pub stake: u64,
    pub status: ValidatorStatus,
    pub blocks_proposed: u64,
    pub blocks_finalized: u64,
    pub slashing_count: u32,
    pub participation: u64,
    pub total_rewards: u64,
    pub performance_score: f64,
}

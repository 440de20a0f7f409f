//! Validator registry.
//!
//! Single-writer: callers serialise mutation. Validators are kept in
//! registration order with a lookup table by id, the same shape the
//! selection strategies walk.

use crate::config::{ConsensusConfig, SelectionPolicy};
use crate::domain::error::{RegistrationError, ValidatorError};
use crate::domain::selection::{CoherenceSelection, ProposerSelection, StakeWeightedSelection};
use crate::domain::validator::{Validator, ValidatorId, ValidatorInfo};
use pc_01_fibonacci::{is_fibonacci, ProtocolParams};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Aggregate view of the validator network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub total_validators: usize,
    pub active_validators: usize,
    pub total_stake: u64,
    pub active_stake: u64,
    pub finality_threshold: u64,
    pub supermajority_threshold: usize,
    pub selection_policy: &'static str,
}

pub struct ValidatorRegistry {
    validators: Vec<Validator>,
    lookup: HashMap<ValidatorId, usize>,
    total_stake: u64,
    params: ProtocolParams,
    selection: Box<dyn ProposerSelection>,
}

impl ValidatorRegistry {
    /// Empty registry using coherence selection.
    pub fn new(params: ProtocolParams) -> Self {
        Self::with_selection(params, Box::new(CoherenceSelection))
    }

    pub fn with_selection(params: ProtocolParams, selection: Box<dyn ProposerSelection>) -> Self {
        Self {
            validators: Vec::new(),
            lookup: HashMap::new(),
            total_stake: 0,
            params,
            selection,
        }
    }

    pub fn from_config(params: ProtocolParams, config: &ConsensusConfig) -> Self {
        let selection: Box<dyn ProposerSelection> =
            match (config.selection_policy, config.rng_seed) {
                (SelectionPolicy::Coherence, _) => Box::new(CoherenceSelection),
                (SelectionPolicy::StakeWeighted, Some(seed)) => {
                    Box::new(StakeWeightedSelection::seeded(seed))
                }
                (SelectionPolicy::StakeWeighted, None) => {
                    Box::new(StakeWeightedSelection::from_entropy())
                }
            };
        Self::with_selection(params, selection)
    }

    // -------------------------------------------------------------------------
    // Registration & slashing
    // -------------------------------------------------------------------------

    /// Registers an active validator. Checks run in order: Fibonacci stake,
    /// minimum stake, duplicate id, capacity.
    pub fn register(
        &mut self,
        id: impl Into<ValidatorId>,
        stake: u64,
    ) -> Result<(), RegistrationError> {
        let id = id.into();

        if !is_fibonacci(i128::from(stake)) {
            return Err(RegistrationError::NotFibonacci { stake });
        }
        if stake < self.params.min_validator_stake {
            return Err(RegistrationError::BelowMinimum {
                stake,
                minimum: self.params.min_validator_stake,
            });
        }
        if self.lookup.contains_key(&id) {
            return Err(RegistrationError::DuplicateId(id));
        }
        if self.validators.len() as u64 >= self.params.max_validator_count {
            return Err(RegistrationError::RegistryFull {
                capacity: self.params.max_validator_count,
            });
        }

        info!(validator = %id, stake, "Validator registered");
        self.lookup.insert(id.clone(), self.validators.len());
        self.validators.push(Validator::new(id, stake));
        self.total_stake = self.total_stake.saturating_add(stake);
        Ok(())
    }

    /// Removes `amount` from the validator's stake. Deactivates it when the
    /// remaining stake falls below the slashing floor `F(20)`.
    pub fn slash(&mut self, id: &str, amount: u64) -> Result<(), ValidatorError> {
        let floor = self.params.slashing_floor;
        let validator = self.get_mut(id)?;
        if amount > validator.stake {
            return Err(ValidatorError::InsufficientStake {
                id: id.to_string(),
                stake: validator.stake,
                amount,
            });
        }

        validator.stake -= amount;
        validator.slashing_count += 1;
        let remaining = validator.stake;
        if validator.active && remaining < floor {
            validator.active = false;
            warn!(validator = %id, remaining, floor, "Validator deactivated");
        }
        warn!(validator = %id, amount, remaining, "Validator slashed");

        self.total_stake = self.total_stake.saturating_sub(amount);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection & thresholds
    // -------------------------------------------------------------------------

    /// Next proposer under the configured policy.
    pub fn select_proposer(&mut self) -> Option<ValidatorId> {
        let chosen = self.selection.select(&self.validators).map(|v| v.id.clone());
        match &chosen {
            Some(id) => debug!(proposer = %id, policy = self.selection.name(), "Proposer selected"),
            None => warn!("No active validator available"),
        }
        chosen
    }

    /// `signature_count >= F(15)`.
    pub fn check_finality(&self, signature_count: u64) -> bool {
        signature_count >= self.params.finality_threshold
    }

    /// Votes needed for a supermajority of active validators.
    pub fn supermajority_threshold(&self) -> usize {
        2 * self.active_count() / 3 + 1
    }

    pub fn check_supermajority(&self, votes: usize) -> bool {
        votes >= self.supermajority_threshold()
    }

    /// `stake_share * participation_share` among active validators, or the
    /// stake share alone before any participation. `None` for unknown or
    /// inactive validators.
    pub fn coherence_score(&self, id: &str) -> Option<f64> {
        let validator = self.get(id).filter(|v| v.active)?;
        let active_stake = self.active_stake();
        if active_stake == 0 {
            return Some(0.0);
        }
        let stake_share = validator.stake as f64 / active_stake as f64;

        let total_participation: u64 = self.active().map(|v| v.participation).sum();
        if total_participation == 0 {
            return Some(stake_share);
        }
        Some(stake_share * (validator.participation as f64 / total_participation as f64))
    }

    // -------------------------------------------------------------------------
    // Bookkeeping
    // -------------------------------------------------------------------------

    pub fn record_proposal(&mut self, id: &str) -> Result<(), ValidatorError> {
        let validator = self.get_active_mut(id)?;
        validator.blocks_proposed += 1;
        Ok(())
    }

    pub fn record_finalization(&mut self, id: &str) -> Result<(), ValidatorError> {
        let validator = self.get_active_mut(id)?;
        validator.blocks_finalized += 1;
        Ok(())
    }

    /// Counts a consensus vote; raises the validator's coherence weight.
    pub fn record_vote(&mut self, id: &str) -> Result<(), ValidatorError> {
        let validator = self.get_active_mut(id)?;
        validator.participation += 1;
        Ok(())
    }

    /// `block_reward + fee_base * tx_count`.
    pub fn block_reward_for(&self, tx_count: usize) -> u64 {
        self.params
            .fee_base
            .saturating_mul(tx_count as u64)
            .saturating_add(self.params.block_reward)
    }

    /// Credits `amount` to the validator's reward account.
    pub fn credit_reward(&mut self, id: &str, amount: u64) -> Result<(), ValidatorError> {
        let validator = self.get_mut(id)?;
        validator.total_rewards = validator.total_rewards.saturating_add(amount);
        debug!(validator = %id, amount, "Reward credited");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&Validator> {
        self.lookup.get(id).map(|&idx| &self.validators[idx])
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Validator, ValidatorError> {
        match self.lookup.get(id) {
            Some(&idx) => Ok(&mut self.validators[idx]),
            None => Err(ValidatorError::UnknownValidator(id.to_string())),
        }
    }

    fn get_active_mut(&mut self, id: &str) -> Result<&mut Validator, ValidatorError> {
        let validator = self.get_mut(id)?;
        if !validator.active {
            return Err(ValidatorError::Inactive(id.to_string()));
        }
        Ok(validator)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// Registration order.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn active(&self) -> impl Iterator<Item = &Validator> {
        self.validators.iter().filter(|v| v.active)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Stake of every registered validator, active or not.
    pub fn total_stake(&self) -> u64 {
        self.total_stake
    }

    pub fn active_stake(&self) -> u64 {
        self.active().map(|v| v.stake).sum()
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn validator_info(&self, id: &str) -> Option<ValidatorInfo> {
        self.get(id).map(Validator::info)
    }

    pub fn network_stats(&self) -> NetworkStats {
        NetworkStats {
            total_validators: self.validators.len(),
            active_validators: self.active_count(),
            total_stake: self.total_stake,
            active_stake: self.active_stake(),
            finality_threshold: self.params.finality_threshold,
            supermajority_threshold: self.supermajority_threshold(),
            selection_policy: self.selection.name(),
        }
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.validators.len())
            .field("total_stake", &self.total_stake)
            .field("selection", &self.selection.name())
            .finish()
    }
}

//! Proposer selection strategies.
//!
//! Both strategies only consider active validators and walk them in
//! registration order, so ties always go to the earliest registrant.

use crate::domain::validator::Validator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy choosing the next proposer.
pub trait ProposerSelection: Send + Sync {
    /// Pick a proposer among `validators` (registration order), or `None`
    /// when no active validator exists.
    fn select<'a>(&mut self, validators: &'a [Validator]) -> Option<&'a Validator>;

    /// Short policy name for logs and stats.
    fn name(&self) -> &'static str;
}

/// Deterministic Proof-of-Coherence selection.
///
/// Score is `stake / total_stake * participation / total_participation`. The
/// denominators are shared by every candidate, so candidates are compared on
/// `stake * participation` in integer arithmetic. With no participation
/// recorded the score is the stake share alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoherenceSelection;

impl CoherenceSelection {
    fn weight(validator: &Validator, any_participation: bool) -> u128 {
        if any_participation {
            u128::from(validator.stake) * u128::from(validator.participation)
        } else {
            u128::from(validator.stake)
        }
    }
}

impl ProposerSelection for CoherenceSelection {
    fn select<'a>(&mut self, validators: &'a [Validator]) -> Option<&'a Validator> {
        let any_participation = validators
            .iter()
            .any(|v| v.active && v.participation > 0);

        let mut best: Option<(&Validator, u128)> = None;
        for validator in validators.iter().filter(|v| v.active) {
            let weight = Self::weight(validator, any_participation);
            match best {
                Some((_, best_weight)) if weight <= best_weight => {}
                _ => best = Some((validator, weight)),
            }
        }
        best.map(|(v, _)| v)
    }

    fn name(&self) -> &'static str {
        "coherence"
    }
}

/// Stake-weighted random selection over an injected RNG.
#[derive(Debug)]
pub struct StakeWeightedSelection<R> {
    rng: R,
}

impl<R: Rng + Send + Sync> StakeWeightedSelection<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl StakeWeightedSelection<StdRng> {
    /// Reproducible draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

/// Walks active validators accumulating stake and returns the first whose
/// cumulative stake meets or exceeds `draw`, for `draw` in
/// `[0, total_active_stake)`.
pub fn pick_by_draw(validators: &[Validator], draw: u64) -> Option<&Validator> {
    let mut cumulative: u64 = 0;
    for validator in validators.iter().filter(|v| v.active) {
        cumulative = cumulative.saturating_add(validator.stake);
        if draw <= cumulative {
            return Some(validator);
        }
    }
    None
}

impl<R: Rng + Send + Sync> ProposerSelection for StakeWeightedSelection<R> {
    fn select<'a>(&mut self, validators: &'a [Validator]) -> Option<&'a Validator> {
        let total: u64 = validators
            .iter()
            .filter(|v| v.active)
            .fold(0u64, |acc, v| acc.saturating_add(v.stake));
        if total == 0 {
            return None;
        }
        let draw = self.rng.gen_range(0..total);
        pick_by_draw(validators, draw)
    }

    fn name(&self) -> &'static str {
        "stake-weighted"
    }
}

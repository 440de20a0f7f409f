//! Consensus configuration.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which proposer-selection strategy the registry uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Deterministic maximum coherence score.
    #[default]
    Coherence,
    /// Randomised stake-weighted draw.
    StakeWeighted,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coherence" => Ok(Self::Coherence),
            "stake-weighted" | "stake_weighted" => Ok(Self::StakeWeighted),
            other => Err(format!("unknown selection policy: {other}")),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coherence => f.write_str("coherence"),
            Self::StakeWeighted => f.write_str("stake-weighted"),
        }
    }
}

/// Consensus configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub selection_policy: SelectionPolicy,
    /// Seed for the stake-weighted draw; entropy when unset.
    pub rng_seed: Option<u64>,
}

//! Ledger configuration.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Nonce attempts allowed per mining call: 16^6, the expected search length
/// at difficulty 6.
pub const DEFAULT_MAX_MINING_ITERATIONS: u64 = 16_777_216;

/// How `add_transaction` treats the per-sender nonce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoncePolicy {
    /// Nonce must equal settled plus pending transactions from the sender.
    #[default]
    Strict,
    /// Nonce is carried but never checked. Offers no replay protection.
    Unchecked,
}

impl FromStr for NoncePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "unchecked" => Ok(Self::Unchecked),
            other => Err(format!("unknown nonce policy: {other}")),
        }
    }
}

impl fmt::Display for NoncePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Unchecked => f.write_str("unchecked"),
        }
    }
}

/// Runtime configuration for the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub nonce_policy: NoncePolicy,
    /// Cap on the nonce search; `None` searches until found.
    pub max_mining_iterations: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            nonce_policy: NoncePolicy::Strict,
            max_mining_iterations: Some(DEFAULT_MAX_MINING_ITERATIONS),
        }
    }
}

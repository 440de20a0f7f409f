//! # pc-03-consensus
//!
//! Validator registry and stake-based consensus for Phi-Chain.
//!
//! ## Validator lifecycle
//!
//! ```text
//! Unregistered ──register──→ Active ──slash (stake < F(20))──→ Inactive
//! ```
//!
//! Inactive is terminal; validators are never removed.
//!
//! ## Proposer selection
//!
//! Selection is a strategy behind [`ProposerSelection`]:
//!
//! - [`CoherenceSelection`] (default): deterministic maximum of
//!   `stake_share * participation_share`, falling back to stake alone before
//!   any vote has been recorded.
//! - [`StakeWeightedSelection`]: stake-weighted draw from an injected RNG.
//!
//! ## Thresholds
//!
//! - Finality: `signature_count >= F(15) = 610`
//! - Supermajority: `votes >= 2 * active / 3 + 1`

pub mod config;
pub mod domain;

pub use config::{ConsensusConfig, SelectionPolicy};
pub use domain::{
    CoherenceSelection, NetworkStats, ProposerSelection, RegistrationError, StakeWeightedSelection,
    Validator, ValidatorError, ValidatorId, ValidatorInfo, ValidatorRegistry, ValidatorStatus,
};

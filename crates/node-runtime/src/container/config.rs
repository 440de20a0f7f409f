//! # Node Configuration
//!
//! Unified configuration for the ledger, consensus, executor and block
//! production loop.
//!
//! Every value has a default; `load_config` overrides from `PC_*` environment
//! variables. Malformed values are logged and ignored.

use pc_01_fibonacci::ProtocolParams;
use pc_02_ledger::{LedgerConfig, NoncePolicy, MAX_DIFFICULTY};
use pc_03_consensus::{ConsensusConfig, SelectionPolicy};
use pc_04_executor::ExecutorConfig;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub ledger: LedgerConfig,
    pub consensus: ConsensusConfig,
    pub executor: ExecutorConfig,
    pub mining: MiningConfig,
    /// Signature check applied by `submit_transaction`.
    pub signature_scheme: SignatureScheme,
    /// Validators registered at startup.
    pub validators: Vec<GenesisValidator>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            consensus: ConsensusConfig::default(),
            executor: ExecutorConfig::default(),
            mining: MiningConfig::default(),
            signature_scheme: SignatureScheme::default(),
            validators: vec![
                GenesisValidator::new("validator-1", 6_765),
                GenesisValidator::new("validator-2", 10_946),
                GenesisValidator::new("validator-3", 17_711),
            ],
        }
    }
}

impl NodeConfig {
    /// Rejects configurations no node can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mining.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyOutOfRange {
                difficulty: self.mining.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        if self.ledger.max_mining_iterations == Some(0) {
            return Err(ConfigError::ZeroMiningBudget);
        }
        if self.mining.slot_interval_secs == Some(0) {
            return Err(ConfigError::ZeroSlotInterval);
        }
        Ok(())
    }

    /// Applies `PC_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(difficulty) = parse_var(&lookup, "PC_MINING_DIFFICULTY") {
            self.mining.difficulty = difficulty;
        }
        if let Some(raw) = lookup("PC_MAX_MINING_ITERATIONS") {
            match raw.trim() {
                "unbounded" | "none" => self.ledger.max_mining_iterations = None,
                value => match value.parse() {
                    Ok(n) => self.ledger.max_mining_iterations = Some(n),
                    Err(_) => warn!(
                        value = %raw,
                        "PC_MAX_MINING_ITERATIONS must be a number or 'unbounded'"
                    ),
                },
            }
        }
        if let Some(policy) = parse_var::<NoncePolicy, _>(&lookup, "PC_NONCE_POLICY") {
            self.ledger.nonce_policy = policy;
        }
        if let Some(policy) = parse_var::<SelectionPolicy, _>(&lookup, "PC_SELECTION_POLICY") {
            self.consensus.selection_policy = policy;
        }
        if let Some(seed) = parse_var(&lookup, "PC_RNG_SEED") {
            self.consensus.rng_seed = Some(seed);
        }
        if let Some(threshold) = parse_var(&lookup, "PC_PARALLEL_THRESHOLD") {
            self.executor.parallel_threshold = threshold;
        }
        if let Some(secs) = parse_var(&lookup, "PC_SLOT_INTERVAL_SECS") {
            self.mining.slot_interval_secs = Some(secs);
        }
        if let Some(scheme) = parse_var(&lookup, "PC_SIGNATURE_SCHEME") {
            self.signature_scheme = scheme;
        }
        if let Some(raw) = lookup("PC_VALIDATORS") {
            match parse_validators(&raw) {
                Some(validators) => self.validators = validators,
                None => warn!(value = %raw, "PC_VALIDATORS must look like 'id:stake,id:stake'"),
            }
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "Ignoring malformed environment override");
            None
        }
    }
}

fn parse_validators(raw: &str) -> Option<Vec<GenesisValidator>> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let (id, stake) = entry.trim().split_once(':')?;
            Some(GenesisValidator::new(id, stake.parse().ok()?))
        })
        .collect()
}

/// Load configuration from defaults and the process environment.
pub fn load_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.apply_env(|name| std::env::var(name).ok());
    info!(
        difficulty = config.mining.difficulty,
        nonce_policy = %config.ledger.nonce_policy,
        selection = %config.consensus.selection_policy,
        validators = config.validators.len(),
        "Configuration loaded"
    );
    config
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Mining difficulty {difficulty} exceeds {max} hex digits")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },

    #[error("Mining iteration budget must be positive")]
    ZeroMiningBudget,

    #[error("Slot interval must be positive")]
    ZeroSlotInterval,
}

/// Block production settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Leading zero hex digits required of block hashes.
    pub difficulty: u32,
    /// Seconds between production attempts; the protocol slot when unset.
    pub slot_interval_secs: Option<u64>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            slot_interval_secs: None,
        }
    }
}

impl MiningConfig {
    pub fn slot_interval(&self, params: &ProtocolParams) -> Duration {
        Duration::from_secs(self.slot_interval_secs.unwrap_or(params.slot_duration))
    }
}

/// How submitted transactions are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// Every signature accepted. Development only.
    #[default]
    Unchecked,
    /// Ed25519 over the signing bytes; senders are hex public keys.
    Ed25519,
}

impl FromStr for SignatureScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unchecked" => Ok(Self::Unchecked),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(format!("unknown signature scheme: {other}")),
        }
    }
}

/// A validator registered when the node starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisValidator {
    pub id: String,
    pub stake: u64,
}

impl GenesisValidator {
    pub fn new(id: impl Into<String>, stake: u64) -> Self {
        Self {
            id: id.into(),
            stake,
        }
    }
}

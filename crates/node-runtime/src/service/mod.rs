//! # Chain Service
//!
//! One `ChainService` per process owns every piece of mutable core state.
//! Consumers share it behind an `Arc`.
//!
//! ## Locking
//!
//! Each component sits behind its own `parking_lot::RwLock`. Operations that
//! touch several take them in the fixed order chain → registry → finalized
//! set → world state, so writers serialise and readers see consistent
//! snapshots.

use crate::container::{NodeConfig, SignatureScheme};
use parking_lot::RwLock;
use pc_02_ledger::{Chain, ChainIntegrityError, MiningError, ValidationError};
use pc_03_consensus::{
    NetworkStats, RegistrationError, ValidatorError, ValidatorId, ValidatorInfo, ValidatorRegistry,
};
use pc_04_executor::{execute_sequential, ExecutionOutcome, OptimisticExecutor, TransferProcessor};
use shared_crypto::{Ed25519Verifier, SignatureVerifier, UncheckedSignatures};
use shared_types::{Block, BlockSummary, ChainSummary, ExecutionState, Transaction, TxHash};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from multi-component service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No active validator available to propose")]
    NoProposer,

    #[error("Block {0} not found")]
    UnknownBlock(u64),

    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

impl ServiceError {
    /// Retrying on a later slot may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoProposer => true,
            Self::Mining(e) => e.is_retryable(),
            Self::UnknownBlock(_) | Self::Validator(_) => false,
        }
    }
}

pub struct ChainService {
    chain: RwLock<Chain>,
    registry: RwLock<ValidatorRegistry>,
    /// Indices of blocks already credited as finalized.
    finalized: RwLock<BTreeSet<u64>>,
    world_state: RwLock<ExecutionState>,
    executor: OptimisticExecutor,
    verifier: Arc<dyn SignatureVerifier>,
}

impl ChainService {
    /// Builds the service from configuration. Validators listed in the
    /// configuration are not registered here; see [`register_validator`].
    ///
    /// [`register_validator`]: ChainService::register_validator
    pub fn new(config: &NodeConfig) -> Self {
        let verifier: Arc<dyn SignatureVerifier> = match config.signature_scheme {
            SignatureScheme::Unchecked => {
                warn!("Signature verification disabled; accepting every signature");
                Arc::new(UncheckedSignatures)
            }
            SignatureScheme::Ed25519 => Arc::new(Ed25519Verifier),
        };
        let chain = Chain::new(config.ledger.clone());
        let registry = ValidatorRegistry::from_config(chain.params().clone(), &config.consensus);
        let executor = OptimisticExecutor::new(config.executor.clone());
        Self::with_components(chain, registry, executor, verifier)
    }

    /// Assembles a service from prebuilt components.
    pub fn with_components(
        chain: Chain,
        registry: ValidatorRegistry,
        executor: OptimisticExecutor,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        let settled: Vec<Transaction> = chain
            .blocks()
            .iter()
            .flat_map(|b| b.transactions.iter().cloned())
            .collect();
        let world_state = execute_sequential(&TransferProcessor, &settled, &ExecutionState::new());

        Self {
            chain: RwLock::new(chain),
            registry: RwLock::new(registry),
            finalized: RwLock::new(BTreeSet::new()),
            world_state: RwLock::new(world_state),
            executor,
            verifier,
        }
    }

    // -------------------------------------------------------------------------
    // Ledger
    // -------------------------------------------------------------------------

    /// Verifies the signature, then validates and queues the transaction.
    pub fn submit_transaction(&self, tx: Transaction) -> Result<TxHash, ValidationError> {
        self.verifier
            .verify(&tx.signing_bytes(), &tx.signature, &tx.sender)
            .map_err(|e| {
                warn!(sender = %tx.sender, error = %e, "Signature rejected");
                ValidationError::InvalidSignature(e.to_string())
            })?;
        self.chain.write().add_transaction(tx)
    }

    /// Mines the pending pool with an explicit proposer.
    pub fn mine_block(
        &self,
        proposer_id: &str,
        difficulty: u32,
    ) -> Result<BlockSummary, MiningError> {
        let mut chain = self.chain.write();
        let mut registry = self.registry.write();
        self.seal_pending(&mut chain, &mut registry, proposer_id, difficulty)
            .map(|block| block.summary())
    }

    /// Selects a proposer under the registry's policy and mines the pool.
    pub fn produce_block(&self, difficulty: u32) -> Result<BlockSummary, ServiceError> {
        let mut chain = self.chain.write();
        if chain.pending_count() == 0 {
            return Err(MiningError::EmptyPool.into());
        }
        let mut registry = self.registry.write();
        let proposer = registry.select_proposer().ok_or(ServiceError::NoProposer)?;
        let block = self.seal_pending(&mut chain, &mut registry, &proposer, difficulty)?;
        Ok(block.summary())
    }

    /// Executes the pool against world state, mines it, then credits the
    /// proposer and advances world state. Nothing changes on error.
    fn seal_pending(
        &self,
        chain: &mut Chain,
        registry: &mut ValidatorRegistry,
        proposer_id: &str,
        difficulty: u32,
    ) -> Result<Block, MiningError> {
        if chain.pending_count() == 0 {
            return Err(MiningError::EmptyPool);
        }

        let mut world_state = self.world_state.write();
        let outcome = self
            .executor
            .execute_batch(chain.pending_transactions(), &world_state);

        let block = chain.mine_pending_transactions(proposer_id, difficulty)?;

        debug!(
            index = block.index,
            reexecuted = outcome.reexecuted.len(),
            "Block state computed"
        );
        *world_state = outcome.final_state;

        if registry.contains(proposer_id) {
            if let Err(e) = registry.record_proposal(proposer_id) {
                warn!(proposer = %proposer_id, error = %e, "Proposal not recorded");
            }
            let reward = registry.block_reward_for(block.transactions.len());
            if let Err(e) = registry.credit_reward(proposer_id, reward) {
                warn!(proposer = %proposer_id, error = %e, "Reward not credited");
            }
        }

        info!(
            index = block.index,
            hash = %block.hash_hex(),
            proposer = %proposer_id,
            txs = block.transactions.len(),
            "Block produced"
        );
        Ok(block)
    }

    /// Appends an externally mined block. The pool is left untouched.
    pub fn import_block(&self, block: Block) -> Result<(), ChainIntegrityError> {
        let mut chain = self.chain.write();
        let mut world_state = self.world_state.write();
        let next = execute_sequential(&TransferProcessor, &block.transactions, &world_state);
        chain.add_block(block)?;
        *world_state = next;
        Ok(())
    }

    /// Settled balance of `address`. Scans the whole chain.
    pub fn get_balance(&self, address: &str) -> i128 {
        self.chain.read().get_balance(address)
    }

    pub fn get_chain_summary(&self) -> ChainSummary {
        self.chain.read().summary()
    }

    pub fn pending_count(&self) -> usize {
        self.chain.read().pending_count()
    }

    pub fn next_nonce(&self, address: &str) -> u64 {
        self.chain.read().next_nonce(address)
    }

    pub fn latest_block(&self) -> Block {
        self.chain.read().latest_block().clone()
    }

    pub fn block_at(&self, index: u64) -> Option<Block> {
        self.chain.read().block_at(index).cloned()
    }

    pub fn chain_json(&self) -> serde_json::Result<String> {
        self.chain.read().to_json()
    }

    // -------------------------------------------------------------------------
    // Consensus
    // -------------------------------------------------------------------------

    pub fn register_validator(&self, id: &str, stake: u64) -> Result<(), RegistrationError> {
        self.registry.write().register(id, stake)
    }

    pub fn select_proposer(&self) -> Option<ValidatorId> {
        self.registry.write().select_proposer()
    }

    pub fn check_finality(&self, signature_count: u64) -> bool {
        self.registry.read().check_finality(signature_count)
    }

    pub fn check_supermajority(&self, votes: usize) -> bool {
        self.registry.read().check_supermajority(votes)
    }

    pub fn record_vote(&self, validator_id: &str) -> Result<(), ValidatorError> {
        self.registry.write().record_vote(validator_id)
    }

    pub fn slash_validator(&self, validator_id: &str, amount: u64) -> Result<(), ValidatorError> {
        self.registry.write().slash(validator_id, amount)
    }

    /// Credits a finalization to the block's proposer once `signature_count`
    /// reaches the finality threshold. Returns whether the block is final.
    /// A block is credited at most once; later confirmations return `true`
    /// without touching the registry.
    pub fn confirm_block(&self, index: u64, signature_count: u64) -> Result<bool, ServiceError> {
        let chain = self.chain.read();
        let block = chain.block_at(index).ok_or(ServiceError::UnknownBlock(index))?;
        let mut registry = self.registry.write();
        let mut finalized = self.finalized.write();
        if finalized.contains(&index) {
            debug!(index, "Block already finalized");
            return Ok(true);
        }
        if !registry.check_finality(signature_count) {
            return Ok(false);
        }
        if registry.contains(&block.proposer_id) {
            registry.record_finalization(&block.proposer_id)?;
        }
        finalized.insert(index);
        info!(index, signature_count, "Block finalized");
        Ok(true)
    }

    pub fn is_finalized(&self, index: u64) -> bool {
        self.finalized.read().contains(&index)
    }

    pub fn validator_info(&self, validator_id: &str) -> Option<ValidatorInfo> {
        self.registry.read().validator_info(validator_id)
    }

    pub fn network_stats(&self) -> NetworkStats {
        self.registry.read().network_stats()
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Runs a batch against a caller-provided state. World state is not
    /// touched.
    pub fn execute_batch(
        &self,
        transactions: &[Transaction],
        base_state: &ExecutionState,
    ) -> (ExecutionState, Vec<usize>) {
        self.execute_batch_detailed(transactions, base_state).into_parts()
    }

    pub fn execute_batch_detailed(
        &self,
        transactions: &[Transaction],
        base_state: &ExecutionState,
    ) -> ExecutionOutcome {
        self.executor.execute_batch(transactions, base_state)
    }

    /// Copy of the state produced by every mined block so far.
    ///
    /// World state applies only the keys a transaction declares in its write
    /// set, while [`get_balance`] credits every recipient. Submitted
    /// transfers must cover sender and recipient, so the two agree for
    /// locally mined blocks. An imported block carrying a narrower write set
    /// makes them diverge on the undeclared keys.
    ///
    /// [`get_balance`]: ChainService::get_balance
    pub fn world_state(&self) -> ExecutionState {
        self.world_state.read().clone()
    }
}

//! Chain state management
//!
//! Owns the block sequence, the pending pool and the Fibonacci pair the next
//! block is built on.

use crate::config::{LedgerConfig, NoncePolicy};
use crate::domain::genesis::{create_genesis_block, CHAIN_NAME, SYSTEM_IDENTITY};
use crate::domain::mining::BlockMining;
use crate::error::{ChainIntegrityError, MiningError, ValidationError};
use crate::ports::{SystemTimeSource, TimeSource};
use pc_01_fibonacci::{FibState, ProtocolParams};
use serde::Serialize;
use shared_types::{Block, ChainSummary, Transaction, TxHash};
use tracing::{debug, info, warn};

/// Append-only ledger with a FIFO pending pool.
pub struct Chain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
    /// Pair recorded by the next appended block.
    fib_state: FibState,
    params: ProtocolParams,
    config: LedgerConfig,
    clock: Box<dyn TimeSource>,
}

#[derive(Serialize)]
struct ChainExport<'a> {
    chain_name: &'a str,
    length: usize,
    blocks: &'a [Block],
    pending: &'a [Transaction],
}

impl Chain {
    /// Create a chain holding only the genesis block, stamped by the system clock.
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_time_source(config, Box::new(SystemTimeSource))
    }

    pub fn with_time_source(config: LedgerConfig, clock: Box<dyn TimeSource>) -> Self {
        let params = ProtocolParams::get().clone();
        let genesis = create_genesis_block(&params);
        info!(
            hash = %genesis.hash_hex(),
            supply = params.genesis_supply,
            "Genesis block created"
        );
        Self {
            fib_state: genesis.fib_vector.evolve(),
            blocks: vec![genesis],
            pending: Vec::new(),
            params,
            config,
            clock,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_at(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// Number of blocks including genesis.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: genesis is present from construction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Current tip.
    pub fn latest_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn fib_state(&self) -> FibState {
        self.fib_state
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Settled balance: incoming minus outgoing over every block.
    ///
    /// Linear scan over all transactions on every call; there is no index.
    /// Only the genesis block mints: its allocation credits without debiting.
    /// A genesis-style payload anywhere else is an ordinary transfer.
    pub fn get_balance(&self, address: &str) -> i128 {
        let mut balance: i128 = 0;
        for (block, tx) in self.settled() {
            if tx.recipient == address {
                balance += i128::from(tx.value);
            }
            if tx.sender == address && !is_mint(block, tx) {
                balance -= i128::from(tx.value);
            }
        }
        balance
    }

    /// Sequence number the sender's next transaction must carry.
    pub fn next_nonce(&self, address: &str) -> u64 {
        let settled = self
            .settled()
            .filter(|(block, tx)| tx.sender == address && !is_mint(block, tx))
            .count();
        let pending = self.pending.iter().filter(|tx| tx.sender == address).count();
        (settled + pending) as u64
    }

    fn settled(&self) -> impl Iterator<Item = (&Block, &Transaction)> {
        self.blocks
            .iter()
            .flat_map(|block| block.transactions.iter().map(move |tx| (block, tx)))
    }

    /// Re-verifies hash, linkage and index from block 1 onward. Stops at the
    /// first violation.
    pub fn is_chain_valid(&self) -> bool {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let expected_index = (i + 1) as u64;
            if current.previous_hash != previous.hash
                || !current.is_sealed()
                || current.index != expected_index
            {
                warn!(index = current.index, "Chain validation failed");
                return false;
            }
        }
        true
    }

    pub fn summary(&self) -> ChainSummary {
        let tip = self.latest_block();
        ChainSummary {
            length: self.blocks.len(),
            is_valid: self.is_chain_valid(),
            latest_hash: tip.hash_hex(),
            latest_index: tip.index,
            pending_count: self.pending.len(),
        }
    }

    /// JSON rendering of blocks and pool for API layers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ChainExport {
            chain_name: CHAIN_NAME,
            length: self.blocks.len(),
            blocks: &self.blocks,
            pending: &self.pending,
        })
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Appends `block` if it extends the tip. On error nothing changes.
    pub fn add_block(&mut self, block: Block) -> Result<(), ChainIntegrityError> {
        self.check_append(&block).inspect_err(|e| {
            warn!(index = block.index, error = %e, "Block rejected");
        })?;

        info!(
            index = block.index,
            hash = %block.hash_hex(),
            proposer = %block.proposer_id,
            txs = block.transactions.len(),
            "Block appended"
        );
        self.fib_state = self.fib_state.evolve();
        self.blocks.push(block);
        Ok(())
    }

    fn check_append(&self, block: &Block) -> Result<(), ChainIntegrityError> {
        let tip = self.latest_block();
        if block.previous_hash != tip.hash {
            return Err(ChainIntegrityError::PreviousHashMismatch {
                expected: tip.hash_hex(),
                actual: hex::encode(block.previous_hash),
            });
        }

        let computed = block.calculate_hash();
        if computed != block.hash {
            return Err(ChainIntegrityError::HashMismatch {
                index: block.index,
                stored: block.hash_hex(),
                computed: hex::encode(computed),
            });
        }

        let expected = self.blocks.len() as u64;
        if block.index != expected {
            return Err(ChainIntegrityError::IndexMismatch {
                expected,
                actual: block.index,
            });
        }

        Ok(())
    }

    /// Checks `tx` against settled state and the nonce policy.
    pub fn validate_transaction(&self, tx: &Transaction) -> Result<(), ValidationError> {
        if tx.sender.is_empty() || tx.recipient.is_empty() {
            return Err(ValidationError::MalformedTransaction(
                "sender and recipient must be non-empty".into(),
            ));
        }
        if tx.is_genesis_allocation() || tx.sender == SYSTEM_IDENTITY {
            return Err(ValidationError::MalformedTransaction(
                "genesis allocations cannot be submitted".into(),
            ));
        }
        if !tx.write_set.contains(&tx.sender) || !tx.write_set.contains(&tx.recipient) {
            return Err(ValidationError::MalformedTransaction(
                "write set must cover sender and recipient".into(),
            ));
        }

        let balance = self.get_balance(&tx.sender);
        if balance < i128::from(tx.value) {
            return Err(ValidationError::InsufficientBalance {
                address: tx.sender.clone(),
                balance,
                required: tx.value,
            });
        }

        if self.config.nonce_policy == NoncePolicy::Strict {
            let expected = self.next_nonce(&tx.sender);
            if tx.nonce != expected {
                return Err(ValidationError::NonceMismatch {
                    address: tx.sender.clone(),
                    expected,
                    actual: tx.nonce,
                });
            }
        }

        Ok(())
    }

    /// Validates and queues `tx`. Rejected transactions leave the pool as is.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<TxHash, ValidationError> {
        if let Err(e) = self.validate_transaction(&tx) {
            warn!(sender = %tx.sender, error = %e, "Transaction rejected");
            return Err(e);
        }

        let hash = tx.calculate_hash();
        debug!(
            tx_hash = %hex::encode(hash),
            sender = %tx.sender,
            recipient = %tx.recipient,
            value = tx.value,
            "Transaction queued"
        );
        self.pending.push(tx);
        Ok(hash)
    }

    /// Mines every pending transaction into one block and appends it.
    ///
    /// The pool is cleared only after the append succeeds.
    pub fn mine_pending_transactions(
        &mut self,
        proposer_id: &str,
        difficulty: u32,
    ) -> Result<Block, MiningError> {
        if self.pending.is_empty() {
            return Err(MiningError::EmptyPool);
        }

        let tip = self.latest_block();
        let timestamp = self.clock.now().max(tip.timestamp);
        let mut block = Block::new(
            tip.index + 1,
            timestamp,
            tip.hash,
            proposer_id,
            self.pending.clone(),
            self.fib_state,
        );

        let budget = self.config.max_mining_iterations.unwrap_or(u64::MAX);
        let attempts = block.mine_bounded(difficulty, budget).inspect_err(|e| {
            warn!(index = block.index, difficulty, error = %e, "Mining failed");
        })?;
        debug!(index = block.index, attempts, "Nonce found");

        self.add_block(block.clone())?;
        self.pending.clear();
        Ok(block)
    }
}

fn is_mint(block: &Block, tx: &Transaction) -> bool {
    block.index == 0 && tx.is_genesis_allocation()
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("length", &self.blocks.len())
            .field("pending", &self.pending.len())
            .field("fib_state", &self.fib_state)
            .field("config", &self.config)
            .finish()
    }
}

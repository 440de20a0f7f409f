//! # pc-02-ledger
//!
//! The Phi-Chain ledger: an append-only sequence of hash-linked blocks plus a
//! FIFO pool of pending transactions.
//!
//! ## Invariants
//!
//! - `blocks[i].previous_hash == blocks[i - 1].hash` for every `i > 0`
//! - `blocks[i].hash` is the recomputed hash of its own fields
//! - `blocks[i].index == i`
//! - A mutation either fully succeeds or leaves chain and pool untouched
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pc_02_ledger::{Chain, LedgerConfig};
//! use shared_types::Transaction;
//!
//! let mut chain = Chain::new(LedgerConfig::default());
//! chain.add_transaction(Transaction::transfer(GENESIS_TREASURY, "alice", 500, 0))?;
//! let block = chain.mine_pending_transactions("validator-1", 2)?;
//! assert!(block.hash_hex().starts_with("00"));
//! ```
//!
//! ## Concurrency
//!
//! `Chain` is single-writer. Callers serialise mutation (the node runtime
//! wraps it in a `parking_lot::RwLock`).

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use config::{LedgerConfig, NoncePolicy, DEFAULT_MAX_MINING_ITERATIONS};
pub use domain::chain::Chain;
pub use domain::genesis::{create_genesis_block, CHAIN_NAME, GENESIS_TREASURY, SYSTEM_IDENTITY};
pub use domain::mining::{BlockMining, MAX_DIFFICULTY};
pub use error::{ChainIntegrityError, MiningError, ValidationError};
pub use ports::{ManualTimeSource, SystemTimeSource, TimeSource};

//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Transactions**: `Transaction`, `TxPayload`, `GenesisManifest`
//! - **Blocks**: `Block`, `BlockSummary`
//! - **Chain views**: `ChainSummary`

use pc_01_fibonacci::{FibState, ProtocolParams};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_crypto::{leading_zero_nibbles, sha256, Hash, Sha256Hasher};
use std::collections::BTreeSet;

/// Hash identifying a transaction.
pub type TxHash = Hash;

/// Hash of the block preceding genesis.
pub const ZERO_HASH: Hash = [0u8; 32];

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Protocol constants embedded in the genesis allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisManifest {
    /// Human-readable network name.
    pub chain_name: String,
    /// Constants the network was started with.
    pub params: ProtocolParams,
}

/// Typed transaction payload.
///
/// Known payload kinds are modelled explicitly; anything else travels as
/// opaque bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum TxPayload {
    /// Plain value transfer.
    #[default]
    Empty,
    /// Genesis allocation.
    Genesis(GenesisManifest),
    /// Call into a named contract method. Not executed by the core.
    ContractCall {
        /// Method name.
        method: String,
        /// Positional arguments.
        args: Vec<String>,
    },
    /// Free-form note.
    Memo(String),
    /// Uninterpreted bytes.
    Opaque(#[serde(with = "hex")] Vec<u8>),
}

/// Immutable transaction.
///
/// `read_set`/`write_set` are the state keys the transaction declares it
/// touches; the executor trusts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender identity.
    pub sender: String,
    /// Recipient identity.
    pub recipient: String,
    /// Amount transferred.
    pub value: u64,
    /// Sender sequence number.
    pub nonce: u64,
    /// Payload.
    #[serde(default)]
    pub payload: TxPayload,
    /// Declared read keys.
    #[serde(default)]
    pub read_set: BTreeSet<String>,
    /// Declared write keys.
    #[serde(default)]
    pub write_set: BTreeSet<String>,
    /// Signature over [`Transaction::signing_bytes`].
    #[serde(default, with = "hex")]
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Value transfer declaring sender and recipient balances as both read
    /// and written.
    pub fn transfer(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        value: u64,
        nonce: u64,
    ) -> Self {
        let sender = sender.into();
        let recipient = recipient.into();
        let keys: BTreeSet<String> = [sender.clone(), recipient.clone()].into_iter().collect();
        Self {
            sender,
            recipient,
            value,
            nonce,
            payload: TxPayload::Empty,
            read_set: keys.clone(),
            write_set: keys,
            signature: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: TxPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Replaces the declared access sets.
    #[must_use]
    pub fn with_access<R, W>(mut self, read_set: R, write_set: W) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        self.read_set = read_set.into_iter().map(Into::into).collect();
        self.write_set = write_set.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    fn canonical_value(&self, include_signature: bool) -> serde_json::Value {
        let signature = if include_signature {
            hex::encode(&self.signature)
        } else {
            String::new()
        };
        json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "value": self.value,
            "nonce": self.nonce,
            "payload": self.payload,
            "read_set": self.read_set,
            "write_set": self.write_set,
            "signature": signature,
        })
    }

    /// Sorted-key JSON rendering of every field, bytes as hex.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        self.canonical_value(true).to_string().into_bytes()
    }

    /// Canonical bytes with the signature emptied; what signers sign.
    pub fn signing_bytes(&self) -> Vec<u8> {
        self.canonical_value(false).to_string().into_bytes()
    }

    /// SHA-256 of the canonical bytes.
    pub fn calculate_hash(&self) -> TxHash {
        sha256(&self.to_canonical_bytes())
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.calculate_hash())
    }

    pub fn is_genesis_allocation(&self) -> bool {
        matches!(self.payload, TxPayload::Genesis(_))
    }
}

// =============================================================================
// BLOCKS
// =============================================================================

/// A block. Immutable once sealed; only mining touches `nonce` and `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Height; parent index + 1.
    pub index: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// Sealed hash of the parent.
    #[serde(with = "hex")]
    pub previous_hash: Hash,
    /// Validator that assembled the block.
    pub proposer_id: String,
    /// Ordered transactions.
    pub transactions: Vec<Transaction>,
    /// Fibonacci pair the block was built on.
    pub fib_vector: FibState,
    /// Proof-of-work nonce.
    pub nonce: u64,
    /// Hash over every other field.
    #[serde(with = "hex")]
    pub hash: Hash,
}

impl Block {
    /// Builds a block and seals it with nonce 0.
    pub fn new(
        index: u64,
        timestamp: u64,
        previous_hash: Hash,
        proposer_id: impl Into<String>,
        transactions: Vec<Transaction>,
        fib_vector: FibState,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            previous_hash,
            proposer_id: proposer_id.into(),
            transactions,
            fib_vector,
            nonce: 0,
            hash: ZERO_HASH,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// SHA-256 over the ordered transaction hashes.
    pub fn transactions_root(&self) -> Hash {
        let mut hasher = Sha256Hasher::new();
        for tx in &self.transactions {
            hasher.update(tx.calculate_hash());
        }
        hasher.finalize()
    }

    /// Recomputes the hash from every field except `hash`.
    pub fn calculate_hash(&self) -> Hash {
        self.hash_with_root(&self.transactions_root())
    }

    /// Hash for a given transactions root, letting mining loops skip
    /// re-hashing the transactions on every nonce.
    pub fn hash_with_root(&self, transactions_root: &Hash) -> Hash {
        let header = json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "previous_hash": hex::encode(self.previous_hash),
            "proposer_id": self.proposer_id,
            "transactions_root": hex::encode(transactions_root),
            "tx_count": self.transactions.len(),
            "fib_vector": [self.fib_vector.f_next, self.fib_vector.f_current],
            "nonce": self.nonce,
        });
        sha256(header.to_string().as_bytes())
    }

    /// Stored hash equals the recomputed one.
    pub fn is_sealed(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    /// Stored hash starts with `difficulty` zero hex digits.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        leading_zero_nibbles(&self.hash) >= difficulty
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            index: self.index,
            hash: self.hash_hex(),
            previous_hash: hex::encode(self.previous_hash),
            proposer_id: self.proposer_id.clone(),
            timestamp: self.timestamp,
            nonce: self.nonce,
            tx_count: self.transactions.len(),
        }
    }
}

/// Lightweight view of a mined block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub proposer_id: String,
    pub timestamp: u64,
    pub nonce: u64,
    pub tx_count: usize,
}

// =============================================================================
// CHAIN VIEWS
// =============================================================================

/// Snapshot of ledger health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSummary {
    /// Number of blocks including genesis.
    pub length: usize,
    pub is_valid: bool,
    pub latest_hash: String,
    pub latest_index: u64,
    pub pending_count: usize,
}

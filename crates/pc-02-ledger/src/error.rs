//! Error types for the ledger.

use thiserror::Error;

/// A transaction was refused by the pending pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Structurally unusable transaction.
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// Sender's settled balance does not cover the value.
    #[error("Insufficient balance for {address}: has {balance}, needs {required}")]
    InsufficientBalance {
        address: String,
        balance: i128,
        required: u64,
    },

    /// Nonce is not the sender's next sequence number.
    #[error("Nonce mismatch for address {address}: expected {expected}, got {actual}")]
    NonceMismatch {
        address: String,
        expected: u64,
        actual: u64,
    },

    /// The injected verifier rejected the signature.
    #[error("Invalid transaction signature: {0}")]
    InvalidSignature(String),
}

impl ValidationError {
    /// The same transaction may succeed later without modification.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true,
            Self::NonceMismatch {
                expected, actual, ..
            } => actual > expected,
            Self::MalformedTransaction(_) | Self::InvalidSignature(_) => false,
        }
    }
}

/// A block could not be appended. The chain is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainIntegrityError {
    #[error("Previous hash mismatch: tip is {expected}, block links to {actual}")]
    PreviousHashMismatch { expected: String, actual: String },

    #[error("Hash mismatch at index {index}: stored {stored}, computed {computed}")]
    HashMismatch {
        index: u64,
        stored: String,
        computed: String,
    },

    #[error("Index mismatch: expected {expected}, got {actual}")]
    IndexMismatch { expected: u64, actual: u64 },
}

/// Mining did not produce a block. Chain and pool are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    /// Nothing pending.
    #[error("Nothing to mine: pending pool is empty")]
    EmptyPool,

    /// Target needs more zero digits than a hash has.
    #[error("Difficulty {difficulty} out of range (max {max})")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },

    /// Nonce search cap hit before a hash met the target.
    #[error("No valid nonce found after {attempts} attempts")]
    IterationLimitReached { attempts: u64 },

    /// Mined block was refused on append.
    #[error("Chain integrity: {0}")]
    Integrity(#[from] ChainIntegrityError),
}

impl MiningError {
    /// Retrying later (or with more budget) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmptyPool | Self::IterationLimitReached { .. })
    }
}

//! Consensus error types.

use thiserror::Error;

/// Registration refused. The caller corrects its input and retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Stake {stake} is not a Fibonacci number")]
    NotFibonacci { stake: u64 },

    #[error("Stake {stake} below minimum {minimum}")]
    BelowMinimum { stake: u64, minimum: u64 },

    #[error("Validator already registered: {0}")]
    DuplicateId(String),

    #[error("Validator registry full ({capacity} validators)")]
    RegistryFull { capacity: u64 },
}

/// Operation on an existing validator failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    #[error("Cannot slash {amount} from {id}: stake is {stake}")]
    InsufficientStake { id: String, stake: u64, amount: u64 },

    #[error("Validator is inactive: {0}")]
    Inactive(String),
}

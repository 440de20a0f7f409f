//! # Shared Crypto
//!
//! Cryptographic collaborators consumed by the Phi-Chain core.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Transaction and block content hashes |
//! | `signatures` | Ed25519 | Transaction signing / verification capability |
//!
//! The core never verifies signatures itself: it is handed a
//! [`SignatureVerifier`] so the implementation can be swapped without
//! touching ledger logic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{leading_zero_nibbles, sha256, sha256_hex, Hash, Sha256Hasher};
pub use signatures::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, Ed25519Verifier, SignatureVerifier,
    TransactionSigner, UncheckedSignatures,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

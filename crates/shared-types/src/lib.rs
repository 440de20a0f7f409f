//! # Shared Types Crate
//!
//! Entities exchanged between the Phi-Chain subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Transaction` and `Block` are defined once and
//!   carry their own content-hash rules.
//! - **Immutability**: entities are plain values. Nothing here touches ledger
//!   state; validation belongs to `pc-02-ledger`.
//! - **Canonical Hashing**: hashes are SHA-256 over a sorted-key JSON
//!   rendering with bytes as hex, so any implementation can reproduce them.

pub mod entities;
pub mod state;

pub use entities::*;
pub use state::*;

pub use shared_crypto::Hash;

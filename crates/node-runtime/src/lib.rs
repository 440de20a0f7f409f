//! # Node Runtime Library
//!
//! Exposes the node's building blocks for the `pc-node` binary and for tests.
//!
//! - `container/` - node configuration and environment overrides
//! - `service/` - [`ChainService`], the single owner of ledger, validator
//!   registry, world state and executor
//!
//! ## Data flow
//!
//! ```text
//! submit_transaction ──→ Chain pending pool
//!                              │
//! produce_block: select_proposer (registry)
//!                              │
//!                  execute_batch over pool (executor, world state)
//!                              │
//!                  mine + append (ledger) ──→ reward proposer, advance state
//! ```

pub mod container;
pub mod service;

pub use container::{load_config, ConfigError, NodeConfig};
pub use service::{ChainService, ServiceError};

//! # Phi-Chain Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── ledger_flows.rs     # Ledger + executor agreement, tamper detection
//!     ├── consensus_flows.rs  # Registry lifecycle across many blocks
//!     └── node_flows.rs       # ChainService end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::ledger_flows
//!
//! # Benchmarks
//! cargo bench -p pc-tests
//! ```

#![allow(dead_code)]

pub mod integration;

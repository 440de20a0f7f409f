//! # pc-01-fibonacci
//!
//! Integer Fibonacci arithmetic for Phi-Chain.
//!
//! Every protocol constant (slot length, epoch length, stake floor, finality
//! threshold, reward schedule) is a Fibonacci number `F(n)` for a fixed `n`.
//! This crate computes them once and exposes them read-only.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `sequence` | `fib`, `is_fibonacci`, Zeckendorf decomposition, golden ratio |
//! | `state` | `FibState`, the Q-matrix pair evolved once per block |
//! | `params` | `ProtocolParams` and the process-wide `PROTOCOL_PARAMS` snapshot |

pub mod params;
pub mod sequence;
pub mod state;

pub use params::{ProtocolParams, PROTOCOL_PARAMS};
pub use sequence::{fib, fibonacci_sequence, golden_ratio, is_fibonacci, zeckendorf};
pub use state::FibState;

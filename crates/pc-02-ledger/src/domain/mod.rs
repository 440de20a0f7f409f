//! Ledger domain: genesis, mining and the chain itself.

pub mod chain;
pub mod genesis;
pub mod mining;

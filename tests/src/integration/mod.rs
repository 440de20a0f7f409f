//! Cross-crate integration flows.

pub mod consensus_flows;
pub mod ledger_flows;
pub mod node_flows;

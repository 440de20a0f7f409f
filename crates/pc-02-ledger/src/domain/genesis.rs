//! Genesis Block Creation
//!
//! Genesis is fully determined by the protocol constants: fixed timestamp
//! `F(33)`, all-zero parent hash, the system proposer, and one allocation of
//! the genesis supply to the treasury. It is sealed but never mined.

use pc_01_fibonacci::{FibState, ProtocolParams};
use shared_types::{Block, GenesisManifest, Transaction, TxPayload, ZERO_HASH};

/// Proposer and allocation sender of the genesis block.
pub const SYSTEM_IDENTITY: &str = "phi-chain:system";

/// Recipient of the genesis supply.
pub const GENESIS_TREASURY: &str = "phi-chain:treasury";

/// Network name embedded in the genesis manifest.
pub const CHAIN_NAME: &str = "phi-chain";

/// Creates the genesis block from the protocol constants.
pub fn create_genesis_block(params: &ProtocolParams) -> Block {
    let manifest = GenesisManifest {
        chain_name: CHAIN_NAME.to_string(),
        params: params.clone(),
    };
    let allocation = Transaction::transfer(
        SYSTEM_IDENTITY,
        GENESIS_TREASURY,
        params.genesis_supply,
        0,
    )
    .with_access(Vec::<String>::new(), [GENESIS_TREASURY])
    .with_payload(TxPayload::Genesis(manifest));

    Block::new(
        0,
        params.genesis_timestamp,
        ZERO_HASH,
        SYSTEM_IDENTITY,
        vec![allocation],
        FibState::GENESIS,
    )
}

/// True if `block` is exactly the genesis for `params`.
pub fn is_valid_genesis(block: &Block, params: &ProtocolParams) -> bool {
    *block == create_genesis_block(params)
}

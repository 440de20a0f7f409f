//! # Node Container
//!
//! Configuration assembled once at startup and handed to the service.

pub mod config;

pub use config::{
    load_config, ConfigError, GenesisValidator, MiningConfig, NodeConfig, SignatureScheme,
};

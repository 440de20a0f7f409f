//! # Node Flows
//!
//! `ChainService` end to end: configuration in, blocks and validator
//! bookkeeping out.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use node_runtime::{ChainService, NodeConfig, ServiceError};
    use pc_02_ledger::{MiningError, GENESIS_TREASURY};
    use pc_03_consensus::ValidatorStatus;
    use shared_crypto::{Ed25519KeyPair, TransactionSigner};
    use shared_types::{ExecutionState, Transaction};

    fn config_from(vars: &[(&str, &str)]) -> NodeConfig {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = NodeConfig::default();
        config.apply_env(|key| env.get(key).cloned());
        config.validate().unwrap();
        config
    }

    fn booted(config: &NodeConfig) -> ChainService {
        let service = ChainService::new(config);
        for validator in &config.validators {
            service.register_validator(&validator.id, validator.stake).unwrap();
        }
        service
    }

    fn submit(service: &ChainService, sender: &str, recipient: &str, value: u64) {
        let nonce = service.next_nonce(sender);
        service
            .submit_transaction(Transaction::transfer(sender, recipient, value, nonce))
            .unwrap();
    }

    #[test]
    fn test_slot_loop_settles_transfers() {
        let config = config_from(&[("PC_VALIDATORS", "v1:6765,v2:10946")]);
        let service = booted(&config);

        submit(&service, GENESIS_TREASURY, "alice", 1_000);
        let first = service.produce_block(config.mining.difficulty).unwrap();
        assert_eq!(first.proposer_id, "v2");

        submit(&service, "alice", "bob", 400);
        submit(&service, "alice", "carol", 100);
        let second = service.produce_block(config.mining.difficulty).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.previous_hash, first.hash);

        assert_eq!(service.get_balance("alice"), 500);
        assert_eq!(service.get_balance("bob"), 400);
        assert_eq!(service.world_state().get("carol"), Some(&100));

        let v2 = service.validator_info("v2").unwrap();
        assert_eq!(v2.blocks_proposed, 2);
        assert_eq!(v2.total_rewards, (89 + 21) + (89 + 2 * 21));
    }

    #[test]
    fn test_idle_slot_is_retryable() {
        let service = booted(&NodeConfig::default());
        let err = service.produce_block(1).unwrap_err();
        assert!(matches!(err, ServiceError::Mining(MiningError::EmptyPool)));
        assert!(err.is_retryable());
        assert_eq!(service.get_chain_summary().length, 1);
    }

    #[test]
    fn test_slashing_reroutes_production() {
        let service = booted(&NodeConfig::default());
        service.slash_validator("validator-3", 17_711 - 6_764).unwrap();
        assert_eq!(
            service.validator_info("validator-3").unwrap().status,
            ValidatorStatus::Inactive
        );

        submit(&service, GENESIS_TREASURY, "alice", 1);
        let block = service.produce_block(1).unwrap();
        assert_eq!(block.proposer_id, "validator-2");
        assert_eq!(service.network_stats().active_validators, 2);
    }

    #[test]
    fn test_ed25519_node_accepts_only_signed_transfers() {
        let config = config_from(&[("PC_SIGNATURE_SCHEME", "ed25519")]);
        let service = booted(&config);

        // The treasury is not a key, so it cannot sign under this scheme.
        let from_treasury = Transaction::transfer(GENESIS_TREASURY, "alice", 1, 0);
        assert!(service.submit_transaction(from_treasury).is_err());

        let key = Ed25519KeyPair::from_seed([3u8; 32]);
        let address = key.identity();
        let unsigned = Transaction::transfer(&address, "bob", 0, service.next_nonce(&address));
        assert!(service.submit_transaction(unsigned.clone()).is_err());

        let signature = key.sign(&unsigned.signing_bytes());
        service
            .submit_transaction(unsigned.with_signature(signature))
            .unwrap();
        let block = service.produce_block(1).unwrap();
        assert_eq!(block.tx_count, 1);
        assert_eq!(service.next_nonce(&address), 1);
    }

    #[test]
    fn test_batch_preview_leaves_node_untouched() {
        let service = booted(&NodeConfig::default());
        let base: ExecutionState = [("x".to_string(), 100), ("y".to_string(), 0)].into();
        let batch = vec![
            Transaction::transfer("x", "y", 30, 0),
            Transaction::transfer("y", "z", 10, 0),
        ];

        let (state, reexecuted) = service.execute_batch(&batch, &base);
        assert_eq!(reexecuted, vec![1]);
        assert_eq!(state["x"], 70);
        assert_eq!(state["y"], 20);
        assert_eq!(state["z"], 10);
        assert!(!service.world_state().contains_key("z"));
    }

    #[test]
    fn test_finality_and_supermajority_after_boot() {
        let service = booted(&NodeConfig::default());
        submit(&service, GENESIS_TREASURY, "alice", 1);
        let block = service.produce_block(1).unwrap();

        assert!(service.check_supermajority(3));
        assert!(!service.check_supermajority(2));
        assert!(!service.confirm_block(block.index, 609).unwrap());
        assert!(service.confirm_block(block.index, 610).unwrap());
        assert!(matches!(
            service.confirm_block(99, 610),
            Err(ServiceError::UnknownBlock(99))
        ));
    }
}

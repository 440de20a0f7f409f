//! # Ledger Flows
//!
//! The ledger's balance scan and the executor's world state are two views of
//! the same settled history; these tests keep them honest against each other
//! and check that tampering is caught on append.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pc_01_fibonacci::FibState;
    use pc_02_ledger::{
        BlockMining, Chain, ChainIntegrityError, LedgerConfig, ManualTimeSource, GENESIS_TREASURY,
    };
    use pc_04_executor::{execute_sequential, OptimisticExecutor, TransferProcessor};
    use shared_types::{Block, ExecutionState, Transaction};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn chain_at(now: u64) -> Chain {
        Chain::with_time_source(LedgerConfig::default(), Box::new(ManualTimeSource::new(now)))
    }

    fn fund(chain: &mut Chain, recipients: &[(&str, u64)]) {
        for (recipient, value) in recipients {
            let nonce = chain.next_nonce(GENESIS_TREASURY);
            chain
                .add_transaction(Transaction::transfer(GENESIS_TREASURY, *recipient, *value, nonce))
                .unwrap();
        }
        chain.mine_pending_transactions("validator-1", 1).unwrap();
    }

    fn settled(chain: &Chain) -> Vec<Transaction> {
        chain
            .blocks()
            .iter()
            .flat_map(|b| b.transactions.iter().cloned())
            .collect()
    }

    // =========================================================================
    // LEDGER ↔ EXECUTOR AGREEMENT
    // =========================================================================

    #[test]
    fn test_replayed_history_matches_ledger_balances() {
        let mut chain = chain_at(4_000_000);
        fund(&mut chain, &[("alice", 1_000), ("bob", 500)]);

        let n = chain.next_nonce("alice");
        chain.add_transaction(Transaction::transfer("alice", "carol", 300, n)).unwrap();
        let n = chain.next_nonce("bob");
        chain.add_transaction(Transaction::transfer("bob", "alice", 200, n)).unwrap();
        chain.mine_pending_transactions("validator-2", 1).unwrap();

        let history = settled(&chain);
        let world = execute_sequential(&TransferProcessor, &history, &ExecutionState::new());

        let accounts: BTreeSet<&str> = history
            .iter()
            .flat_map(|tx| [tx.sender.as_str(), tx.recipient.as_str()])
            .collect();
        for account in accounts {
            let expected = chain.get_balance(account);
            assert_eq!(world.get(account).copied().unwrap_or(0), expected, "{account}");
        }
        assert_eq!(chain.get_balance("alice"), 900);
        assert_eq!(chain.get_balance("bob"), 300);
        assert_eq!(chain.get_balance("carol"), 300);
    }

    #[test]
    fn test_optimistic_replay_of_block_matches_sequential() {
        let mut chain = chain_at(4_000_000);
        fund(&mut chain, &[("a", 1_000), ("b", 1_000), ("c", 1_000), ("d", 1_000)]);

        for (sender, recipient, value) in [
            ("a", "e", 10),
            ("b", "f", 20),
            ("c", "a", 30),
            ("d", "g", 40),
            ("e", "h", 5),
        ] {
            let n = chain.next_nonce(sender);
            // "e" has no settled balance yet; it is only queued if funded.
            let _ = chain.add_transaction(Transaction::transfer(sender, recipient, value, n));
        }
        assert_eq!(chain.pending_count(), 4);

        let pre_state =
            execute_sequential(&TransferProcessor, &settled(&chain), &ExecutionState::new());
        let block = chain.mine_pending_transactions("validator-1", 1).unwrap();

        let outcome = OptimisticExecutor::default().execute_batch(&block.transactions, &pre_state);
        let reference = execute_sequential(&TransferProcessor, &block.transactions, &pre_state);
        assert_eq!(outcome.final_state, reference);
        // "c" -> "a" touches "a", which the first transfer already wrote.
        assert_eq!(outcome.reexecuted, vec![2]);
    }

    // =========================================================================
    // INTEGRITY
    // =========================================================================

    #[test]
    fn test_fib_vector_tracks_height() {
        let mut chain = chain_at(4_000_000);
        for i in 0..4 {
            fund(&mut chain, &[("alice", 1 + i)]);
        }

        for block in chain.blocks() {
            assert_eq!(block.fib_vector, FibState::GENESIS.advanced_by(block.index));
        }
        assert_eq!(chain.fib_state(), FibState::GENESIS.advanced_by(5));
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_tampered_block_is_rejected() {
        let mut chain = chain_at(4_000_000);
        let tip = chain.latest_block().clone();

        let mut block = Block::new(
            tip.index + 1,
            tip.timestamp + 8,
            tip.hash,
            "validator-1",
            vec![Transaction::transfer(GENESIS_TREASURY, "mallory", 10, 0)],
            chain.fib_state(),
        );
        block.mine(1).unwrap();
        block.transactions[0].value = 10_000;

        let err = chain.add_block(block).unwrap_err();
        assert!(matches!(err, ChainIntegrityError::HashMismatch { index: 1, .. }));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.get_balance("mallory"), 0);
    }

    #[test]
    fn test_fork_on_stale_tip_is_rejected() {
        let mut chain = chain_at(4_000_000);
        let genesis = chain.genesis().clone();
        fund(&mut chain, &[("alice", 1)]);

        let mut fork = Block::new(
            1,
            genesis.timestamp,
            genesis.hash,
            "validator-2",
            vec![],
            chain.fib_state(),
        );
        fork.mine(1).unwrap();

        let err = chain.add_block(fork).unwrap_err();
        assert!(matches!(err, ChainIntegrityError::PreviousHashMismatch { .. }));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_exported_chain_round_trips_through_json() {
        let mut chain = chain_at(4_000_000);
        fund(&mut chain, &[("alice", 42)]);

        let json = chain.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let blocks: Vec<Block> = serde_json::from_value(value["blocks"].clone()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], chain.blocks()[1]);
        assert!(blocks.iter().skip(1).all(Block::is_sealed));
    }
}

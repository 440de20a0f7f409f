//! # Consensus Flows
//!
//! Validator lifecycle across many rounds: votes shift proposer selection,
//! slashing removes validators from every active-set computation, and seeded
//! stake-weighted selection is reproducible.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pc_01_fibonacci::{fib, ProtocolParams};
    use pc_03_consensus::{
        ConsensusConfig, SelectionPolicy, StakeWeightedSelection, ValidatorRegistry,
        ValidatorStatus,
    };

    fn registry_with(stakes: &[(&str, u64)]) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::new(ProtocolParams::get().clone());
        for (id, stake) in stakes {
            registry.register(*id, *stake).unwrap();
        }
        registry
    }

    #[test]
    fn test_participation_overtakes_raw_stake() {
        let mut registry = registry_with(&[("whale", 28_657), ("steady", 6_765)]);
        assert_eq!(registry.select_proposer().as_deref(), Some("whale"));

        // 28657 * 1 < 6765 * 5
        registry.record_vote("whale").unwrap();
        for _ in 0..5 {
            registry.record_vote("steady").unwrap();
        }
        assert_eq!(registry.select_proposer().as_deref(), Some("steady"));

        let whale = registry.coherence_score("whale").unwrap();
        let steady = registry.coherence_score("steady").unwrap();
        assert!(steady > whale);
    }

    #[test]
    fn test_slashed_validator_leaves_active_set() {
        let mut registry =
            registry_with(&[("a", 6_765), ("b", 10_946), ("c", 17_711), ("d", 46_368)]);
        assert_eq!(registry.supermajority_threshold(), 3);
        assert_eq!(registry.select_proposer().as_deref(), Some("d"));

        // Below F(20) after the slash.
        registry.slash("d", 40_000).unwrap();
        assert_eq!(registry.get("d").unwrap().status(), ValidatorStatus::Inactive);

        assert_eq!(registry.active_count(), 3);
        assert_eq!(registry.supermajority_threshold(), 3);
        assert_eq!(registry.active_stake(), 6_765 + 10_946 + 17_711);
        assert_eq!(registry.total_stake(), 6_765 + 10_946 + 17_711 + 6_368);
        assert_eq!(registry.select_proposer().as_deref(), Some("c"));
        assert!(registry.coherence_score("d").is_none());
        assert!(registry.record_vote("d").is_err());

        let stats = registry.network_stats();
        assert_eq!(stats.total_validators, 4);
        assert_eq!(stats.active_validators, 3);
    }

    #[test]
    fn test_rewards_accumulate_over_rounds() {
        let mut registry = registry_with(&[("a", 6_765), ("b", 10_946)]);
        let mut expected: HashMap<String, u64> = HashMap::new();

        for round in 0..10usize {
            let proposer = registry.select_proposer().unwrap();
            let reward = registry.block_reward_for(round);
            registry.record_proposal(&proposer).unwrap();
            registry.credit_reward(&proposer, reward).unwrap();
            *expected.entry(proposer.clone()).or_default() += reward;

            // The other validator votes, so the lead alternates.
            let other = if proposer == "a" { "b" } else { "a" };
            registry.record_vote(other).unwrap();
        }

        for (id, total) in &expected {
            let info = registry.validator_info(id).unwrap();
            assert_eq!(info.total_rewards, *total);
        }
        let proposed: u64 = registry.validators().iter().map(|v| v.blocks_proposed).sum();
        assert_eq!(proposed, 10);
    }

    #[test]
    fn test_seeded_stake_weighted_is_reproducible() {
        let stakes = [("a", 6_765), ("b", 10_946), ("c", 17_711)];
        let config = ConsensusConfig {
            selection_policy: SelectionPolicy::StakeWeighted,
            rng_seed: Some(89),
        };

        let mut first = ValidatorRegistry::from_config(ProtocolParams::get().clone(), &config);
        let mut second = ValidatorRegistry::with_selection(
            ProtocolParams::get().clone(),
            Box::new(StakeWeightedSelection::seeded(89)),
        );
        for (id, stake) in stakes {
            first.register(id, stake).unwrap();
            second.register(id, stake).unwrap();
        }

        let a: Vec<_> = (0..50).map(|_| first.select_proposer().unwrap()).collect();
        let b: Vec<_> = (0..50).map(|_| second.select_proposer().unwrap()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stake_weighted_favours_larger_stake() {
        let mut registry = ValidatorRegistry::with_selection(
            ProtocolParams::get().clone(),
            Box::new(StakeWeightedSelection::seeded(7)),
        );
        registry.register("small", fib(20) as u64).unwrap();
        registry.register("large", fib(25) as u64).unwrap();

        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..2_000 {
            *counts.entry(registry.select_proposer().unwrap()).or_default() += 1;
        }
        // Expected share of "large" is 75025 / 81790, about 92%.
        assert!(counts["large"] > 1_600, "{counts:?}");
        assert!(counts.get("small").copied().unwrap_or(0) > 0, "{counts:?}");
    }

    #[test]
    fn test_finality_threshold_is_f15() {
        let registry = registry_with(&[("a", 6_765)]);
        assert!(!registry.check_finality(fib(15) as u64 - 1));
        assert!(registry.check_finality(fib(15) as u64));
    }
}

//! Optimistic parallel executor.

use crate::config::ExecutorConfig;
use crate::domain::conflict::{AccessTracker, Conflict};
use crate::domain::processor::{StateDelta, TransactionProcessor, TransferProcessor};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::{ExecutionState, Transaction};
use tracing::debug;

/// Result of one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub final_state: ExecutionState,
    /// Batch indices replayed sequentially, ascending.
    pub reexecuted: Vec<usize>,
    /// One entry per replayed transaction.
    pub conflicts: Vec<Conflict>,
}

impl ExecutionOutcome {
    pub fn into_parts(self) -> (ExecutionState, Vec<usize>) {
        (self.final_state, self.reexecuted)
    }
}

pub struct OptimisticExecutor<P = TransferProcessor> {
    processor: P,
    config: ExecutorConfig,
}

impl OptimisticExecutor<TransferProcessor> {
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_processor(TransferProcessor, config)
    }
}

impl Default for OptimisticExecutor<TransferProcessor> {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl<P: TransactionProcessor> OptimisticExecutor<P> {
    pub fn with_processor(processor: P, config: ExecutorConfig) -> Self {
        Self { processor, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs `tx` against `state`, keeping only declared writes.
    fn run(&self, tx: &Transaction, state: &ExecutionState) -> StateDelta {
        let mut delta = self.processor.process(tx, state);
        delta.retain(|key, _| tx.write_set.contains(key));
        delta
    }

    /// Executes `transactions` over `base_state`.
    ///
    /// The final state equals [`execute_sequential`] over the same input.
    pub fn execute_batch(
        &self,
        transactions: &[Transaction],
        base_state: &ExecutionState,
    ) -> ExecutionOutcome {
        // Stage 2a: every transaction against the untouched base state.
        let deltas: Vec<StateDelta> = if transactions.len() < self.config.parallel_threshold {
            transactions
                .iter()
                .map(|tx| self.run(tx, base_state))
                .collect()
        } else {
            transactions
                .par_iter()
                .map(|tx| self.run(tx, base_state))
                .collect()
        };

        // Stage 2b: conflict walk in batch order.
        let mut tracker = AccessTracker::default();
        let mut accepted = Vec::with_capacity(transactions.len());
        let mut reexecuted = Vec::new();
        let mut conflicts = Vec::new();

        for (index, (tx, delta)) in transactions.iter().zip(deltas).enumerate() {
            match tracker.check(index, tx) {
                Some(conflict) => {
                    debug!(
                        index,
                        kind = ?conflict.kind,
                        key = %conflict.key,
                        "Transaction deferred to sequential replay"
                    );
                    tracker.defer(tx);
                    reexecuted.push(index);
                    conflicts.push(conflict);
                }
                None => {
                    tracker.commit(tx);
                    accepted.push(delta);
                }
            }
        }

        // Stage 3: accepted writes, then ordered replay.
        let mut state = base_state.clone();
        for delta in accepted {
            state.extend(delta);
        }
        for &index in &reexecuted {
            let delta = self.run(&transactions[index], &state);
            state.extend(delta);
        }

        debug!(
            batch = transactions.len(),
            parallel = transactions.len() - reexecuted.len(),
            reexecuted = reexecuted.len(),
            "Batch executed"
        );

        ExecutionOutcome {
            final_state: state,
            reexecuted,
            conflicts,
        }
    }
}

/// Runs the batch with the default transfer processor and configuration.
pub fn execute_batch(
    transactions: &[Transaction],
    base_state: &ExecutionState,
) -> (ExecutionState, Vec<usize>) {
    OptimisticExecutor::default()
        .execute_batch(transactions, base_state)
        .into_parts()
}

/// Strict left-to-right execution; the reference the optimistic path must
/// match.
pub fn execute_sequential<P: TransactionProcessor>(
    processor: &P,
    transactions: &[Transaction],
    base_state: &ExecutionState,
) -> ExecutionState {
    let mut state = base_state.clone();
    for tx in transactions {
        let mut delta = processor.process(tx, &state);
        delta.retain(|key, _| tx.write_set.contains(key));
        state.extend(delta);
    }
    state
}

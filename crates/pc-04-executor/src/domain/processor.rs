//! Transaction processors.
//!
//! A processor computes the values a transaction writes from a read-only view
//! of state. The executor keeps only keys in the declared write set.

use shared_types::{ExecutionState, StateKey, StateValue, Transaction};
use std::collections::BTreeMap;

/// New values for the keys a transaction writes.
pub type StateDelta = BTreeMap<StateKey, StateValue>;

/// Computes a transaction's writes.
pub trait TransactionProcessor: Send + Sync {
    /// Must be a pure function of `tx` and `state`.
    fn process(&self, tx: &Transaction, state: &ExecutionState) -> StateDelta;
}

/// Value transfer between balance keys named after sender and recipient.
///
/// Only keys present in the write set are updated, so a transfer that
/// declares only its sender debits without crediting. The genesis
/// allocation declares only the treasury, which is how it mints.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransferProcessor;

impl TransactionProcessor for TransferProcessor {
    fn process(&self, tx: &Transaction, state: &ExecutionState) -> StateDelta {
        let mut delta = StateDelta::new();
        if tx.sender == tx.recipient {
            return delta;
        }

        let value = StateValue::from(tx.value);
        let balance = |key: &str| state.get(key).copied().unwrap_or(0);

        if tx.write_set.contains(&tx.sender) {
            delta.insert(
                tx.sender.clone(),
                balance(&tx.sender).saturating_sub(value),
            );
        }
        if tx.write_set.contains(&tx.recipient) {
            delta.insert(
                tx.recipient.clone(),
                balance(&tx.recipient).saturating_add(value),
            );
        }
        delta
    }
}

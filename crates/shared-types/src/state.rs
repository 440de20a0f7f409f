//! Key-value execution state.

use std::collections::BTreeMap;

/// State key; for transfers, the account identity.
pub type StateKey = String;

/// Signed so intermediate arithmetic never wraps.
pub type StateValue = i128;

/// Ordered key-value state owned by one executor run at a time.
pub type ExecutionState = BTreeMap<StateKey, StateValue>;

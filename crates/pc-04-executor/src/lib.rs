//! # pc-04-executor
//!
//! Optimistic parallel execution with a sequential fallback.
//!
//! ## Algorithm
//!
//! 1. **Declared access.** Transactions carry their read/write key sets; they
//!    are trusted as accurate.
//! 2. **Optimistic pass.** Every transaction computes its writes against a
//!    private view of the base state (on the rayon pool above
//!    [`ExecutorConfig::parallel_threshold`]). Walking the batch in order, a
//!    transaction is deferred when its keys meet the writes already committed
//!    by earlier accepted transactions, or overlap an earlier deferred one.
//!    Otherwise its writes are committed.
//! 3. **Sequential replay.** Accepted writes are applied to the base state in
//!    order, then every deferred transaction is re-executed one at a time in
//!    batch order against the updated state.
//!
//! The final state always equals strict left-to-right execution. The executor
//! never fails; the worst case is a full sequential replay.
//!
//! ```rust,ignore
//! use pc_04_executor::{OptimisticExecutor, ExecutorConfig};
//!
//! let executor = OptimisticExecutor::new(ExecutorConfig::default());
//! let outcome = executor.execute_batch(&transactions, &base_state);
//! let (final_state, reexecuted) = outcome.into_parts();
//! ```

pub mod config;
pub mod domain;

pub use config::{ExecutorConfig, PARALLEL_THRESHOLD};
pub use domain::conflict::{Conflict, ConflictKind};
pub use domain::executor::{execute_batch, execute_sequential, ExecutionOutcome, OptimisticExecutor};
pub use domain::processor::{StateDelta, TransactionProcessor, TransferProcessor};

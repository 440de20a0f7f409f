//! Conflict detection over declared access sets.

use serde::{Deserialize, Serialize};
use shared_types::Transaction;
use std::collections::BTreeSet;

/// Why a transaction was deferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// A read meets an earlier write, or a write meets an earlier deferred
    /// read.
    ReadAfterWrite,
    /// Two writes to the same key.
    WriteAfterWrite,
}

/// A deferred transaction and the first key it conflicted on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Batch index.
    pub index: usize,
    pub kind: ConflictKind,
    pub key: String,
}

/// Keys touched so far in the optimistic pass.
#[derive(Debug, Default)]
pub(crate) struct AccessTracker<'a> {
    committed_writes: BTreeSet<&'a str>,
    deferred_reads: BTreeSet<&'a str>,
    deferred_writes: BTreeSet<&'a str>,
}

fn first_common<'a>(
    keys: &'a BTreeSet<String>,
    seen: &BTreeSet<&str>,
) -> Option<&'a String> {
    keys.iter().find(|k| seen.contains(k.as_str()))
}

impl<'a> AccessTracker<'a> {
    /// Conflict of `tx` against committed writes and deferred transactions.
    pub(crate) fn check(&self, index: usize, tx: &Transaction) -> Option<Conflict> {
        let conflict = |kind, key: &String| Conflict {
            index,
            kind,
            key: key.clone(),
        };

        if let Some(key) = first_common(&tx.write_set, &self.committed_writes) {
            return Some(conflict(ConflictKind::WriteAfterWrite, key));
        }
        if let Some(key) = first_common(&tx.read_set, &self.committed_writes) {
            return Some(conflict(ConflictKind::ReadAfterWrite, key));
        }
        if let Some(key) = first_common(&tx.write_set, &self.deferred_writes) {
            return Some(conflict(ConflictKind::WriteAfterWrite, key));
        }
        if let Some(key) = first_common(&tx.read_set, &self.deferred_writes) {
            return Some(conflict(ConflictKind::ReadAfterWrite, key));
        }
        if let Some(key) = first_common(&tx.write_set, &self.deferred_reads) {
            return Some(conflict(ConflictKind::ReadAfterWrite, key));
        }
        None
    }

    pub(crate) fn commit(&mut self, tx: &'a Transaction) {
        self.committed_writes
            .extend(tx.write_set.iter().map(String::as_str));
    }

    pub(crate) fn defer(&mut self, tx: &'a Transaction) {
        self.deferred_reads.extend(tx.read_set.iter().map(String::as_str));
        self.deferred_writes
            .extend(tx.write_set.iter().map(String::as_str));
    }
}

//! # Optimistic Transactions
//!
//! Tracks optimistic local mutations that are waiting on a persistence
//! request. A transaction is opened with a snapshot of the state it is about
//! to mutate; resolving it as `Commit` lets the mutation stand, resolving it
//! as `Revert` hands the snapshot back so the caller can unwind.
//!
//! Phases for one id are monotonic: `Begin` precedes its `Commit` or
//! `Revert`, guaranteed by the linear handler sequence that emits them.
//! Overlapping `Begin`s for the same id are a caller contract violation;
//! they are logged, not guarded (the later snapshot wins).

use std::collections::HashMap;

use tracing::warn;

use crate::document::Document;
use crate::reusable::ReusableEntry;
use crate::tree::NodeTree;

/// Phase of an optimistic transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Begin,
    Commit,
    Revert,
}

/// State captured at `Begin`; immutable until a `Revert` consumes it.
#[derive(Debug, Clone)]
pub enum Snapshot {
    /// Pre-save document, including its pending edits.
    Document(Document),
    /// Pre-delete tree plus the reusable entry being removed.
    Reusable { tree: NodeTree, entry: ReusableEntry },
}

#[derive(Default)]
pub struct TransactionManager {
    open: HashMap<String, Snapshot>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, id: &str, snapshot: Snapshot) {
        if self.open.insert(id.to_string(), snapshot).is_some() {
            warn!(transaction = id, "begin while a transaction with this id was outstanding; last begin wins");
        }
    }

    /// Resolve an open transaction. `Commit` drops the snapshot; `Revert`
    /// returns it for the reconciler to unwind. Resolving an unknown id is a
    /// no-op (the transaction is already inert).
    pub fn resolve(&mut self, id: &str, phase: Phase) -> Option<Snapshot> {
        debug_assert!(phase != Phase::Begin, "resolve takes Commit or Revert");
        let snapshot = self.open.remove(id);
        if snapshot.is_none() {
            warn!(transaction = id, ?phase, "resolving a transaction that was never begun");
            return None;
        }
        match phase {
            Phase::Revert => snapshot,
            _ => None,
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains_key(id)
    }
}

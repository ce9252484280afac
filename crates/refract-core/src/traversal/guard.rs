//! Visited-set bookkeeping for cyclic object graphs
//!
//! A `TraversalContext` belongs to exactly one top-level call and is passed
//! down explicitly; nothing is thread-local, so concurrent calls on different
//! threads can never observe each other's markers. Callers pair every
//! successful `enter` with a `leave` on all paths, including errors, so the
//! context is empty again when the top-level call returns.

use std::collections::HashSet;

use crate::log_decision;
use crate::model::Reflect;
use crate::schema::DECISION_REENTER;

/// Reference identity of an object during one traversal
///
/// The type name disambiguates a struct from its first field, which can live
/// at the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitKey {
    address: usize,
    type_name: &'static str,
}

impl VisitKey {
    pub fn of(object: &dyn Reflect) -> Self {
        Self {
            address: object.address(),
            type_name: object.type_info().name(),
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }
}

#[derive(Debug, Default)]
pub struct TraversalContext {
    visiting: HashSet<VisitKey>,
    pairs: HashSet<(VisitKey, VisitKey)>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as in progress. Returns false, recording nothing, when it
    /// already is: the caller must not recurse.
    pub fn enter(&mut self, key: VisitKey) -> bool {
        let fresh = self.visiting.insert(key);
        if !fresh {
            log_decision!(DECISION_REENTER, key.type_name);
        }
        fresh
    }

    pub fn leave(&mut self, key: VisitKey) {
        self.visiting.remove(&key);
    }

    pub fn is_visiting(&self, key: VisitKey) -> bool {
        self.visiting.contains(&key)
    }

    /// Pair variant used by two-sided algorithms. A pair counts as in
    /// progress in either orientation.
    pub fn enter_pair(&mut self, left: VisitKey, right: VisitKey) -> bool {
        if self.pairs.contains(&(left, right)) || self.pairs.contains(&(right, left)) {
            log_decision!(
                DECISION_REENTER,
                left.type_name,
                other_type_name = right.type_name
            );
            return false;
        }
        self.pairs.insert((left, right));
        true
    }

    pub fn leave_pair(&mut self, left: VisitKey, right: VisitKey) {
        self.pairs.remove(&(left, right));
    }

    /// True when no marker is held
    pub fn is_empty(&self) -> bool {
        self.visiting.is_empty() && self.pairs.is_empty()
    }
}

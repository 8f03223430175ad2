//! Group history and conflict detection.
//!
//! Two append-only key sets scoped to one generator instance: every
//! accepted group's canonical key, and the keys of accepted groups of size
//! exactly 5. The latter is what makes the five-core rule enforceable: a
//! 6-member group conflicts if any of its six 5-member subsets was ever
//! accepted as a 5-member group.

use std::collections::HashSet;

use crate::artifact::{Group, FIVE_CORE_SIZE, MAX_GROUP_SIZE, MIN_GROUP_SIZE};

/// Accumulated group history for one generator instance.
#[derive(Debug, Default)]
pub struct GroupHistory {
    /// Canonical keys of every accepted group.
    exact: HashSet<String>,
    /// Canonical keys of every accepted group of size exactly 5.
    five_core: HashSet<String>,
}

impl GroupHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted round. Keys only grow; nothing is ever removed.
    pub fn register_round(&mut self, groups: &[Group]) {
        for group in groups {
            let key = group.canonical_key();
            if group.len() == FIVE_CORE_SIZE {
                self.five_core.insert(key.clone());
            }
            self.exact.insert(key);
        }
    }

    /// Whether a single group violates any rule: size outside 3..=6, exact
    /// reappearance, or (for 6-member groups) a five-core reappearance.
    pub fn is_conflict(&self, group: &Group) -> bool {
        let size = group.len();
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return true;
        }
        if self.exact.contains(&group.canonical_key()) {
            return true;
        }
        if size == MAX_GROUP_SIZE {
            return group
                .five_core_keys()
                .iter()
                .any(|key| self.five_core.contains(key));
        }
        false
    }

    /// Indices of conflicting groups in a candidate partition. Recomputed
    /// over the full partition on every call.
    pub fn conflicting_indices(&self, groups: &[Group]) -> Vec<usize> {
        groups
            .iter()
            .enumerate()
            .filter(|(_, g)| self.is_conflict(g))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of distinct group keys seen so far.
    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    /// Number of distinct five-member group keys seen so far.
    pub fn five_core_count(&self) -> usize {
        self.five_core.len()
    }
}

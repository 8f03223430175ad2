//! Core data model: members, groups, rounds, and the finished assignment.
//!
//! A group's identity for history purposes is its canonical key: members
//! sorted ascending, zero-padded, joined with '-'. The key is invariant
//! under any permutation of the same member set, so it is the sole equality
//! notion used for repeat detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A member identity. Members carry no attributes beyond the integer.
pub type Member = u32;

/// Smallest acceptable group size.
pub const MIN_GROUP_SIZE: usize = 3;
/// Largest acceptable group size.
pub const MAX_GROUP_SIZE: usize = 6;
/// Group size whose canonical key doubles as a five-core key.
pub const FIVE_CORE_SIZE: usize = 5;

/// An unordered set of members assigned together within one round.
///
/// Member order inside `members` is incidental; sizes outside 3..=6 can
/// occur transiently during construction and repair but never in an
/// accepted round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub members: Vec<Member>,
}

impl Group {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members sorted ascending (presentation and key order).
    pub fn sorted_members(&self) -> Vec<Member> {
        let mut sorted = self.members.clone();
        sorted.sort_unstable();
        sorted
    }

    /// Order-independent identity of this group, e.g. `[3, 10, 2]` -> `"02-03-10"`.
    pub fn canonical_key(&self) -> String {
        key_of(&self.sorted_members())
    }

    /// Canonical keys of the six 5-member subsets of a 6-member group,
    /// each formed by excluding exactly one member. Empty for any other size.
    pub fn five_core_keys(&self) -> Vec<String> {
        if self.members.len() != MAX_GROUP_SIZE {
            return Vec::new();
        }
        let sorted = self.sorted_members();
        (0..sorted.len())
            .map(|excluded| {
                let subset: Vec<Member> = sorted
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != excluded)
                    .map(|(_, m)| *m)
                    .collect();
                key_of(&subset)
            })
            .collect()
    }
}

/// Join already-sorted members into a canonical key.
fn key_of(sorted: &[Member]) -> String {
    sorted
        .iter()
        .map(|m| format!("{:02}", m))
        .collect::<Vec<_>>()
        .join("-")
}

/// One accepted round: a partition of the full member set, plus the number
/// of groups still in conflict when the round was accepted (0 unless the
/// round was a best-effort fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundAssignment {
    pub groups: Vec<Group>,
    pub residual_conflicts: usize,
}

impl RoundAssignment {
    /// All members of the round, sorted ascending.
    pub fn all_members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .groups
            .iter()
            .flat_map(|g| g.members.iter().copied())
            .collect();
        members.sort_unstable();
        members
    }

    /// True when the round covers exactly `{1..=members}` with no
    /// duplicates and no omissions.
    pub fn is_complete_partition(&self, members: Member) -> bool {
        self.all_members() == (1..=members).collect::<Vec<_>>()
    }

    /// Indices of groups whose size falls outside 3..=6.
    pub fn size_violations(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&g.len()))
            .map(|(i, _)| i)
            .collect()
    }
}

/// The finished run: one `RoundAssignment` per requested round, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentArtifact {
    /// Member count the run was generated for.
    pub members: Member,
    pub rounds: Vec<RoundAssignment>,
}

impl AssignmentArtifact {
    pub fn new(members: Member, rounds: Vec<RoundAssignment>) -> Self {
        Self { members, rounds }
    }

    /// Sum of residual conflicts across all rounds (0 for a clean run).
    pub fn total_residual_conflicts(&self) -> usize {
        self.rounds.iter().map(|r| r.residual_conflicts).sum()
    }
}

impl fmt::Display for AssignmentArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (round_idx, round) in self.rounds.iter().enumerate() {
            writeln!(f, "=== Round {} ===", round_idx + 1)?;
            for (group_idx, group) in round.groups.iter().enumerate() {
                let members: Vec<String> = group
                    .sorted_members()
                    .iter()
                    .map(|m| m.to_string())
                    .collect();
                writeln!(
                    f,
                    "G{:2}: [{}] (size={})",
                    group_idx + 1,
                    members.join(", "),
                    group.len()
                )?;
            }
            if round.residual_conflicts > 0 {
                writeln!(f, "(unresolved conflicts: {})", round.residual_conflicts)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_sorts_and_pads() {
        let group = Group::new(vec![3, 10, 2]);
        assert_eq!(group.canonical_key(), "02-03-10");
    }

    #[test]
    fn test_canonical_key_permutation_invariant() {
        let a = Group::new(vec![7, 1, 22, 14, 5]);
        let b = Group::new(vec![14, 5, 1, 7, 22]);
        let c = Group::new(vec![22, 14, 7, 5, 1]);
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(b.canonical_key(), c.canonical_key());
    }

    #[test]
    fn test_five_core_keys_for_six_member_group() {
        let group = Group::new(vec![6, 5, 4, 3, 2, 1]);
        let keys = group.five_core_keys();
        assert_eq!(keys.len(), 6);

        // Excluding member 1 leaves 2..=6.
        assert!(keys.contains(&"02-03-04-05-06".to_string()));
        // Excluding member 6 leaves 1..=5.
        assert!(keys.contains(&"01-02-03-04-05".to_string()));

        // All six subsets are distinct.
        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_five_core_keys_empty_for_other_sizes() {
        assert!(Group::new(vec![1, 2, 3, 4, 5]).five_core_keys().is_empty());
        assert!(Group::new(vec![1, 2, 3]).five_core_keys().is_empty());
    }

    #[test]
    fn test_complete_partition_detection() {
        let round = RoundAssignment {
            groups: vec![Group::new(vec![2, 4, 6]), Group::new(vec![5, 3, 1])],
            residual_conflicts: 0,
        };
        assert!(round.is_complete_partition(6));
        assert!(!round.is_complete_partition(7));
    }

    #[test]
    fn test_incomplete_partition_with_duplicate() {
        let round = RoundAssignment {
            groups: vec![Group::new(vec![1, 2, 3]), Group::new(vec![3, 4, 5])],
            residual_conflicts: 0,
        };
        assert!(!round.is_complete_partition(5));
    }

    #[test]
    fn test_size_violations() {
        let round = RoundAssignment {
            groups: vec![
                Group::new(vec![1, 2]),
                Group::new(vec![3, 4, 5]),
                Group::new(vec![6, 7, 8, 9, 10, 11, 12]),
            ],
            residual_conflicts: 0,
        };
        assert_eq!(round.size_violations(), vec![0, 2]);
    }

    #[test]
    fn test_display_renders_sorted_members() {
        let artifact = AssignmentArtifact::new(
            3,
            vec![RoundAssignment {
                groups: vec![Group::new(vec![3, 1, 2])],
                residual_conflicts: 0,
            }],
        );
        let rendered = artifact.to_string();
        assert!(rendered.contains("=== Round 1 ==="));
        assert!(rendered.contains("[1, 2, 3] (size=3)"));
    }
}

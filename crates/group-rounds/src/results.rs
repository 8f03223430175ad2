//! Serializable run results: configuration echo, per-round assignments,
//! and summary statistics, with JSON save/load.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::AssignmentArtifact;
use crate::generator::GeneratorConfig;

/// Results from a single generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    pub ended_at: DateTime<Utc>,
    /// Configuration the run was generated with.
    pub config: GeneratorConfig,
    /// The generated rounds.
    pub artifact: AssignmentArtifact,
    /// Summary statistics.
    pub summary: RunSummary,
}

/// Aggregate statistics over one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total groups across all rounds.
    pub total_groups: usize,
    /// Group count per size, across all rounds.
    pub size_histogram: BTreeMap<usize, usize>,
    /// Rounds accepted through the best-effort fallback.
    pub rounds_with_conflicts: usize,
    /// Sum of residual conflicts across all rounds.
    pub total_residual_conflicts: usize,
}

impl RunResult {
    /// Wrap a finished artifact with run metadata and computed summary.
    pub fn new(
        config: GeneratorConfig,
        artifact: AssignmentArtifact,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        let summary = RunSummary::compute(&artifact);
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            ended_at,
            config,
            artifact,
            summary,
        }
    }

    /// Save the result to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let result = serde_json::from_str(&json)?;
        Ok(result)
    }
}

impl RunSummary {
    /// Compute summary statistics for an artifact.
    pub fn compute(artifact: &AssignmentArtifact) -> Self {
        let mut total_groups = 0;
        let mut size_histogram: BTreeMap<usize, usize> = BTreeMap::new();
        let mut rounds_with_conflicts = 0;

        for round in &artifact.rounds {
            total_groups += round.groups.len();
            for group in &round.groups {
                *size_histogram.entry(group.len()).or_insert(0) += 1;
            }
            if round.residual_conflicts > 0 {
                rounds_with_conflicts += 1;
            }
        }

        Self {
            total_groups,
            size_histogram,
            rounds_with_conflicts,
            total_residual_conflicts: artifact.total_residual_conflicts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Group, RoundAssignment};

    fn sample_artifact() -> AssignmentArtifact {
        AssignmentArtifact::new(
            11,
            vec![
                RoundAssignment {
                    groups: vec![
                        Group::new(vec![1, 2, 3, 4, 5]),
                        Group::new(vec![6, 7, 8, 9, 10, 11]),
                    ],
                    residual_conflicts: 0,
                },
                RoundAssignment {
                    groups: vec![
                        Group::new(vec![1, 3, 5, 7, 9]),
                        Group::new(vec![2, 4, 6, 8, 10, 11]),
                    ],
                    residual_conflicts: 1,
                },
            ],
        )
    }

    #[test]
    fn test_summary_counts_groups_and_sizes() {
        let summary = RunSummary::compute(&sample_artifact());

        assert_eq!(summary.total_groups, 4);
        assert_eq!(summary.size_histogram.get(&5), Some(&2));
        assert_eq!(summary.size_histogram.get(&6), Some(&2));
        assert_eq!(summary.rounds_with_conflicts, 1);
        assert_eq!(summary.total_residual_conflicts, 1);
    }

    #[test]
    fn test_result_serializes_round_trip() {
        let now = Utc::now();
        let result = RunResult::new(
            GeneratorConfig {
                members: 11,
                rounds: 2,
                seed: Some(9),
            },
            sample_artifact(),
            now,
            now,
        );

        let json = serde_json::to_string(&result).unwrap();
        let back: RunResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.config.members, 11);
        assert_eq!(back.artifact.rounds.len(), 2);
        assert_eq!(back.summary.total_groups, 4);
    }
}

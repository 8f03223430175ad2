//! Round driver: repeated build/repair attempts, best-effort acceptance,
//! history registration, and rotation of the remainder bias between rounds.

use anyhow::{bail, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifact::{AssignmentArtifact, Member, RoundAssignment};
use crate::history::GroupHistory;
use crate::partition::build_partition;
use crate::repair::{repair, DEFAULT_REPAIR_ITERATIONS};

/// Fresh partitions attempted per round before falling back to the
/// least-conflicting candidate.
const MAX_ATTEMPTS_PER_ROUND: usize = 10;

/// Configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Member count; identities are 1..=members. Must be at least 3.
    pub members: Member,
    /// Number of rounds to produce. Must be at least 1.
    pub rounds: usize,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            members: 54,
            rounds: 3,
            seed: None,
        }
    }
}

/// Assignment generator. Owns the RNG and the group history exclusively;
/// a single instance must not be driven from multiple threads.
pub struct RoundGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    history: GroupHistory,
    /// Start offset for remainder placement, advanced after every accepted
    /// round so stray members do not always land in the same lead group.
    rotation: usize,
}

impl RoundGenerator {
    /// Create a generator. A seeded generator reproduces the same rounds
    /// for the same config on every run; an unseeded one does not.
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            rng,
            history: GroupHistory::new(),
            rotation: 0,
        }
    }

    /// Generate all configured rounds.
    ///
    /// Fails up front when the config is out of range; never fails for an
    /// unlucky search. Rounds accepted through the best-effort fallback
    /// carry their residual conflict count in the artifact.
    pub fn generate(&mut self) -> Result<AssignmentArtifact> {
        if self.config.members < 3 {
            bail!("members must be >= 3, got {}", self.config.members);
        }
        if self.config.rounds < 1 {
            bail!("rounds must be >= 1, got {}", self.config.rounds);
        }

        let mut rounds = Vec::with_capacity(self.config.rounds);
        for round in 0..self.config.rounds {
            let accepted = self.generate_round(round);
            self.history.register_round(&accepted.groups);
            self.rotation = if accepted.groups.is_empty() {
                0
            } else {
                (self.rotation + 1) % accepted.groups.len()
            };
            rounds.push(accepted);
        }

        Ok(AssignmentArtifact::new(self.config.members, rounds))
    }

    /// Run the attempt loop for one round and pick a candidate.
    ///
    /// The first conflict-free attempt wins outright. Otherwise the
    /// lowest-residual candidate is kept (ties keep the earliest) and
    /// accepted once the attempt budget is exhausted.
    fn generate_round(&mut self, round: usize) -> RoundAssignment {
        let mut best_groups = Vec::new();
        let mut best_residual = usize::MAX;

        for attempt in 0..MAX_ATTEMPTS_PER_ROUND {
            let mut groups = build_partition(self.config.members, self.rotation, &mut self.rng);

            let history = &self.history;
            let residual = repair(
                &mut groups,
                &mut self.rng,
                DEFAULT_REPAIR_ITERATIONS,
                |gs| history.conflicting_indices(gs),
            )
            .len();

            if residual == 0 {
                debug!(round, attempt, "round accepted with no conflicts");
                return RoundAssignment {
                    groups,
                    residual_conflicts: 0,
                };
            }

            debug!(round, attempt, residual, "attempt left conflicts unresolved");
            if residual < best_residual {
                best_residual = residual;
                best_groups = groups;
            }
        }

        warn!(
            round,
            residual = best_residual,
            "attempt budget exhausted; accepting least-conflicting candidate"
        );
        RoundAssignment {
            groups: best_groups,
            residual_conflicts: best_residual,
        }
    }
}

/// Convenience entry point: build a generator, run it once.
pub fn generate(members: Member, rounds: usize, seed: Option<u64>) -> Result<AssignmentArtifact> {
    let mut generator = RoundGenerator::new(GeneratorConfig {
        members,
        rounds,
        seed,
    });
    let artifact = generator.generate()?;
    info!(
        members,
        rounds,
        residual = artifact.total_residual_conflicts(),
        "generation complete"
    );
    Ok(artifact)
}

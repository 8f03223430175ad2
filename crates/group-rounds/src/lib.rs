//! Rotating group assignment generator.
//!
//! Partitions N members (identified by the integers 1..=N) into groups of
//! 3-6 people across R sequential rounds, avoiding two kinds of repetition:
//! - the exact same group appearing in a later round, and
//! - a 5-member core reappearing inside any 6-member group.
//!
//! Construction is randomized and seedable. When the constraints cannot be
//! satisfied within the bounded search budget, the least-conflicting
//! candidate is accepted instead of failing the run; the residual conflict
//! count for every round is part of the result so callers can re-run with a
//! different seed if they care.

pub mod artifact;
pub mod generator;
pub mod history;
pub mod partition;
pub mod repair;
pub mod results;

pub use artifact::{AssignmentArtifact, Group, Member, RoundAssignment};
pub use generator::{generate, GeneratorConfig, RoundGenerator};
pub use history::GroupHistory;
pub use results::{RunResult, RunSummary};

//! Local repair: bounded stochastic search over single-member swaps.
//!
//! Greedy hill-climbing with lateral moves: a swap is kept whenever it does
//! not increase the violation count, which lets the search drift out of
//! local traps. No convergence guarantee; the caller decides what to do
//! with whatever violations remain.

use rand::prelude::*;

use crate::artifact::Group;

/// Iteration cap for one repair pass.
pub const DEFAULT_REPAIR_ITERATIONS: usize = 20;

/// Retries allowed when drawing a swap partner distinct from the
/// conflicting group.
const PARTNER_RETRIES: usize = 10;

/// Attempt to reduce violations in `groups` by swapping single members
/// between a conflicting group and a randomly drawn partner.
///
/// `evaluate` must be side-effect free: given the partition it returns the
/// indices of groups currently in violation. It is re-run over the full
/// partition after every swap. Returns the indices still in violation when
/// the search stops (empty on full success).
pub fn repair<F>(
    groups: &mut [Group],
    rng: &mut impl Rng,
    max_iterations: usize,
    evaluate: F,
) -> Vec<usize>
where
    F: Fn(&[Group]) -> Vec<usize>,
{
    let mut conflicts = evaluate(groups);

    for _ in 0..max_iterations {
        if conflicts.is_empty() {
            return conflicts;
        }

        let a = conflicts[rng.random_range(0..conflicts.len())];
        let mut b = a;
        for _ in 0..PARTNER_RETRIES {
            if b != a {
                break;
            }
            b = rng.random_range(0..groups.len());
        }
        if a == b {
            continue;
        }
        if groups[a].is_empty() || groups[b].is_empty() {
            continue;
        }

        let ai = rng.random_range(0..groups[a].len());
        let bi = rng.random_range(0..groups[b].len());
        let a_val = groups[a].members[ai];
        let b_val = groups[b].members[bi];
        groups[a].members[ai] = b_val;
        groups[b].members[bi] = a_val;

        let new_conflicts = evaluate(groups);
        if new_conflicts.len() <= conflicts.len() {
            // Not worse: keep the swap, lateral moves included.
            conflicts = new_conflicts;
        } else {
            groups[a].members[ai] = a_val;
            groups[b].members[bi] = b_val;
        }
    }

    evaluate(groups)
}

//! Partition builder: shuffle, chunk by five, distribute the remainder.
//!
//! One candidate partition per call: a uniform shuffle of the member ids,
//! sliced into groups of exactly 5, with the leftover tail merged or spun
//! into its own group depending on its size. The rotation offset shifts
//! which group receives stray members first, so the same lead group is not
//! favored round after round.

use std::cmp::Reverse;

use rand::prelude::*;

use crate::artifact::{Group, Member, MAX_GROUP_SIZE, MIN_GROUP_SIZE};

/// Groups are cut from the shuffled sequence in slices of this size.
const CHUNK_SIZE: usize = 5;

/// Build one randomized candidate partition of `1..=members`.
pub fn build_partition(members: Member, rotation: usize, rng: &mut impl Rng) -> Vec<Group> {
    let mut ids: Vec<Member> = (1..=members).collect();
    ids.shuffle(rng);

    let (mut groups, remainder) = chunk_by_five(&ids);
    distribute_remainder(&mut groups, remainder, rotation);
    groups
}

/// Slice the shuffled ids into groups of exactly 5, returning the tail of
/// fewer than 5 leftover members separately.
fn chunk_by_five(ids: &[Member]) -> (Vec<Group>, Vec<Member>) {
    let chunks = ids.chunks_exact(CHUNK_SIZE);
    let remainder = chunks.remainder().to_vec();
    let groups = chunks.map(|chunk| Group::new(chunk.to_vec())).collect();
    (groups, remainder)
}

/// Fold the remainder into the chunked groups, by remainder size r:
/// - r=0: nothing to do.
/// - r=1/2: round-robin each stray into the next group with room (< 6),
///   starting at the rotation offset; with no room anywhere, seed a new
///   group from the stray by borrowing members.
/// - r=3/4: the remainder stands alone as one group.
/// - r=8/9: split into 5 + rest. Unreachable while chunking slices in
///   fives; kept as a safety valve should the chunking strategy change.
/// - any other r: greedy slices clamped to 3..=6.
///
/// Special case first: when chunking produced no groups at all (members < 5)
/// and the remainder already fits 3..=6, it becomes the sole group.
pub fn distribute_remainder(groups: &mut Vec<Group>, remainder: Vec<Member>, rotation: usize) {
    let r = remainder.len();
    if r == 0 {
        return;
    }

    if groups.is_empty() && (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&r) {
        groups.push(Group::new(remainder));
        return;
    }

    match r {
        1 | 2 => {
            let mut ptr = if groups.is_empty() { 0 } else { rotation % groups.len() };
            for member in remainder {
                let mut attempts = 0;
                let mut placed = false;

                // At most one full cycle over the groups looking for room.
                while attempts < groups.len() {
                    if groups[ptr].len() < MAX_GROUP_SIZE {
                        groups[ptr].members.push(member);
                        ptr = (ptr + 1) % groups.len();
                        placed = true;
                        break;
                    }
                    ptr = (ptr + 1) % groups.len();
                    attempts += 1;
                }

                if !placed {
                    // Every group is already at 6: seed a new group from the
                    // stray and borrow it up to the minimum size.
                    let fresh = borrow_into_new_group(groups, member);
                    groups.push(fresh);
                }
            }
        }
        3 | 4 => {
            groups.push(Group::new(remainder));
        }
        8 | 9 => {
            let mut five = remainder;
            let rest = five.split_off(CHUNK_SIZE);
            groups.push(Group::new(five));
            groups.push(Group::new(rest));
        }
        _ => {
            // Greedy fallback for remainder strategies this chunking scheme
            // never produces.
            let mut i = 0;
            while i < remainder.len() {
                let left = remainder.len() - i;
                let take = left.clamp(MIN_GROUP_SIZE, MAX_GROUP_SIZE).min(left);
                groups.push(Group::new(remainder[i..i + take].to_vec()));
                i += take;
            }
        }
    }
}

/// Seed a new group with `stray` and borrow one member at a time from the
/// currently largest existing group until the new group reaches the
/// minimum size. Only groups with more than 3 members donate, so a donor
/// never drops below the minimum itself; if no group can donate the new
/// group is returned short. Donors are mutated in place.
pub fn borrow_into_new_group(groups: &mut [Group], stray: Member) -> Group {
    let mut fresh = Group::new(vec![stray]);

    while fresh.len() < MIN_GROUP_SIZE {
        // Largest donor, earliest index on ties.
        let donor = (0..groups.len())
            .filter(|&i| groups[i].len() > MIN_GROUP_SIZE)
            .max_by_key(|&i| (groups[i].len(), Reverse(i)));

        match donor {
            Some(idx) => {
                if let Some(member) = groups[idx].members.pop() {
                    fresh.members.push(member);
                }
            }
            None => break,
        }
    }

    fresh
}

/*!
Compares a user's answers on a sample of roll-call votes with the recorded
positions of every member of the parliament.

The engine has two steps:
- [score] computes, for every member, the agreement with the user and how much of
  the user's ballot the member actually covered.
- [ranking::present] turns the scores into a global ranking, sub-group rankings and
  search views with tie-aware rank numbers.

The [builder] module drives a quiz session that collects the answers.
*/

pub mod builder;
mod config;
pub mod manual;
pub mod ranking;

use log::{debug, info};

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

// Agreement credit, counted in half points so that soft abstentions stay exact.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct Credit(u32);

impl Credit {
    const EMPTY: Credit = Credit(0);
    const HALF: Credit = Credit(1);
    const FULL: Credit = Credit(2);

    fn as_points(&self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl AddAssign for Credit {
    fn add_assign(&mut self, rhs: Credit) {
        self.0 += rhs.0;
    }
}

impl Add for Credit {
    type Output = Credit;
    fn add(self: Credit, rhs: Credit) -> Credit {
        Credit(self.0 + rhs.0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
struct Tally {
    matched: Credit,
    overlap: u32,
}

impl Default for Credit {
    fn default() -> Self {
        Credit::EMPTY
    }
}

fn credit(user: Position, member: Position, abstention_soft: bool) -> Credit {
    if user == member {
        Credit::FULL
    } else if abstention_soft && (user == Position::Abstention || member == Position::Abstention)
    {
        Credit::HALF
    } else {
        Credit::EMPTY
    }
}

// Accumulates the agreement of every member over the answered votes.
// Votes that are not in the matrix do not contribute anything.
fn accumulate(
    choices: &UserChoices,
    matrix: &PositionMatrix,
    abstention_soft: bool,
) -> BTreeMap<String, Tally> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for (vote_id, user_pos) in choices.iter() {
        let row = match matrix.row(vote_id) {
            Some(row) => row,
            None => {
                debug!("accumulate: vote {} is not in the matrix, skipping", vote_id);
                continue;
            }
        };
        for (member_id, pos) in row.iter() {
            // The member did not vote.
            let member_pos = match pos {
                Some(p) => *p,
                None => continue,
            };
            let t = tallies.entry(member_id.clone()).or_default();
            t.overlap += 1;
            t.matched += credit(*user_pos, member_pos, abstention_soft);
        }
    }
    tallies
}

/// Computes the affinity of every member with the choices of the user.
///
/// Arguments:
/// * `choices` the positions chosen by the user
/// * `matrix` the recorded positions of the members
/// * `options` the scoring options
///
/// The result is sorted by decreasing affinity. Members with the same affinity are
/// ordered by decreasing overlap, then by id. Members that voted on fewer than
/// `options.min_overlap` of the answered votes are not included.
pub fn score(
    choices: &UserChoices,
    matrix: &PositionMatrix,
    options: &ScoreOptions,
) -> Vec<ScoredMember> {
    if choices.is_empty() {
        debug!("score: no choices, nothing to score");
        return Vec::new();
    }
    info!(
        "score: processing {:?} choices against {:?} votes, options: {:?}",
        choices.len(),
        matrix.len(),
        options
    );

    let tallies = accumulate(choices, matrix, options.abstention_soft);
    debug!("score: {:?} members with at least one position", tallies.len());

    let num_choices = choices.len() as f64;
    let mut res: Vec<ScoredMember> = tallies
        .into_iter()
        .filter(|(_, t)| t.overlap >= options.min_overlap)
        .map(|(member_id, t)| {
            let agreement = if t.overlap == 0 {
                0.0
            } else {
                t.matched.as_points() / t.overlap as f64
            };
            let coverage = t.overlap as f64 / num_choices;
            let affinity = if options.coverage_penalty {
                agreement * coverage
            } else {
                agreement
            };
            ScoredMember {
                member_id,
                affinity,
                overlap: t.overlap,
                coverage,
                agreement,
            }
        })
        .collect();

    // The tallies come ordered by member id and the sort is stable.
    res.sort_by(|a, b| {
        b.affinity
            .partial_cmp(&a.affinity)
            .unwrap_or(Ordering::Equal)
            .then(b.overlap.cmp(&a.overlap))
    });
    info!("score: {:?} members above the overlap threshold", res.len());
    res
}

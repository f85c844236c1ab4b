//! Vote tallies for polls.
//!
//! Counts and percentages are derived from the stored votes on every read;
//! nothing here is cached or persisted.

use serde::{Deserialize, Serialize};

use super::models::Poll;

/// Per-option vote counts and rounded percentages for one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollTally {
    pub total_votes: i64,
    pub vote_counts: Vec<i64>,
    pub vote_percentages: Vec<i64>,
}

impl PollTally {
    /// Tally the given option indices against a poll with `option_count`
    /// options. Indices outside `[0, option_count)` are not attributable to
    /// any option and are left out of both the counts and the total, so the
    /// counts always sum to `total_votes`.
    pub fn compute<I>(option_count: usize, option_indices: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut vote_counts = vec![0i64; option_count];
        for index in option_indices {
            let slot = usize::try_from(index)
                .ok()
                .and_then(|i| vote_counts.get_mut(i));
            if let Some(count) = slot {
                *count += 1;
            }
        }

        let total_votes: i64 = vote_counts.iter().sum();
        let vote_percentages = vote_counts
            .iter()
            .map(|&count| percentage(count, total_votes))
            .collect();

        Self {
            total_votes,
            vote_counts,
            vote_percentages,
        }
    }
}

/// `round(100 * count / total)` with halves rounded up, in integer math.
///
/// Returns 0 when `total` is 0. Percentages of one poll are rounded
/// independently and may sum to 99 or 101.
pub fn percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (200 * count + total) / (2 * total)
}

/// A poll together with its current tally, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollView {
    #[serde(flatten)]
    pub poll: Poll,
    #[serde(flatten)]
    pub tally: PollTally,
}

impl PollView {
    pub fn new<I>(poll: Poll, option_indices: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let tally = PollTally::compute(poll.options.len(), option_indices);
        Self { poll, tally }
    }
}

//! A player's run of rounds between logging in and stopping.
use super::{
    round::RoundResult,
    score_store::{MergeOutcome, ScoreStore},
};
use crate::error::Error;

/// Running tally of one player's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    total: i64,
    rounds: usize,
    catches: Vec<String>,
}
impl Session {
    /// Start an empty session for `username`.
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            total: 0,
            rounds: 0,
            catches: Vec::new(),
        }
    }

    /// Add a finished round. Only catches that scored points are listed in [Session::catches].
    pub fn record(&mut self, result: &RoundResult) {
        self.total += result.points;
        self.rounds += 1;
        if result.points > 0 {
            self.catches.push(result.catch.clone());
        }
    }

    /// Merge the session total into `scores`.
    pub fn finish(self, scores: &ScoreStore) -> Result<MergeOutcome, Error> {
        scores.merge_and_save(&self.username, self.total)
    }

    /// Get the `username` of this [Session].
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Points scored so far.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Rounds played so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Catches that scored points, in the order they were landed.
    pub fn catches(&self) -> &[String] {
        &self.catches
    }
}

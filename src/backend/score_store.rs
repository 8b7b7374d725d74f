//! The high-score file: one headerless `username,best_score` row per player.
use core::fmt;
use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use super::filesystem;
use crate::{error::Error, input_validation::validate_username};

/// What [ScoreStore::merge_and_save] did with a session total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The player had no recorded score; the total was stored.
    FirstScore,
    /// The total beat the player's best and replaced it.
    NewHighScore {
        /// The best score before this session.
        previous: i64,
    },
    /// The total did not beat the player's best. Nothing was written.
    NoImprovement {
        /// The player's unchanged best score.
        best: i64,
    },
}
impl MergeOutcome {
    /// Short machine-readable name of this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeOutcome::FirstScore => "first_score",
            MergeOutcome::NewHighScore { .. } => "new_high_score",
            MergeOutcome::NoImprovement { .. } => "no_improvement",
        }
    }

    /// Message to show the player at the end of a session.
    pub fn message(&self) -> String {
        match self {
            MergeOutcome::FirstScore => String::from("Your first score has been recorded!"),
            MergeOutcome::NewHighScore { previous } => {
                format!("New high score! Your previous best was {previous}.")
            }
            MergeOutcome::NoImprovement { best } => {
                format!("No new high score this time. Your best is still {best}.")
            }
        }
    }
}
impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The [ScoreStore] reads the high-score file fresh for every operation and replaces it whole on
/// every change.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: Utf8PathBuf,
}
impl ScoreStore {
    /// Point a [ScoreStore] at `path`. The file is created on the first save.
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Utf8Path>,
    {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load every player's best score. A missing file is an empty table.
    pub fn load_all(&self) -> Result<BTreeMap<String, i64>, Error> {
        let scores = match filesystem::read_if_exists(&self.path)? {
            Some(contents) => parse_scores(&contents),
            None => BTreeMap::new(),
        };
        debug!(
            path = self.path.as_str(),
            players = scores.len(),
            "loaded scores"
        );
        Ok(scores)
    }

    /// Get a single player's best score.
    pub fn best_score(&self, username: &str) -> Result<Option<i64>, Error> {
        Ok(self.load_all()?.get(username).copied())
    }

    /// All scores, best first. Ties are ordered by username.
    pub fn leaderboard(&self) -> Result<Vec<(String, i64)>, Error> {
        let mut board: Vec<(String, i64)> = self.load_all()?.into_iter().collect();
        board.sort_by(|(name_a, score_a), (name_b, score_b)| {
            score_b.cmp(score_a).then_with(|| name_a.cmp(name_b))
        });
        Ok(board)
    }

    /// Merge a finished session's total into the table.
    ///
    /// The stored best only changes when there is none yet or `session_total` is strictly
    /// greater. Changes replace the whole file atomically.
    pub fn merge_and_save(&self, username: &str, session_total: i64) -> Result<MergeOutcome, Error> {
        validate_username(username)?;
        let mut scores = self.load_all()?;

        let outcome = match scores.get(username).copied() {
            None => MergeOutcome::FirstScore,
            Some(previous) if session_total > previous => MergeOutcome::NewHighScore { previous },
            Some(best) => {
                debug!(username, session_total, best, "score not improved");
                return Ok(MergeOutcome::NoImprovement { best });
            }
        };

        scores.insert(username.to_owned(), session_total);
        filesystem::write_atomic(&self.path, format_scores(&scores))?;
        info!(
            username,
            session_total,
            outcome = outcome.as_str(),
            "saved score"
        );
        Ok(outcome)
    }

    /// Path of the backing score file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn parse_scores(contents: &str) -> BTreeMap<String, i64> {
    let mut scores: BTreeMap<String, i64> = BTreeMap::new();
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let &[username, score] = fields.as_slice() else {
            warn!(line = line_number + 1, "skipping score row without two fields");
            continue;
        };
        let Ok(score) = score.trim().parse::<i64>() else {
            warn!(line = line_number + 1, "skipping score row with non-integer score");
            continue;
        };
        scores
            .entry(username.to_owned())
            .and_modify(|best| *best = (*best).max(score))
            .or_insert(score);
    }
    scores
}

fn format_scores(scores: &BTreeMap<String, i64>) -> String {
    scores
        .iter()
        .fold(String::new(), |acc, (username, score)| {
            acc + &format!("{username},{score}\n")
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn test_store(dir: &TempDir) -> ScoreStore {
        ScoreStore::new(Utf8PathBuf::from_path_buf(dir.path().join("high_scores.csv")).unwrap())
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(store.best_score("angler").unwrap(), None);
    }

    #[test]
    fn first_then_lower() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        assert_eq!(
            store.merge_and_save("angler", 50).unwrap(),
            MergeOutcome::FirstScore
        );
        assert_eq!(
            store.merge_and_save("angler", 30).unwrap(),
            MergeOutcome::NoImprovement { best: 50 }
        );
        assert_eq!(store.best_score("angler").unwrap(), Some(50));
    }

    #[test]
    fn first_then_higher() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.merge_and_save("angler", 50).unwrap();
        let outcome = store.merge_and_save("angler", 80).unwrap();
        assert_eq!(outcome, MergeOutcome::NewHighScore { previous: 50 });
        assert_eq!(outcome.as_str(), "new_high_score");
        assert_eq!(store.best_score("angler").unwrap(), Some(80));
    }

    #[test]
    fn equal_is_not_improvement() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.merge_and_save("angler", 12).unwrap();
        assert_eq!(
            store.merge_and_save("angler", 12).unwrap().as_str(),
            "no_improvement"
        );
    }

    #[test]
    fn other_players_survive_rewrite() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "bream,7\nangler,3\n").unwrap();

        store.merge_and_save("angler", 9).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "angler,9\nbream,7\n"
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let scores = parse_scores("angler,10\r\nno-score\nthree,fields,here\nbream,lots\n\ncod, -4\n");
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["angler"], 10);
        assert_eq!(scores["cod"], -4);
    }

    #[test]
    fn repeated_rows_keep_best() {
        let scores = parse_scores("angler,10\nangler,40\nangler,20\n");
        assert_eq!(scores["angler"], 40);
    }

    #[test]
    fn leaderboard_order() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "cod,5\nangler,9\nbream,9\n").unwrap();

        assert_eq!(
            store.leaderboard().unwrap(),
            vec![
                (String::from("angler"), 9),
                (String::from("bream"), 9),
                (String::from("cod"), 5),
            ]
        );
    }

    #[test]
    fn negative_first_score_is_recorded() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert_eq!(
            store.merge_and_save("angler", -1).unwrap(),
            MergeOutcome::FirstScore
        );
        assert_eq!(store.best_score("angler").unwrap(), Some(-1));
    }
}

//! High score leaderboard system
//!
//! One best result per username. Ordered by score, then by collected count.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub username: String,
    /// Points banked
    pub score: u32,
    /// Orbs deposited
    pub count: u32,
}

impl HighScoreEntry {
    /// True when (score, count) strictly beats this entry
    pub fn is_beaten_by(&self, score: u32, count: u32) -> bool {
        score > self.score || (score == self.score && count > self.count)
    }
}

/// Leaderboard ordering: score desc, then count desc
fn leaderboard_order(a: &HighScoreEntry, b: &HighScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then(b.count.cmp(&a.count))
}

/// Persistent best-score storage
pub trait ScoreStore {
    /// Record a result, keeping the better of this and any existing entry.
    ///
    /// Returns whether the stored entry changed.
    fn upsert_best(&mut self, username: &str, score: u32, count: u32) -> Result<bool, StoreError>;

    /// Every entry, best first
    fn list_all(&self) -> Result<Vec<HighScoreEntry>, StoreError>;
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Keep the better of the stored entry and (score, count).
    /// Returns true if the leaderboard changed.
    pub fn upsert_best(&mut self, username: &str, score: u32, count: u32) -> bool {
        let changed = match self.entries.iter_mut().find(|e| e.username == username) {
            Some(entry) if entry.is_beaten_by(score, count) => {
                entry.score = score;
                entry.count = count;
                true
            }
            Some(_) => false,
            None => {
                self.entries.push(HighScoreEntry {
                    username: username.to_string(),
                    score,
                    count,
                });
                true
            }
        };
        if changed {
            self.sort();
        }
        changed
    }

    /// Restore leaderboard order (stable for exact ties)
    pub fn sort(&mut self) {
        self.entries.sort_by(leaderboard_order);
    }

    /// Entries, best first
    pub fn list_all(&self) -> Vec<HighScoreEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(leaderboard_order);
        entries
    }

    /// 1-indexed rank of `username`, if listed
    pub fn rank_of(&self, username: &str) -> Option<usize> {
        self.list_all()
            .iter()
            .position(|e| e.username == username)
            .map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.score).max()
    }
}

/// In-memory store, for tests and runs without a score file
impl ScoreStore for HighScores {
    fn upsert_best(&mut self, username: &str, score: u32, count: u32) -> Result<bool, StoreError> {
        Ok(HighScores::upsert_best(self, username, score, count))
    }

    fn list_all(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(HighScores::list_all(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_result_inserts() {
        let mut scores = HighScores::new();
        assert!(scores.is_empty());
        assert!(scores.upsert_best("ann", 10, 2));
        assert_eq!(scores.top_score(), Some(10));
        assert_eq!(scores.rank_of("ann"), Some(1));
        assert_eq!(scores.rank_of("bob"), None);
    }

    #[test]
    fn test_only_better_results_replace() {
        let mut scores = HighScores::new();
        scores.upsert_best("ann", 10, 2);

        assert!(!scores.upsert_best("ann", 9, 50), "lower score never replaces");
        assert!(!scores.upsert_best("ann", 10, 2), "identical result is not an improvement");
        assert!(!scores.upsert_best("ann", 10, 1));
        assert!(scores.upsert_best("ann", 10, 3), "equal score, more orbs");
        assert!(scores.upsert_best("ann", 11, 0));

        assert_eq!(scores.entries.len(), 1);
        assert_eq!(scores.entries[0].score, 11);
        assert_eq!(scores.entries[0].count, 0);
    }

    #[test]
    fn test_ordering_by_score_then_count() {
        let mut scores = HighScores::new();
        scores.upsert_best("low", 5, 9);
        scores.upsert_best("tie_few", 20, 1);
        scores.upsert_best("top", 30, 0);
        scores.upsert_best("tie_many", 20, 4);

        let names: Vec<String> = scores.list_all().into_iter().map(|e| e.username).collect();
        assert_eq!(names, vec!["top", "tie_many", "tie_few", "low"]);
        assert_eq!(scores.rank_of("tie_few"), Some(3));
    }

    #[test]
    fn test_store_trait_delegates() {
        let mut store: Box<dyn ScoreStore> = Box::new(HighScores::new());
        assert!(store.upsert_best("ann", 3, 1).unwrap());
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}

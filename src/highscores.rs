//! Local high score bookkeeping
//!
//! Tracks the best floored score plus the top 10 sessions, persisted through
//! the [`JsonStore`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::JsonStore;
use crate::sim::SessionSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub score: u64,
    pub obstacles_avoided: u32,
    pub duration_seconds: u64,
    /// Unix timestamp (ms) when the session ended
    pub timestamp: f64,
}

/// Local high score table
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HighScores {
    /// Best floored score ever recorded
    pub best: u64,
    /// Best sessions, sorted descending by score
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "high_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known best score (e.g. imported from an older save)
    pub fn with_best(best: u64) -> Self {
        Self {
            best,
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished session.
    ///
    /// Returns true if it set a new best score.
    pub fn record(&mut self, summary: &SessionSummary, timestamp: f64) -> bool {
        let new_best = summary.score > self.best;
        if new_best {
            self.best = summary.score;
            log::info!("New high score: {}!", self.best);
        }

        if self.qualifies(summary.score) {
            let entry = HighScoreEntry {
                score: summary.score,
                obstacles_avoided: summary.obstacles_avoided,
                duration_seconds: summary.duration_seconds,
                timestamp,
            };
            let pos = self
                .entries
                .iter()
                .position(|e| summary.score > e.score)
                .unwrap_or(self.entries.len());
            self.entries.insert(pos, entry);
            self.entries.truncate(MAX_HIGH_SCORES);
        }

        new_best
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load high scores, starting fresh on any error
    pub fn load(store: &JsonStore) -> Self {
        match store.load::<HighScores>(Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores (best {})", scores.entries.len(), scores.best);
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to load high scores, starting fresh: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &JsonStore) -> Result<()> {
        store.save(Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u64) -> SessionSummary {
        SessionSummary {
            score,
            obstacles_avoided: 1,
            duration_seconds: 5,
            peak_speed: 3.0,
        }
    }

    #[test]
    fn test_record_updates_best_only_when_exceeded() {
        let mut scores = HighScores::with_best(100);
        assert!(!scores.record(&summary(100), 0.0));
        assert_eq!(scores.best, 100);
        assert!(scores.record(&summary(250), 1.0));
        assert_eq!(scores.best, 250);
        assert!(!scores.record(&summary(50), 2.0));
        assert_eq!(scores.best, 250);
    }

    #[test]
    fn test_entries_sorted_and_capped() {
        let mut scores = HighScores::new();
        for s in 1..=15u64 {
            scores.record(&summary(s * 10), s as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[0].score, 150);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert!(!scores.qualifies(60));
        assert!(scores.qualifies(61));
    }

    #[test]
    fn test_zero_score_not_listed() {
        let mut scores = HighScores::new();
        scores.record(&summary(0), 0.0);
        assert!(scores.is_empty());
        assert_eq!(scores.best, 0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let mut scores = HighScores::new();
        scores.record(&summary(321), 42.0);
        scores.save(&store).unwrap();
        assert_eq!(HighScores::load(&store), scores);
    }
}

//! In-process global leaderboard.
//!
//! Ranking follows the score server: every accepted submission is stored,
//! its rank is one more than the number of strictly higher scores, and rank 1
//! is a new global record.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use super::{ScoringError, ScoringService, SessionSubmission, SubmissionReceipt};
use crate::platform::{Clock, SystemClock};

/// Default number of rows returned by [`LocalLeaderboard::top`]
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
/// Default number of rows returned by [`LocalLeaderboard::personal_bests`]
pub const DEFAULT_PERSONAL_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_name: String,
    pub score: u64,
    pub obstacles_avoided: u32,
    pub duration_seconds: u64,
    pub peak_speed: f32,
    /// Unix timestamp (ms) when the score was accepted
    pub submitted_at: f64,
}

#[derive(Debug)]
struct StoredScore {
    submission: SessionSubmission,
    submitted_at: f64,
}

pub struct LocalLeaderboard {
    records: RwLock<Vec<StoredScore>>,
    clock: Arc<dyn Clock>,
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self {
            records: RwLock::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for LocalLeaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLeaderboard").finish_non_exhaustive()
    }
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp accepted scores with `clock` instead of the system time
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Highest scores first, ranked by position
    pub async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let records = self.records.read().await;
        let mut sorted: Vec<&StoredScore> = records.iter().collect();
        sorted.sort_by(|a, b| b.submission.score.cmp(&a.submission.score));
        sorted
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| entry(i as u32 + 1, s))
            .collect()
    }

    /// A player's highest scores, best first, each with its global rank
    pub async fn personal_bests(&self, player_name: &str, limit: usize) -> Vec<LeaderboardEntry> {
        let records = self.records.read().await;
        let mut own: Vec<&StoredScore> = records
            .iter()
            .filter(|s| s.submission.player_name == player_name)
            .collect();
        // Stable sort keeps the earlier submission first among equal scores
        own.sort_by(|a, b| b.submission.score.cmp(&a.submission.score));
        own.into_iter()
            .take(limit)
            .map(|s| entry(rank_of(&records, s.submission.score), s))
            .collect()
    }

    /// A player's best submission with its global rank
    pub async fn personal_best(&self, player_name: &str) -> Option<LeaderboardEntry> {
        self.personal_bests(player_name, 1).await.into_iter().next()
    }
}

fn entry(rank: u32, s: &StoredScore) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        player_name: s.submission.player_name.clone(),
        score: s.submission.score,
        obstacles_avoided: s.submission.obstacles_avoided,
        duration_seconds: s.submission.duration_seconds,
        peak_speed: s.submission.peak_speed,
        submitted_at: s.submitted_at,
    }
}

fn rank_of(records: &[StoredScore], score: u64) -> u32 {
    records.iter().filter(|s| s.submission.score > score).count() as u32 + 1
}

#[async_trait]
impl ScoringService for LocalLeaderboard {
    async fn submit_session(
        &self,
        submission: SessionSubmission,
    ) -> Result<SubmissionReceipt, ScoringError> {
        if submission.player_name.trim().is_empty() {
            return Err(ScoringError::Rejected("missing player name".into()));
        }
        if !submission.peak_speed.is_finite() || submission.peak_speed < 0.0 {
            return Err(ScoringError::Rejected(format!(
                "invalid peak speed {}",
                submission.peak_speed
            )));
        }

        let submitted_at = self.clock.now_ms();
        let mut records = self.records.write().await;
        let global_rank = rank_of(&records, submission.score);
        log::info!(
            "New score: {} scored {} (rank #{})",
            submission.player_name,
            submission.score,
            global_rank
        );
        records.push(StoredScore {
            submission,
            submitted_at,
        });

        Ok(SubmissionReceipt {
            accepted: true,
            global_rank,
            is_new_global_record: global_rank == 1,
        })
    }
}

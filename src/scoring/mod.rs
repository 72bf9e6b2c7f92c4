//! Remote scoring service contract
//!
//! A finished session is reported to a [`ScoringService`] exactly once, on a
//! background task. The simulation never waits for the result: a slow or
//! failing service cannot delay the next tick, the local high score, or a
//! restart.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::sim::SessionSummary;

pub mod leaderboard;

pub use leaderboard::{LeaderboardEntry, LocalLeaderboard};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("scoring service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed scoring response")]
    Malformed(#[source] serde_json::Error),

    #[error("scoring response carried invalid global rank {0}")]
    InvalidRank(u32),
}

/// Wire form of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubmission {
    pub player_name: String,
    pub score: u64,
    pub obstacles_avoided: u32,
    #[serde(rename = "gameDuration")]
    pub duration_seconds: u64,
    #[serde(rename = "maxSpeed")]
    pub peak_speed: f32,
}

impl SessionSubmission {
    pub fn new(player_name: impl Into<String>, summary: &SessionSummary) -> Self {
        Self {
            player_name: player_name.into(),
            score: summary.score,
            obstacles_avoided: summary.obstacles_avoided,
            duration_seconds: summary.duration_seconds,
            peak_speed: summary.peak_speed,
        }
    }
}

/// Service answer to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    #[serde(rename = "success")]
    pub accepted: bool,
    /// 1-based position among all stored scores
    pub global_rank: u32,
    #[serde(rename = "isNewRecord")]
    pub is_new_global_record: bool,
}

impl SubmissionReceipt {
    /// Parse and validate a JSON response body
    pub fn from_json(body: &str) -> Result<Self, ScoringError> {
        let receipt: Self = serde_json::from_str(body).map_err(ScoringError::Malformed)?;
        receipt.validate()
    }

    /// A receipt counts only if the service accepted the score with a real rank
    pub fn validate(self) -> Result<Self, ScoringError> {
        if !self.accepted {
            return Err(ScoringError::Rejected(
                "service reported an unsuccessful submission".into(),
            ));
        }
        if self.global_rank == 0 {
            return Err(ScoringError::InvalidRank(self.global_rank));
        }
        Ok(self)
    }
}

/// Remote ranking service that accepts finished sessions
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn submit_session(
        &self,
        submission: SessionSubmission,
    ) -> Result<SubmissionReceipt, ScoringError>;
}

/// Fire-and-forget reporter of session summaries
#[derive(Clone)]
pub struct SummaryReporter {
    service: Arc<dyn ScoringService>,
    runtime: Handle,
}

impl std::fmt::Debug for SummaryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryReporter").finish_non_exhaustive()
    }
}

impl SummaryReporter {
    pub fn new(service: Arc<dyn ScoringService>, runtime: Handle) -> Self {
        Self { service, runtime }
    }

    /// Reporter bound to the runtime the caller is running in, if any
    pub fn on_current_runtime(service: Arc<dyn ScoringService>) -> Option<Self> {
        Handle::try_current().ok().map(|runtime| Self::new(service, runtime))
    }

    /// Spawn one best-effort submission.
    ///
    /// Anonymous sessions are skipped (`None`). The task resolves to the
    /// receipt, or `None` if the service failed; failures are only logged.
    pub fn report(
        &self,
        player_name: Option<&str>,
        summary: &SessionSummary,
    ) -> Option<JoinHandle<Option<SubmissionReceipt>>> {
        let Some(name) = player_name else {
            log::debug!("Anonymous session, skipping score submission");
            return None;
        };

        let submission = SessionSubmission::new(name, summary);
        let service = Arc::clone(&self.service);
        Some(self.runtime.spawn(async move {
            let result = service
                .submit_session(submission)
                .await
                .and_then(SubmissionReceipt::validate);
            match result {
                Ok(receipt) => {
                    if receipt.is_new_global_record {
                        log::info!("NEW GLOBAL RECORD!");
                    }
                    log::info!("Score submitted! Global rank: #{}", receipt.global_rank);
                    Some(receipt)
                }
                Err(e) => {
                    log::warn!("Failed to submit score: {}", e);
                    None
                }
            }
        }))
    }
}

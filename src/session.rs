//! Session controller
//!
//! Owns the single [`SessionState`] and drives it through
//! Waiting -> Playing -> GameOver -> Waiting. All mutation goes through
//! `&mut self`, so two ticks can never run at once; hosts that share a
//! controller between threads wrap it in a mutex.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::highscores::HighScores;
use crate::persistence::JsonStore;
use crate::platform::{Clock, SystemClock};
use crate::scoring::{SubmissionReceipt, SummaryReporter};
use crate::settings::{DifficultyPreference, Settings};
use crate::sim::{GameEvent, SessionPhase, SessionState, SessionSummary, Snapshot, TickInput, tick};

/// Handle to an in-flight score submission
pub type PendingSubmission = JoinHandle<Option<SubmissionReceipt>>;

pub struct SessionController {
    state: SessionState,
    settings: Settings,
    high_scores: HighScores,
    clock: Arc<dyn Clock>,
    reporter: Option<SummaryReporter>,
    store: Option<JsonStore>,
    high_scores_dirty: bool,
    last_summary: Option<SessionSummary>,
    new_high_score: bool,
    pending_submission: Option<PendingSubmission>,
}

impl SessionController {
    /// Controller in `Waiting` with a seeded obstacle generator.
    ///
    /// No reporter, no persistence and the system clock until configured.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let state = SessionState::new(seed, settings.base_speed());
        Self {
            state,
            settings,
            high_scores: HighScores::new(),
            clock: Arc::new(SystemClock),
            reporter: None,
            store: None,
            high_scores_dirty: false,
            last_summary: None,
            new_high_score: false,
            pending_submission: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_reporter(mut self, reporter: SummaryReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    /// Target for [`Self::persist_high_scores`]
    pub fn with_store(mut self, store: JsonStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn high_score(&self) -> u64 {
        self.high_scores.best
    }

    /// Summary of the most recent finished play
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Whether the most recent finished play set a new local best
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    /// Take the handle of the last submission, if one is still held
    pub fn take_pending_submission(&mut self) -> Option<PendingSubmission> {
        self.pending_submission.take()
    }

    /// Replace the settings. Speed changes apply from the next play.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if self.state.phase == SessionPhase::Waiting {
            self.state.reset(self.settings.base_speed());
        }
        log::info!(
            "Applied difficulty: {}",
            self.settings.difficulty_preference.as_str()
        );
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyPreference) {
        let mut settings = self.settings.clone();
        settings.difficulty_preference = difficulty;
        self.apply_settings(settings);
    }

    /// Configure from a raw speed multiplier; unsupported values mean normal
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.set_difficulty(DifficultyPreference::from_multiplier(multiplier));
    }

    /// The single jump/start/restart input
    pub fn request_jump(&mut self) -> SessionPhase {
        match self.state.phase {
            SessionPhase::Waiting => self.start(),
            SessionPhase::Playing => {
                if self.state.actor.jump() {
                    log::trace!("Jump");
                }
            }
            SessionPhase::GameOver => self.reset(),
        }
        self.state.phase
    }

    /// Reset and start a new play immediately
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    fn start(&mut self) {
        let now = self.clock.now_ms();
        self.state.begin(self.settings.base_speed(), now);
        self.new_high_score = false;
        log::info!(
            "Game started (base speed {:.1})",
            self.state.base_speed
        );
    }

    fn reset(&mut self) {
        self.state.reset(self.settings.base_speed());
        log::info!("Game reset");
    }

    /// Advance one frame.
    ///
    /// A jump outside of Playing is a start/restart input and is not also
    /// applied as a jump.
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut input = *input;
        if input.jump && self.state.phase != SessionPhase::Playing {
            self.request_jump();
            input.jump = false;
        }

        let events = tick(&mut self.state, &input);
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::Collided { .. }))
        {
            self.finish();
        }
        events
    }

    /// Write high scores recorded since the last call to the store.
    ///
    /// The tick itself never touches the disk; hosts call this between ticks.
    /// Returns whether anything was written.
    pub fn persist_high_scores(&mut self) -> crate::Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        if !self.high_scores_dirty {
            return Ok(false);
        }
        self.high_scores.save(store)?;
        self.high_scores_dirty = false;
        Ok(true)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.high_score())
    }

    /// Bookkeeping for the Playing -> GameOver transition
    fn finish(&mut self) {
        let now = self.clock.now_ms();
        let summary = self.state.summary(now);
        log::info!(
            "Game Over! Final Score: {} ({} obstacles avoided)",
            summary.score,
            summary.obstacles_avoided
        );

        self.new_high_score = self.high_scores.record(&summary, now);
        self.high_scores_dirty = true;

        if let Some(reporter) = &self.reporter {
            // An older submission keeps running detached
            self.pending_submission =
                reporter.report(self.settings.player_name.as_deref(), &summary);
        }
        self.last_summary = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::consts::*;
    use crate::platform::ManualClock;
    use crate::scoring::{ScoringError, ScoringService, SessionSubmission};
    use crate::sim::ObstacleKind;

    #[derive(Default)]
    struct RecordingService {
        submissions: Mutex<Vec<SessionSubmission>>,
    }

    #[async_trait]
    impl ScoringService for RecordingService {
        async fn submit_session(
            &self,
            submission: SessionSubmission,
        ) -> Result<SubmissionReceipt, ScoringError> {
            self.submissions.lock().unwrap().push(submission);
            Ok(SubmissionReceipt {
                accepted: true,
                global_rank: 1,
                is_new_global_record: true,
            })
        }
    }

    struct DownService;

    #[async_trait]
    impl ScoringService for DownService {
        async fn submit_session(
            &self,
            _submission: SessionSubmission,
        ) -> Result<SubmissionReceipt, ScoringError> {
            Err(ScoringError::Unavailable("503 Service Unavailable".into()))
        }
    }

    struct HangingService;

    #[async_trait]
    impl ScoringService for HangingService {
        async fn submit_session(
            &self,
            _submission: SessionSubmission,
        ) -> Result<SubmissionReceipt, ScoringError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(ScoringError::Unavailable("timed out".into()))
        }
    }

    fn named_settings() -> Settings {
        let mut settings = Settings::default();
        settings.set_player_name("rex").unwrap();
        settings
    }

    /// Put an obstacle where the next tick will hit the grounded actor
    fn place_hazard(controller: &mut SessionController) {
        controller.state.field.spawn(ObstacleKind::Wide);
        let last = controller.state.field.obstacles.len() - 1;
        controller.state.field.obstacles[last].pos.x = ACTOR_X + ACTOR_WIDTH + 1.0;
    }

    fn crash(controller: &mut SessionController) -> Vec<GameEvent> {
        place_hazard(controller);
        controller.tick(&TickInput::default())
    }

    #[test]
    fn test_waiting_to_playing() {
        let clock = ManualClock::new(5_000);
        let mut controller = SessionController::new(1, Settings::default())
            .with_clock(Arc::new(clock.clone()));
        assert_eq!(controller.phase(), SessionPhase::Waiting);

        // Ticks do nothing while waiting
        for _ in 0..10 {
            controller.tick(&TickInput::default());
        }
        assert_eq!(controller.state().score, 0.0);

        assert_eq!(controller.request_jump(), SessionPhase::Playing);
        assert_eq!(controller.state().started_at_ms, 5_000.0);
        assert_eq!(controller.state().score, 0.0);
        assert!(!controller.state().actor.airborne, "start input is not a jump");
    }

    #[test]
    fn test_start_via_tick_input_does_not_jump() {
        let mut controller = SessionController::new(1, Settings::default());
        let events = controller.tick(&TickInput {
            jump: true,
            autopilot: false,
        });
        assert_eq!(controller.phase(), SessionPhase::Playing);
        assert!(!events.contains(&GameEvent::Jumped));
        assert_eq!(controller.state().time_ticks, 1);
    }

    #[test]
    fn test_jump_requests_while_airborne_are_ignored() {
        let mut controller = SessionController::new(1, Settings::default());
        controller.request_jump();
        controller.request_jump();
        assert_eq!(controller.state().actor.vel_y, JUMP_IMPULSE);
        controller.request_jump();
        assert_eq!(controller.state().actor.vel_y, JUMP_IMPULSE);

        controller.tick(&TickInput::default());
        controller.request_jump();
        assert!((controller.state().actor.vel_y - (JUMP_IMPULSE + GRAVITY)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_summary_submitted_on_game_over() {
        let clock = ManualClock::new(0);
        let service = Arc::new(RecordingService::default());
        let reporter = SummaryReporter::on_current_runtime(service.clone()).unwrap();
        let mut controller = SessionController::new(1, named_settings())
            .with_clock(Arc::new(clock.clone()))
            .with_reporter(reporter);

        controller.request_jump();
        controller.state.score = 250.7;
        controller.state.obstacles_avoided = 3;
        clock.advance_ms(42_300);

        let events = crash(&mut controller);
        assert!(matches!(events.last(), Some(GameEvent::Collided { .. })));
        assert_eq!(controller.phase(), SessionPhase::GameOver);

        let summary = *controller.last_summary().unwrap();
        assert_eq!(summary.score, 250);
        assert_eq!(summary.obstacles_avoided, 3);
        assert_eq!(summary.duration_seconds, 42);
        assert_eq!(summary.peak_speed, BASE_SCROLL_SPEED);

        let receipt = controller.take_pending_submission().unwrap().await.unwrap();
        assert!(receipt.is_some());
        {
            let submissions = service.submissions.lock().unwrap();
            assert_eq!(submissions.len(), 1);
            assert_eq!(submissions[0].player_name, "rex");
            assert_eq!(submissions[0].score, 250);
            assert_eq!(submissions[0].obstacles_avoided, 3);
            assert_eq!(submissions[0].duration_seconds, 42);
        }

        controller.restart();
        assert_eq!(controller.phase(), SessionPhase::Playing);
        assert_eq!(controller.state().score, 0.0);
        assert_eq!(controller.state().obstacles_avoided, 0);
        assert!(controller.state().field.is_empty());
    }

    #[test]
    fn test_game_over_to_waiting_to_playing() {
        let mut controller = SessionController::new(1, Settings::default());
        controller.request_jump();
        controller.state.score = 30.0;
        crash(&mut controller);
        assert_eq!(controller.phase(), SessionPhase::GameOver);

        // Frozen while game over
        for _ in 0..5 {
            controller.tick(&TickInput::default());
        }
        assert_eq!(controller.state().score, 30.0);

        assert_eq!(controller.request_jump(), SessionPhase::Waiting);
        assert_eq!(controller.state().score, 0.0);
        assert!(controller.state().field.is_empty());
        assert_eq!(controller.state().actor.pos.y, ACTOR_GROUND_Y);

        assert_eq!(controller.request_jump(), SessionPhase::Playing);
    }

    #[tokio::test]
    async fn test_scoring_outage_does_not_affect_local_state() {
        let reporter = SummaryReporter::on_current_runtime(Arc::new(DownService)).unwrap();
        let mut controller = SessionController::new(1, named_settings())
            .with_high_scores(HighScores::with_best(100))
            .with_reporter(reporter);

        controller.request_jump();
        controller.state.score = 250.0;
        crash(&mut controller);

        assert_eq!(controller.phase(), SessionPhase::GameOver);
        assert_eq!(controller.high_score(), 250);
        assert!(controller.is_new_high_score());

        let receipt = controller.take_pending_submission().unwrap().await.unwrap();
        assert!(receipt.is_none());
        assert_eq!(controller.high_score(), 250);
        assert_eq!(controller.request_jump(), SessionPhase::Waiting);
    }

    #[tokio::test]
    async fn test_restart_not_blocked_by_slow_submission() {
        let reporter = SummaryReporter::on_current_runtime(Arc::new(HangingService)).unwrap();
        let mut controller = SessionController::new(1, named_settings()).with_reporter(reporter);

        controller.request_jump();
        crash(&mut controller);
        let pending = controller.take_pending_submission().unwrap();

        controller.restart();
        for _ in 0..10 {
            controller.tick(&TickInput::default());
        }
        assert_eq!(controller.phase(), SessionPhase::Playing);
        assert!(!pending.is_finished());
        pending.abort();
    }

    #[tokio::test]
    async fn test_anonymous_sessions_not_submitted() {
        let service = Arc::new(RecordingService::default());
        let reporter = SummaryReporter::on_current_runtime(service.clone()).unwrap();
        let mut controller = SessionController::new(1, Settings::default()).with_reporter(reporter);

        controller.request_jump();
        controller.state.score = 12.0;
        crash(&mut controller);

        assert!(controller.take_pending_submission().is_none());
        assert!(service.submissions.lock().unwrap().is_empty());
        assert_eq!(controller.high_score(), 12);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut controller =
            SessionController::new(1, Settings::default()).with_high_scores(HighScores::with_best(100));
        controller.request_jump();
        controller.state.score = 99.9;
        crash(&mut controller);
        assert_eq!(controller.high_score(), 100);
        assert!(!controller.is_new_high_score());
    }

    #[test]
    fn test_high_scores_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let mut controller = SessionController::new(1, Settings::default()).with_store(store.clone());
        controller.request_jump();
        controller.state.score = 77.0;
        crash(&mut controller);

        // Game over leaves the disk alone until the host asks
        assert!(HighScores::load(&store).is_empty());
        assert!(controller.persist_high_scores().unwrap());
        assert_eq!(HighScores::load(&store).best, 77);
        assert!(!controller.persist_high_scores().unwrap());
    }

    #[test]
    fn test_persist_without_store_is_a_no_op() {
        let mut controller = SessionController::new(1, Settings::default());
        controller.request_jump();
        controller.state.score = 12.0;
        crash(&mut controller);
        assert!(!controller.persist_high_scores().unwrap());
        assert_eq!(controller.high_score(), 12);
    }

    #[test]
    fn test_difficulty_settings_apply_at_start() {
        let mut controller = SessionController::new(1, Settings::default());
        controller.set_difficulty(DifficultyPreference::Hard);
        controller.request_jump();
        assert!((controller.state().field.scroll_speed - 3.9).abs() < 1e-6);
        assert!((controller.state().peak_speed - 3.9).abs() < 1e-6);

        // Mid-play changes wait for the next play
        controller.set_speed_multiplier(0.8);
        assert!((controller.state().field.scroll_speed - 3.9).abs() < 1e-6);
        controller.restart();
        assert!((controller.state().field.scroll_speed - 2.4).abs() < 1e-6);

        controller.set_speed_multiplier(7.0);
        controller.restart();
        assert_eq!(controller.state().field.scroll_speed, BASE_SCROLL_SPEED);
    }

    #[test]
    fn test_snapshot_exposes_high_score() {
        let controller =
            SessionController::new(1, Settings::default()).with_high_scores(HighScores::with_best(5));
        let snap = controller.snapshot();
        assert_eq!(snap.phase, SessionPhase::Waiting);
        assert_eq!(snap.high_score, 5);
        assert_eq!(snap.score, 0);
    }
}

//! Dino Runner entry point
//!
//! Headless native driver: plays a few autopilot sessions as fast as the
//! simulation allows, prints a text frame every few seconds of game time and
//! reports scores to an in-process leaderboard.
//!
//! Usage: `dino-runner [seed] [player-name] [sessions]`

use std::sync::Arc;

use dino_runner::consts::*;
use dino_runner::persistence::JsonStore;
use dino_runner::platform::ManualClock;
use dino_runner::scoring::leaderboard::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_PERSONAL_LIMIT};
use dino_runner::scoring::{LocalLeaderboard, SummaryReporter};
use dino_runner::sim::{SessionPhase, Snapshot, TickInput};
use dino_runner::{HighScores, SessionController, Settings};

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_SESSIONS: u32 = 3;
/// Print a frame every N ticks (4 seconds of game time)
const FRAME_EVERY: u64 = 4 * TICKS_PER_SECOND as u64;
/// Text frame width in columns
const FRAME_COLUMNS: usize = 80;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let player_name = args.next();
    let sessions = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSIONS);

    let data_dir = std::env::var("DINO_DATA_DIR").unwrap_or_else(|_| ".dino-runner".to_string());
    let store = JsonStore::new(data_dir);
    log::info!("Data directory: {}", store.dir().display());

    let mut settings = Settings::load(&store);
    if let Some(name) = player_name {
        match settings.set_player_name(&name) {
            Ok(()) => {
                if let Err(e) = settings.save(&store) {
                    log::warn!("Failed to save settings: {}", e);
                }
            }
            Err(e) => log::warn!("Ignoring player name: {}", e),
        }
    }

    // Game time advances with ticks, not with how fast we run them
    let clock = ManualClock::new(0);
    let leaderboard = Arc::new(LocalLeaderboard::new().with_clock(Arc::new(clock.clone())));
    let reporter = SummaryReporter::new(leaderboard.clone(), tokio::runtime::Handle::current());

    let mut controller = SessionController::new(seed, settings)
        .with_clock(Arc::new(clock.clone()))
        .with_high_scores(HighScores::load(&store))
        .with_store(store)
        .with_reporter(reporter);

    let mut total_ticks: u64 = 0;
    for session in 1..=sessions {
        controller.restart();
        // The autopilot gives up after a while so every session ends
        let autopilot_ticks = 20 * TICKS_PER_SECOND as u64 * session as u64;
        let mut ticks: u64 = 0;

        while controller.phase() == SessionPhase::Playing {
            let input = TickInput {
                jump: false,
                autopilot: ticks < autopilot_ticks,
            };
            controller.tick(&input);
            ticks += 1;
            total_ticks += 1;
            clock.set_ms(total_ticks * 1000 / TICKS_PER_SECOND as u64);

            if ticks % FRAME_EVERY == 0 {
                println!("{}", render_frame(&controller.snapshot()));
            }
        }

        println!("{}", render_frame(&controller.snapshot()));
        if let Some(summary) = controller.last_summary() {
            println!(
                "Session {}: score {} | avoided {} | {}s | peak speed {:.1}{}",
                session,
                summary.score,
                summary.obstacles_avoided,
                summary.duration_seconds,
                summary.peak_speed,
                if controller.is_new_high_score() {
                    " | NEW HIGH SCORE!"
                } else {
                    ""
                }
            );
        }

        if let Err(e) = controller.persist_high_scores() {
            log::warn!("Failed to save high scores: {}", e);
        }

        // Only the demo waits, so the leaderboard below is complete
        if let Some(pending) = controller.take_pending_submission() {
            if let Err(e) = pending.await {
                log::warn!("Score submission task failed: {}", e);
            }
        }
    }

    println!("High score: {}", controller.high_score());
    let top = leaderboard.top(DEFAULT_LEADERBOARD_LIMIT).await;
    if top.is_empty() {
        println!("Leaderboard is empty (set a player name to submit scores)");
    }
    for entry in top {
        println!(
            "#{:<3} {:<20} {:>6}  at {:>4}s",
            entry.rank,
            entry.player_name,
            entry.score,
            (entry.submitted_at / 1000.0).floor()
        );
    }

    if let Some(name) = controller.settings().player_name.as_deref() {
        println!("Personal bests for {}:", name);
        for entry in leaderboard.personal_bests(name, DEFAULT_PERSONAL_LIMIT).await {
            println!("  {:>6} (global #{})", entry.score, entry.rank);
        }
    }
}

/// Three-line text rendering of a snapshot
fn render_frame(snapshot: &Snapshot) -> String {
    let column = |x: f32| ((x / FIELD_WIDTH) * FRAME_COLUMNS as f32).floor() as isize;

    let mut air = vec![' '; FRAME_COLUMNS];
    let mut ground = vec!['_'; FRAME_COLUMNS];

    for obstacle in &snapshot.obstacles {
        let start = column(obstacle.pos.x);
        let end = column(obstacle.pos.x + obstacle.size.x);
        for c in start..=end {
            if (0..FRAME_COLUMNS as isize).contains(&c) {
                ground[c as usize] = '#';
            }
        }
    }

    let actor_col = column(snapshot.actor.pos.x).clamp(0, FRAME_COLUMNS as isize - 1) as usize;
    let marker = match snapshot.phase {
        SessionPhase::GameOver => 'X',
        _ => 'D',
    };
    if snapshot.actor.airborne {
        air[actor_col] = marker;
    } else {
        ground[actor_col] = marker;
    }

    format!(
        "score {:>5}  hi {:>5}  lvl {}  speed {:.1}  {:?}\n{}\n{}",
        snapshot.score,
        snapshot.high_score,
        snapshot.level,
        snapshot.scroll_speed,
        snapshot.phase,
        air.into_iter().collect::<String>(),
        ground.into_iter().collect::<String>()
    )
}

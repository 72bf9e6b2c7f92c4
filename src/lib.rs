//! Dino Runner - A side-scrolling obstacle runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, difficulty)
//! - `session`: Session state machine, high-score bookkeeping, score reporting
//! - `scoring`: Remote scoring service contract and an in-process leaderboard
//! - `platform`: Clock abstraction
//! - `persistence`: JSON document store for settings and high scores

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use session::SessionController;
pub use settings::{DifficultyPreference, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal host tick rate (one simulation step per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Visible field width; obstacles spawn at this x
    pub const FIELD_WIDTH: f32 = 800.0;
    /// Top of the visible field
    pub const FIELD_TOP: f32 = 0.0;
    /// Ground line that obstacle bases rest on
    pub const GROUND_LINE: f32 = 180.0;

    /// Actor defaults - fixed horizontal position, the world scrolls instead
    pub const ACTOR_X: f32 = 50.0;
    pub const ACTOR_WIDTH: f32 = 40.0;
    pub const ACTOR_HEIGHT: f32 = 40.0;
    /// Resting y of the actor's top edge
    pub const ACTOR_GROUND_Y: f32 = 150.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.6;
    /// Vertical velocity applied by a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Continuous score per Playing tick
    pub const SCORE_PER_TICK: f64 = 0.1;
    /// Bonus for each obstacle that leaves the field
    pub const AVOID_BONUS: f64 = 10.0;

    /// Unscaled scroll speed (multiplied by the difficulty preference)
    pub const BASE_SCROLL_SPEED: f32 = 3.0;
    /// Scroll speed gained per difficulty level
    pub const SPEED_PER_LEVEL: f32 = 0.5;
    /// Floored score needed per difficulty level
    pub const SCORE_PER_LEVEL: u64 = 200;

    /// Ticks between spawns at level 0
    pub const BASE_SPAWN_INTERVAL: u32 = 120;
    /// Spawn interval never drops below this
    pub const MIN_SPAWN_INTERVAL: u32 = 60;
    /// Spawn interval lost per difficulty level
    pub const SPAWN_INTERVAL_STEP: u32 = 10;
}

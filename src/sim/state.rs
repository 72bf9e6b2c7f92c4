//! Game state and core simulation types
//!
//! Everything a play session mutates lives in [`SessionState`], owned by a
//! single controller and passed explicitly to [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::difficulty::Difficulty;
use super::field::ObstacleField;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first jump/start input
    Waiting,
    /// Active gameplay
    Playing,
    /// Collision happened; waiting for restart input
    GameOver,
}

/// The player-controlled runner. Moves vertically only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity (pixels per tick, positive is down)
    pub vel_y: f32,
    pub size: Vec2,
    pub airborne: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: Vec2::new(ACTOR_X, ACTOR_GROUND_Y),
            vel_y: 0.0,
            size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            airborne: false,
        }
    }
}

impl Actor {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Apply the jump impulse. Returns false (and does nothing) while airborne.
    pub fn jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.vel_y = JUMP_IMPULSE;
        self.airborne = true;
        true
    }

    /// One tick of gravity integration with ground and ceiling clamps
    pub fn step(&mut self) {
        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;

        if self.pos.y >= ACTOR_GROUND_Y {
            self.pos.y = ACTOR_GROUND_Y;
            self.vel_y = 0.0;
            self.airborne = false;
        } else if self.pos.y < FIELD_TOP {
            self.pos.y = FIELD_TOP;
            self.vel_y = self.vel_y.max(0.0);
        }
    }
}

/// Obstacle size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Small,
    Medium,
    Wide,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Small, ObstacleKind::Medium, ObstacleKind::Wide];

    /// Width and height in pixels
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Small => Vec2::new(20.0, 40.0),
            ObstacleKind::Medium => Vec2::new(25.0, 50.0),
            ObstacleKind::Wide => Vec2::new(30.0, 35.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Small => "small",
            ObstacleKind::Medium => "medium",
            ObstacleKind::Wide => "wide",
        }
    }
}

/// An obstacle scrolling toward the actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
}

impl Obstacle {
    /// Place a new obstacle at `x` with its base on the ground line
    pub fn spawn_at(id: u32, kind: ObstacleKind, x: f32) -> Self {
        let size = kind.size();
        Self {
            id,
            kind,
            pos: Vec2::new(x, GROUND_LINE - size.y),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.kind.size()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size())
    }

    /// Trailing edge has crossed the left boundary
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size().x < 0.0
    }
}

/// Session summary reported when a play ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Floored score
    pub score: u64,
    pub obstacles_avoided: u32,
    pub duration_seconds: u64,
    pub peak_speed: f32,
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub actor: Actor,
    pub field: ObstacleField,
    /// Accumulated score; only its floor is ever shown or reported
    pub score: f64,
    pub obstacles_avoided: u32,
    /// Scroll speed at level 0 for the current play
    pub base_speed: f32,
    /// Difficulty as of the last Playing tick
    pub difficulty: Difficulty,
    /// Highest scroll speed seen this play
    pub peak_speed: f32,
    /// Wall-clock start of the current play (ms)
    pub started_at_ms: f64,
    /// Playing ticks elapsed this play
    pub time_ticks: u64,
}

impl SessionState {
    /// Fresh state in `Waiting` with a seeded obstacle generator
    pub fn new(seed: u64, base_speed: f32) -> Self {
        let difficulty = Difficulty::for_score(0, base_speed);
        Self {
            phase: SessionPhase::Waiting,
            actor: Actor::default(),
            field: ObstacleField::new(seed, &difficulty),
            score: 0.0,
            obstacles_avoided: 0,
            base_speed,
            difficulty,
            peak_speed: base_speed,
            started_at_ms: 0.0,
            time_ticks: 0,
        }
    }

    /// Score as displayed, compared and submitted
    pub fn floored_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Back to `Waiting` with zeroed counters. The obstacle RNG keeps its
    /// stream so consecutive plays differ.
    pub fn reset(&mut self, base_speed: f32) {
        self.phase = SessionPhase::Waiting;
        self.actor = Actor::default();
        self.score = 0.0;
        self.obstacles_avoided = 0;
        self.base_speed = base_speed;
        self.difficulty = Difficulty::for_score(0, base_speed);
        self.field.reset(&self.difficulty);
        self.peak_speed = base_speed;
        self.started_at_ms = 0.0;
        self.time_ticks = 0;
    }

    /// Reset and enter `Playing`
    pub fn begin(&mut self, base_speed: f32, now_ms: f64) {
        self.reset(base_speed);
        self.phase = SessionPhase::Playing;
        self.started_at_ms = now_ms;
    }

    /// Summary of the current play as of `now_ms`
    pub fn summary(&self, now_ms: f64) -> SessionSummary {
        SessionSummary {
            score: self.floored_score(),
            obstacles_avoided: self.obstacles_avoided,
            duration_seconds: crate::platform::elapsed_seconds(self.started_at_ms, now_ms),
            peak_speed: self.peak_speed,
        }
    }
}

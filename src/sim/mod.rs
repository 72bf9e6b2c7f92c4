//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick, no wall-clock deltas
//! - Seeded RNG only
//! - Stable obstacle order (spawn order)
//! - No rendering or I/O

pub mod collision;
pub mod difficulty;
pub mod field;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Aabb, first_overlap};
pub use difficulty::Difficulty;
pub use field::ObstacleField;
pub use snapshot::{ActorView, ObstacleView, Snapshot};
pub use state::{Actor, Obstacle, ObstacleKind, SessionPhase, SessionState, SessionSummary};
pub use tick::{GameEvent, TickInput, tick};

//! Read-only view of a session for presentation layers
//!
//! Renderers draw from a [`Snapshot`] and never touch [`SessionState`].

use glam::Vec2;
use serde::Serialize;

use super::state::{ObstacleKind, SessionPhase, SessionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorView {
    pub pos: Vec2,
    pub size: Vec2,
    pub airborne: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub actor: ActorView,
    pub obstacles: Vec<ObstacleView>,
    /// Floored score
    pub score: u64,
    pub high_score: u64,
    pub obstacles_avoided: u32,
    pub level: u32,
    pub scroll_speed: f32,
    /// Playing ticks so far (drives walk-cycle animation)
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn capture(state: &SessionState, high_score: u64) -> Self {
        Self {
            phase: state.phase,
            actor: ActorView {
                pos: state.actor.pos,
                size: state.actor.size,
                airborne: state.actor.airborne,
            },
            obstacles: state
                .field
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    pos: o.pos,
                    size: o.size(),
                })
                .collect(),
            score: state.floored_score(),
            high_score,
            obstacles_avoided: state.obstacles_avoided,
            level: state.difficulty.level,
            scroll_speed: state.field.scroll_speed,
            time_ticks: state.time_ticks,
        }
    }
}

//! Per-frame simulation tick
//!
//! One call advances a Playing session by exactly one discrete step,
//! regardless of how much wall time passed. Order within a tick:
//! actor physics, obstacle spawn/advance/retire, collision, difficulty,
//! continuous score.

use super::collision::first_overlap;
use super::difficulty::Difficulty;
use super::state::{Obstacle, ObstacleKind, SessionPhase, SessionState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump (space/click/tap)
    pub jump: bool,
    /// Demo mode - the simulation jumps on its own
    pub autopilot: bool,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    Spawned { id: u32, kind: ObstacleKind },
    Avoided { id: u32 },
    LevelUp { level: u32 },
    Collided { obstacle_id: u32 },
}

/// Lead time (in ticks of travel) at which the autopilot jumps
const AUTOPILOT_LEAD_TICKS: f32 = 8.0;

/// Advance the session by one tick. Does nothing unless Playing.
pub fn tick(state: &mut SessionState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != SessionPhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    let wants_jump = input.jump || (input.autopilot && autopilot_should_jump(state));
    if wants_jump && state.actor.jump() {
        events.push(GameEvent::Jumped);
    }

    state.actor.step();

    // Obstacles: spawn, scroll, retire
    if let Some(obstacle) = state.field.tick_spawner() {
        events.push(GameEvent::Spawned {
            id: obstacle.id,
            kind: obstacle.kind,
        });
    }
    state.field.advance();
    for id in state.field.retire() {
        state.obstacles_avoided += 1;
        state.score += AVOID_BONUS;
        log::debug!("Avoided obstacle #{} ({} total)", id, state.obstacles_avoided);
        events.push(GameEvent::Avoided { id });
    }

    // Any hit ends the play; nothing after this runs on the collision tick
    let actor_box = state.actor.bounds();
    if let Some(idx) = first_overlap(&actor_box, state.field.obstacles.iter().map(Obstacle::bounds)) {
        let obstacle_id = state.field.obstacles[idx].id;
        log::debug!("Collision with obstacle #{}", obstacle_id);
        events.push(GameEvent::Collided { obstacle_id });
        state.phase = SessionPhase::GameOver;
        return events;
    }

    let difficulty = Difficulty::for_score(state.floored_score(), state.base_speed);
    if difficulty.level > state.difficulty.level {
        log::info!(
            "Level {} (speed {:.1}, spawn every {} ticks)",
            difficulty.level,
            difficulty.scroll_speed,
            difficulty.spawn_interval
        );
        events.push(GameEvent::LevelUp {
            level: difficulty.level,
        });
    }
    state.difficulty = difficulty;
    state.field.apply_difficulty(&difficulty);
    state.peak_speed = state.peak_speed.max(difficulty.scroll_speed);

    state.score += SCORE_PER_TICK;

    events
}

/// Jump when the next obstacle is about to reach the actor
fn autopilot_should_jump(state: &SessionState) -> bool {
    if state.actor.airborne {
        return false;
    }
    let actor_box = state.actor.bounds();
    state
        .field
        .next_ahead_of(actor_box.left())
        .map(|o| {
            let gap = o.pos.x - actor_box.right();
            gap > 0.0 && gap <= state.field.scroll_speed * AUTOPILOT_LEAD_TICKS
        })
        .unwrap_or(false)
}

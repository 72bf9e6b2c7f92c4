//! Obstacle field: spawn scheduling, scrolling and retirement

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::state::{Obstacle, ObstacleKind};
use crate::consts::FIELD_WIDTH;

/// Obstacles on screen plus the scheduler that feeds them
#[derive(Debug, Clone)]
pub struct ObstacleField {
    /// Live obstacles in spawn order (left to right on screen)
    pub obstacles: Vec<Obstacle>,
    /// Ticks counted toward the next spawn
    pub spawn_timer: u32,
    /// Current ticks between spawns
    pub spawn_interval: u32,
    /// Current leftward speed (pixels per tick)
    pub scroll_speed: f32,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleField {
    pub fn new(seed: u64, difficulty: &Difficulty) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_timer: 0,
            spawn_interval: difficulty.spawn_interval,
            scroll_speed: difficulty.scroll_speed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Drop every obstacle and restart the spawn countdown
    pub fn reset(&mut self, difficulty: &Difficulty) {
        self.obstacles.clear();
        self.spawn_timer = 0;
        self.apply_difficulty(difficulty);
    }

    pub fn apply_difficulty(&mut self, difficulty: &Difficulty) {
        self.scroll_speed = difficulty.scroll_speed;
        self.spawn_interval = difficulty.spawn_interval;
    }

    /// Count one tick toward the current interval; spawn when it is reached.
    ///
    /// The comparison is `>=` so a shortened interval takes effect at once.
    pub fn tick_spawner(&mut self) -> Option<&Obstacle> {
        self.spawn_timer += 1;
        if self.spawn_timer < self.spawn_interval {
            return None;
        }
        self.spawn_timer = 0;
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        Some(self.spawn(kind))
    }

    /// Place an obstacle at the right edge of the field
    pub fn spawn(&mut self, kind: ObstacleKind) -> &Obstacle {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle::spawn_at(id, kind, FIELD_WIDTH));
        log::debug!("Spawned {} obstacle #{}", kind.as_str(), id);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every obstacle left by the current speed
    pub fn advance(&mut self) {
        let speed = self.scroll_speed;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= speed;
        }
    }

    /// Remove obstacles whose trailing edge left the field; returns their ids
    pub fn retire(&mut self) -> Vec<u32> {
        let mut retired = Vec::new();
        self.obstacles.retain(|o| {
            if o.is_off_screen() {
                retired.push(o.id);
                false
            } else {
                true
            }
        });
        retired
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Nearest obstacle whose trailing edge is still right of `x`
    pub fn next_ahead_of(&self, x: f32) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.pos.x + o.size().x > x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
    }
}

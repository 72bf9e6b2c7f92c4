//! Difficulty curve
//!
//! A pure function of the floored score; nothing here is stored between ticks.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty derived from a floored score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    /// Horizontal world velocity (pixels per tick)
    pub scroll_speed: f32,
    /// Ticks between obstacle spawns
    pub spawn_interval: u32,
}

impl Difficulty {
    /// Difficulty for `score` (already floored) on top of `base_speed`
    pub fn for_score(score: u64, base_speed: f32) -> Self {
        let level = level_for_score(score);
        Self {
            level,
            scroll_speed: scroll_speed(base_speed, level),
            spawn_interval: spawn_interval(level),
        }
    }
}

/// One level per `SCORE_PER_LEVEL` points
pub fn level_for_score(score: u64) -> u32 {
    (score / SCORE_PER_LEVEL).min(u32::MAX as u64) as u32
}

pub fn scroll_speed(base_speed: f32, level: u32) -> f32 {
    base_speed + level as f32 * SPEED_PER_LEVEL
}

pub fn spawn_interval(level: u32) -> u32 {
    BASE_SPAWN_INTERVAL
        .saturating_sub(level.saturating_mul(SPAWN_INTERVAL_STEP))
        .max(MIN_SPAWN_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_difficulty_steps() {
        let scores = [0u64, 199, 200, 399, 400];
        let intervals: Vec<u32> = scores
            .iter()
            .map(|&s| Difficulty::for_score(s, 3.0).spawn_interval)
            .collect();
        let speeds: Vec<f32> = scores
            .iter()
            .map(|&s| Difficulty::for_score(s, 3.0).scroll_speed)
            .collect();
        assert_eq!(intervals, vec![120, 120, 110, 110, 100]);
        assert_eq!(speeds, vec![3.0, 3.0, 3.5, 3.5, 4.0]);
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval(6), 60);
        assert_eq!(spawn_interval(7), 60);
        assert_eq!(spawn_interval(u32::MAX), 60);
    }

    #[test]
    fn test_base_speed_scales() {
        let hard = Difficulty::for_score(0, 3.0 * 1.3);
        assert!((hard.scroll_speed - 3.9).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_monotonic_in_score(a in 0u64..100_000, b in 0u64..100_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let d_lo = Difficulty::for_score(lo, 3.0);
            let d_hi = Difficulty::for_score(hi, 3.0);
            prop_assert!(d_lo.level <= d_hi.level);
            prop_assert!(d_lo.scroll_speed <= d_hi.scroll_speed);
            prop_assert!(d_lo.spawn_interval >= d_hi.spawn_interval);
            prop_assert!(d_hi.spawn_interval >= MIN_SPAWN_INTERVAL);
        }
    }
}

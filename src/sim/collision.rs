//! Axis-aligned bounding-box collision detection
//!
//! Screen coordinates: x grows right, y grows down. Overlap is tested on open
//! intervals, so boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box from `min` (top-left) to `max` (bottom-right)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box at `pos` (top-left corner) with the given size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Interior overlap test (edge contact is not an overlap)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Index of the first box in `others` overlapping `subject`
pub fn first_overlap(subject: &Aabb, others: impl IntoIterator<Item = Aabb>) -> Option<usize> {
    others.into_iter().position(|b| subject.overlaps(&b))
}

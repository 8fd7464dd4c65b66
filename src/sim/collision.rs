//! Collision detection and response for a circular ball against boxes
//!
//! Every solid in the playfield (walls, paddle, blocks) is an axis-aligned
//! rectangle, optionally with rounded corners; the ball is the only circle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as centre + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Corner rounding (0 = sharp), never more than the smaller half extent
    #[serde(default)]
    pub corner_radius: f32,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
            corner_radius: 0.0,
        }
    }

    /// Round the corners (a chamfered paddle deflects balls off its ends)
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        let max = self.half_extents.x.min(self.half_extents.y);
        self.corner_radius = radius.clamp(0.0, max.max(0.0));
        self
    }

    /// Build from top-left corner and size
    pub fn from_corner(top_left: Vec2, size: Vec2) -> Self {
        Self::new(top_left + size / 2.0, size)
    }
}

/// True when a ball overlaps a (possibly rounded) rectangle
///
/// A rounded rectangle is its sharp core, shrunk by the corner radius, grown
/// back by that radius, so the ball is tested against the core with its
/// radius grown by the same amount. A centre already inside the core counts.
pub fn ball_overlaps_rect(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> bool {
    let corner = rect.corner_radius;
    let reach = ball_radius + corner;
    let core = rect.half_extents - Vec2::splat(corner);
    let closest = ball_pos.clamp(rect.center - core, rect.center + core);
    (ball_pos - closest).length_squared() < reach * reach
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    crate::reflect(velocity, normal)
}

/// Check if the ball has dropped below the playfield by more than `margin`
#[inline]
pub fn ball_out_of_bounds(ball_pos: Vec2, playfield_height: f32, margin: f32) -> bool {
    ball_pos.y > playfield_height + margin
}

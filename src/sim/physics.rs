//! Physics seam between the round rules and a rigid-body engine
//!
//! The round only ever needs a handful of operations from the engine, so they
//! are collected in [`PhysicsAdapter`]. The default engine is
//! [`RapierPhysics`](super::rapier::RapierPhysics).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::error::RoundError;

/// Engine-side body identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A raw collision-pair event harvested from one step
///
/// Stored with the lower id first so the same contact always compares equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    pub a: BodyId,
    pub b: BodyId,
}

impl ContactPair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// The body on the other side of the contact from `body`
    pub fn other(&self, body: BodyId) -> Option<BodyId> {
        if self.a == body {
            Some(self.b)
        } else if self.b == body {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Operations the round needs from a rigid-body engine.
///
/// The engine owns body lifetime; callers hold [`BodyId`]s only.
pub trait PhysicsAdapter {
    /// Create an immovable box (walls, blocks, the paddle)
    fn create_static_body(&mut self, rect: Rect) -> BodyId;

    /// Create a dynamic circle (the ball), initially at rest
    fn create_ball_body(&mut self, center: Vec2, radius: f32) -> BodyId;

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), RoundError>;

    /// Teleport a body (static or dynamic) without generating contacts
    fn set_position(&mut self, body: BodyId, position: Vec2) -> Result<(), RoundError>;

    fn position(&self, body: BodyId) -> Option<Vec2>;

    fn velocity(&self, body: BodyId) -> Option<Vec2>;

    fn remove_body(&mut self, body: BodyId) -> Result<(), RoundError>;

    /// Advance by `dt` seconds and return every contact that occurred.
    ///
    /// Each distinct pair appears at most once per step.
    fn step(&mut self, dt: f32) -> Vec<ContactPair>;

    fn body_count(&self) -> usize;

    /// Unit-mass launch impulse: adds directly to the current velocity
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) -> Result<(), RoundError> {
        let current = self.velocity(body).ok_or(RoundError::BodyNotFound(body))?;
        self.set_velocity(body, current + impulse)
    }
}

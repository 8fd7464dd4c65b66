//! Collision classification
//!
//! Turns a raw contact between two bodies into the gameplay meaning the
//! round cares about. Exactly one side must be the ball; the other side's
//! tag decides the class.

use super::physics::ContactPair;
use super::registry::EntityRegistry;
use super::state::{BlockId, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionClass {
    BallBlock(BlockId),
    BallPaddle,
    BallWall,
    /// Untagged bodies, ball-ball, or no ball at all: dropped
    Irrelevant,
}

/// Classify a pair of (optional) entity tags. Symmetric in its arguments.
pub fn classify(a: Option<EntityKind>, b: Option<EntityKind>) -> CollisionClass {
    let other = match (a, b) {
        (Some(EntityKind::Ball), Some(EntityKind::Ball)) => return CollisionClass::Irrelevant,
        (Some(EntityKind::Ball), other) | (other, Some(EntityKind::Ball)) => other,
        _ => return CollisionClass::Irrelevant,
    };

    match other {
        Some(EntityKind::Block(id)) => CollisionClass::BallBlock(id),
        Some(EntityKind::Paddle) => CollisionClass::BallPaddle,
        Some(EntityKind::Wall) => CollisionClass::BallWall,
        Some(EntityKind::Ball) | None => CollisionClass::Irrelevant,
    }
}

/// Look both bodies up in the registry and classify the contact
pub fn classify_pair(registry: &EntityRegistry, pair: &ContactPair) -> CollisionClass {
    classify(registry.kind_of(pair.a), registry.kind_of(pair.b))
}

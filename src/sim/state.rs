//! Round state and core simulation types

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::physics::BodyId;

/// Gameplay identity of a block, stable for the whole round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a physics body means to the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Wall,
    Block(BlockId),
}

/// How a finished round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Headline for the game-over screen
    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Won => "You Win",
            Outcome::Lost => "Game Over",
        }
    }
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Ball resting on the paddle, waiting for launch input
    Idle,
    /// Ball free and driven by physics
    Launched,
    /// Terminal
    Ended { outcome: Outcome, final_score: u64 },
}

impl RoundPhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, RoundPhase::Ended { .. })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            RoundPhase::Ended { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Resting on top of the paddle, centred
    Attached,
    /// Moved by physics
    Free,
}

/// The single ball
///
/// `pos` and `vel` mirror the physics body and are refreshed every step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(body: BodyId, pos: Vec2, radius: f32) -> Self {
        Self {
            body,
            pos,
            vel: Vec2::ZERO,
            radius,
            state: BallState::Attached,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, BallState::Attached)
    }

    /// Where an attached ball sits on the paddle (None when free)
    pub fn attached_position(&self, paddle: &Paddle, gap: f32) -> Option<Vec2> {
        match self.state {
            BallState::Attached => Some(Vec2::new(paddle.x, paddle.top() - self.radius - gap)),
            BallState::Free => None,
        }
    }
}

/// The player's paddle (moves along x only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub body: BodyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Back-reference to the ball resting on it; the paddle does not own it
    pub attached_ball: Option<BodyId>,
}

impl Paddle {
    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn rect(&self, corner_radius: f32) -> Rect {
        Rect::new(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
            .with_corner_radius(corner_radius)
    }
}

/// A destructible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub body: BodyId,
    pub rect: Rect,
    pub column: u32,
    pub row: u32,
}

/// Lives, score and phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub lives: u32,
    pub score: u64,
    pub phase: RoundPhase,
}

impl RoundState {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            score: 0,
            phase: RoundPhase::Idle,
        }
    }
}

/// Serializable view of a round for presentation layers that poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub lives: u32,
    pub score: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Live blocks, sorted by id
    pub blocks: Vec<Block>,
}

//! Breakout Core - simulation and scoring for a single-level breakout round
//!
//! Core modules:
//! - `sim`: Step-driven simulation (physics seam, collisions, round state machine)
//! - `level`: Block layouts consumed once at round start
//! - `settings`: Data-driven round configuration
//! - `error`: Error taxonomy shared by the modules above

pub mod error;
pub mod level;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RoundError};
pub use level::{BlockPlacement, LevelLayout};
pub use settings::RoundSettings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Thickness of the static walls enclosing the playfield
    pub const WALL_THICKNESS: f32 = 32.0;
    /// How far below the playfield the ball must fall before a life is lost
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 100.0;

    /// Paddle defaults - centre sits at 90% of the playfield height
    pub const PADDLE_WIDTH: f32 = 104.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;
    pub const PADDLE_Y_RATIO: f32 = 0.9;
    /// Chamfer on the paddle ends
    pub const PADDLE_CORNER_RADIUS: f32 = 15.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_LAUNCH_SPEED: f32 = 420.0;
    /// Launch direction (normalized at use), up and slightly right
    pub const BALL_LAUNCH_DIR: [f32; 2] = [0.35, -1.0];
    /// Clearance between an attached ball and the paddle's top edge
    pub const BALL_ATTACH_GAP: f32 = 1.0;

    /// Round defaults
    pub const STARTING_LIVES: u32 = 3;

    /// Block defaults (one tile of the level grid)
    pub const BLOCK_WIDTH: f32 = 64.0;
    pub const BLOCK_HEIGHT: f32 = 32.0;
}

/// Clamp a paddle centre so the whole paddle stays inside the playfield.
///
/// A paddle wider than the field is pinned to the centre.
#[inline]
pub fn clamp_paddle_x(x: f32, paddle_width: f32, playfield_width: f32) -> f32 {
    let half = paddle_width / 2.0;
    let min = half;
    let max = playfield_width - half;
    if min > max {
        return playfield_width / 2.0;
    }
    x.clamp(min, max)
}

/// Reflect a velocity off a surface with the given unit normal
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

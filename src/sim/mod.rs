//! Step-driven simulation module
//!
//! All gameplay rules live here. Nothing in this module renders, reads the
//! clock or touches the platform:
//! - Time advances only through explicit `dt` steps
//! - Input arrives as [`PointerEvent`]s
//! - Output leaves as [`RoundEvent`]s
//! - Physics sits behind [`PhysicsAdapter`]

pub mod classify;
pub mod collision;
pub mod events;
pub mod input;
pub mod physics;
pub mod rapier;
pub mod registry;
pub mod round;
pub mod state;
pub mod tick;

pub use classify::{CollisionClass, classify, classify_pair};
pub use collision::{Rect, ball_out_of_bounds, ball_overlaps_rect};
pub use events::{LogObserver, RoundEvent, RoundObserver};
pub use input::{PointerEvent, apply_event, on_pointer_down, on_pointer_move};
pub use physics::{BodyId, ContactPair, PhysicsAdapter};
pub use rapier::RapierPhysics;
pub use registry::EntityRegistry;
pub use round::Round;
pub use state::{
    Ball, BallState, Block, BlockId, EntityKind, Outcome, Paddle, RoundPhase, RoundSnapshot,
    RoundState,
};
pub use tick::FixedTimestep;

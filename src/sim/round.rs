//! Round state machine
//!
//! A [`Round`] owns the rules state (lives, score, phase), the entity
//! registry and the physics engine, and is driven one [`Round::step`] at a
//! time by whatever loop the host runs.
//!
//! ```text
//!   Idle ──launch──▶ Launched ──last block──▶ Ended(Won)
//!    ▲                  │
//!    └──ball lost, ─────┤
//!       lives left      └──ball lost, no lives──▶ Ended(Lost)
//! ```

use glam::Vec2;

use super::classify::{CollisionClass, classify_pair};
use super::collision::{Rect, ball_out_of_bounds, ball_overlaps_rect, reflect_velocity};
use super::events::{RoundEvent, RoundObserver};
use super::input;
use super::physics::{BodyId, PhysicsAdapter};
use super::rapier::RapierPhysics;
use super::registry::EntityRegistry;
use super::state::{
    Ball, BallState, Block, BlockId, EntityKind, Outcome, Paddle, RoundPhase, RoundSnapshot,
    RoundState,
};
use crate::error::{ConfigError, RoundError};
use crate::level::LevelLayout;
use crate::settings::RoundSettings;

/// One playthrough of a level
pub struct Round<P: PhysicsAdapter = RapierPhysics> {
    settings: RoundSettings,
    layout: LevelLayout,
    physics: P,
    registry: EntityRegistry,
    state: RoundState,
    paddle: Paddle,
    ball: Ball,
    walls: Vec<BodyId>,
    observers: Vec<Box<dyn RoundObserver>>,
    /// Events recorded since the last flush
    pending: Vec<RoundEvent>,
    steps: u64,
}

impl Round<RapierPhysics> {
    /// Build a round on rapier2d
    pub fn new(settings: RoundSettings, layout: LevelLayout) -> Result<Self, ConfigError> {
        Self::with_physics(RapierPhysics::new(), settings, layout)
    }
}

impl<P: PhysicsAdapter> Round<P> {
    /// Build a round on any physics engine
    ///
    /// Fails if the settings or the layout are malformed; nothing is kept in
    /// that case.
    pub fn with_physics(
        mut physics: P,
        settings: RoundSettings,
        layout: LevelLayout,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        layout.validate(&settings)?;

        let mut registry = EntityRegistry::new();

        // Left, right and top walls; the bottom stays open
        let w = settings.playfield_width;
        let h = settings.playfield_height;
        let t = settings.wall_thickness;
        let depth = h + settings.out_of_bounds_margin + t;
        let walls = vec![
            physics.create_static_body(Rect::from_corner(Vec2::new(-t, -t), Vec2::new(t, depth + t))),
            physics.create_static_body(Rect::from_corner(Vec2::new(w, -t), Vec2::new(t, depth + t))),
            physics.create_static_body(Rect::from_corner(Vec2::new(0.0, -t), Vec2::new(w, t))),
        ];
        for wall in &walls {
            registry.register(*wall, EntityKind::Wall);
        }

        let mut paddle = Paddle {
            body: BodyId(0),
            x: w / 2.0,
            y: settings.paddle_y(),
            width: settings.paddle_width,
            height: settings.paddle_height,
            attached_ball: None,
        };
        paddle.body = physics.create_static_body(paddle.rect(settings.paddle_corner_radius));
        registry.register(paddle.body, EntityKind::Paddle);

        let mut ball = Ball::new(BodyId(0), Vec2::ZERO, settings.ball_radius);
        if let Some(pos) = ball.attached_position(&paddle, settings.attach_gap) {
            ball.pos = pos;
        }
        ball.body = physics.create_ball_body(ball.pos, ball.radius);
        registry.register(ball.body, EntityKind::Ball);
        paddle.attached_ball = Some(ball.body);

        let mut round = Self {
            state: RoundState::new(settings.starting_lives),
            settings,
            layout,
            physics,
            registry,
            paddle,
            ball,
            walls,
            observers: Vec::new(),
            pending: Vec::new(),
            steps: 0,
        };
        round.spawn_blocks();

        log::info!(
            "Round ready: {} blocks, {} lives",
            round.registry.remaining_blocks(),
            round.state.lives
        );

        Ok(round)
    }

    /// Create one block (registry entry + physics body) per layout placement
    fn spawn_blocks(&mut self) {
        let size = Vec2::new(self.layout.block_width, self.layout.block_height);
        for (index, placement) in self.layout.blocks.iter().enumerate() {
            let rect = Rect::new(placement.center(), size);
            let body = self.physics.create_static_body(rect);
            self.registry.register_block(Block {
                id: BlockId(index as u32 + 1),
                body,
                rect,
                column: placement.column,
                row: placement.row,
            });
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn RoundObserver>) {
        self.observers.push(observer);
    }

    // --- Accessors ---

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn remaining_blocks(&self) -> usize {
        self.registry.remaining_blocks()
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn walls(&self) -> &[BodyId] {
        &self.walls
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Direct engine access for hosts and tests (e.g. nudging the ball)
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// Number of steps simulated since the round (re)started
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let mut blocks: Vec<Block> = self.registry.blocks().cloned().collect();
        blocks.sort_by_key(|b| b.id);
        RoundSnapshot {
            phase: self.state.phase,
            lives: self.state.lives,
            score: self.state.score,
            ball: self.ball.clone(),
            paddle: self.paddle.clone(),
            blocks,
        }
    }

    // --- Transitions ---

    /// Serve the ball. Only valid while `Idle`; otherwise nothing changes.
    pub fn launch(&mut self) -> Result<(), RoundError> {
        if self.state.phase != RoundPhase::Idle {
            return Err(RoundError::InvalidTransition {
                action: "launch",
                phase: self.state.phase,
            });
        }

        let velocity = self.settings.launch_velocity();
        self.physics.set_velocity(self.ball.body, velocity)?;
        self.ball.vel = velocity;
        self.ball.state = BallState::Free;
        self.paddle.attached_ball = None;
        self.state.phase = RoundPhase::Launched;
        self.pending.push(RoundEvent::BallLaunched);

        log::info!("Ball launched at ({:.1}, {:.1})", velocity.x, velocity.y);
        Ok(())
    }

    /// The ball hit a block: destroy it and score a point
    pub fn on_ball_block_collision(&mut self, id: BlockId) -> Result<(), RoundError> {
        if self.state.phase != RoundPhase::Launched {
            return Err(RoundError::InvalidTransition {
                action: "destroy block",
                phase: self.state.phase,
            });
        }

        let block = self.registry.remove_block(id)?;
        if let Err(err) = self.physics.remove_body(block.body) {
            // Registry and engine must agree; the registry entry is gone either way
            log::warn!("Block {} had no physics body: {}", id, err);
        }

        self.state.score += 1;
        self.pending.push(RoundEvent::BlockDestroyed(id));
        self.pending.push(RoundEvent::ScoreChanged(self.state.score));
        log::debug!(
            "Block {} destroyed, {} remaining",
            id,
            self.registry.remaining_blocks()
        );

        if self.registry.remaining_blocks() == 0 {
            self.end(Outcome::Won);
        }
        Ok(())
    }

    /// The ball fell past the bottom of the playfield: lose a life
    pub fn on_ball_out_of_bounds(&mut self) -> Result<(), RoundError> {
        if self.state.phase != RoundPhase::Launched {
            return Err(RoundError::InvalidTransition {
                action: "lose ball",
                phase: self.state.phase,
            });
        }

        self.state.lives = self.state.lives.saturating_sub(1);
        self.pending.push(RoundEvent::LivesChanged(self.state.lives));

        if self.state.lives == 0 {
            self.end(Outcome::Lost);
            return Ok(());
        }

        log::info!("Ball lost, {} lives left", self.state.lives);
        self.attach_ball()?;
        self.state.phase = RoundPhase::Idle;
        self.pending.push(RoundEvent::BallReset);
        Ok(())
    }

    /// Move the paddle centre (already clamped by the input bridge)
    pub(crate) fn place_paddle(&mut self, x: f32) -> Result<(), RoundError> {
        self.physics
            .set_position(self.paddle.body, Vec2::new(x, self.paddle.y))?;
        self.paddle.x = x;
        if self.ball.is_attached() {
            self.follow_paddle()
        } else {
            self.scoop_ball()
        }
    }

    /// A paddle moved onto a free ball lifts it onto its top face
    ///
    /// The engine would otherwise resolve the overlap along the shortest
    /// axis, which can push the ball out through the bottom of the paddle.
    fn scoop_ball(&mut self) -> Result<(), RoundError> {
        let rect = self.paddle.rect(self.settings.paddle_corner_radius);
        if !ball_overlaps_rect(self.ball.pos, self.ball.radius, &rect) {
            return Ok(());
        }

        let pos = Vec2::new(
            self.ball.pos.x,
            self.paddle.top() - self.ball.radius - self.settings.attach_gap,
        );
        self.physics.set_position(self.ball.body, pos)?;
        self.ball.pos = pos;

        if self.ball.vel.y > 0.0 {
            let vel = reflect_velocity(self.ball.vel, Vec2::NEG_Y);
            self.physics.set_velocity(self.ball.body, vel)?;
            self.ball.vel = vel;
        }
        log::debug!("Paddle scooped the ball at x = {:.1}", pos.x);
        Ok(())
    }

    /// Start again on the same layout: full lives, zero score, fresh blocks
    pub fn restart(&mut self) -> Result<(), RoundError> {
        for block in self.registry.drain_blocks() {
            if let Err(err) = self.physics.remove_body(block.body) {
                log::warn!("Block {} had no physics body: {}", block.id, err);
            }
        }
        self.spawn_blocks();

        self.state = RoundState::new(self.settings.starting_lives);
        self.steps = 0;
        self.attach_ball()?;
        self.pending.push(RoundEvent::ScoreChanged(0));
        self.pending.push(RoundEvent::LivesChanged(self.state.lives));

        log::info!(
            "Round restarted: {} blocks, {} lives",
            self.registry.remaining_blocks(),
            self.state.lives
        );
        Ok(())
    }

    fn end(&mut self, outcome: Outcome) {
        let final_score = self.state.score;
        self.state.phase = RoundPhase::Ended {
            outcome,
            final_score,
        };
        // Freeze the ball where it is
        if let Err(err) = self.physics.set_velocity(self.ball.body, Vec2::ZERO) {
            log::warn!("Could not stop ball: {}", err);
        }
        self.ball.vel = Vec2::ZERO;
        self.pending.push(RoundEvent::RoundEnded {
            outcome,
            final_score,
        });

        log::info!("Round ended: {} with score {}", outcome.title(), final_score);
    }

    /// Put the ball back on the paddle, at rest
    fn attach_ball(&mut self) -> Result<(), RoundError> {
        self.ball.state = BallState::Attached;
        self.ball.vel = Vec2::ZERO;
        self.physics.set_velocity(self.ball.body, Vec2::ZERO)?;
        self.paddle.attached_ball = Some(self.ball.body);
        self.follow_paddle()
    }

    /// Keep an attached ball on top of the paddle
    fn follow_paddle(&mut self) -> Result<(), RoundError> {
        if let Some(pos) = self
            .ball
            .attached_position(&self.paddle, self.settings.attach_gap)
        {
            self.physics.set_position(self.ball.body, pos)?;
            self.ball.pos = pos;
        }
        Ok(())
    }

    // --- Stepping ---

    /// Advance the round by `dt` seconds
    ///
    /// Queued input is applied first, then physics runs, then every contact
    /// is classified and dispatched, then the ball is checked against the
    /// bottom of the playfield. Returns the events recorded during the step
    /// (also delivered to observers).
    pub fn step(&mut self, dt: f32, input: &[input::PointerEvent]) -> Vec<RoundEvent> {
        for event in input {
            input::apply_event(self, event);
        }

        if self.state.phase.is_ended() {
            return self.flush_events();
        }
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Skipping physics for step with dt = {}", dt);
            return self.flush_events();
        }
        self.steps += 1;

        if let Err(err) = self.follow_paddle() {
            log::warn!("Attached ball lost track of paddle: {}", err);
        }

        let contacts = self.physics.step(dt);
        self.sync_ball();

        // Classify the whole batch before mutating the registry
        let classes: Vec<CollisionClass> = contacts
            .iter()
            .map(|pair| classify_pair(&self.registry, pair))
            .collect();
        for class in classes {
            self.dispatch(class);
        }

        if self.state.phase == RoundPhase::Launched
            && ball_out_of_bounds(
                self.ball.pos,
                self.settings.playfield_height,
                self.settings.out_of_bounds_margin,
            )
        {
            if let Err(err) = self.on_ball_out_of_bounds() {
                log::warn!("Out-of-bounds check failed: {}", err);
            }
        }

        self.flush_events()
    }

    fn dispatch(&mut self, class: CollisionClass) {
        match class {
            CollisionClass::BallBlock(id) => match self.on_ball_block_collision(id) {
                Ok(()) => {}
                Err(RoundError::BlockNotFound(id)) => {
                    log::warn!("Ignoring collision with removed block {}", id);
                }
                Err(err) => log::debug!("Ignoring block collision: {}", err),
            },
            CollisionClass::BallPaddle => log::trace!("Ball bounced off paddle"),
            CollisionClass::BallWall => log::trace!("Ball bounced off wall"),
            CollisionClass::Irrelevant => {}
        }
    }

    fn sync_ball(&mut self) {
        if let Some(pos) = self.physics.position(self.ball.body) {
            self.ball.pos = pos;
        }
        if let Some(vel) = self.physics.velocity(self.ball.body) {
            self.ball.vel = vel;
        }
    }

    /// Deliver pending events to observers and hand them to the caller
    ///
    /// `step` does this itself; call it directly after driving transitions
    /// outside a step.
    pub fn flush_events(&mut self) -> Vec<RoundEvent> {
        let events = std::mem::take(&mut self.pending);
        for observer in &mut self.observers {
            for event in &events {
                observer.notify(event);
            }
        }
        events
    }
}

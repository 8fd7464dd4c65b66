//! Shared test fixtures
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use glam::Vec2;

use breakout_core::sim::{BlockId, BodyId, ContactPair, PhysicsAdapter, Rect, Round};
use breakout_core::{BlockPlacement, LevelLayout, RoundError, RoundSettings};

/// Physics stand-in that moves bodies ballistically and reports only the
/// contacts a test scripts for each step
#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    bodies: HashMap<BodyId, (Vec2, Vec2, bool)>,
    next_id: u32,
    script: VecDeque<Vec<ContactPair>>,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Queue the contacts the next unscripted step reports
    pub fn script(&mut self, contacts: Vec<ContactPair>) {
        self.script.push_back(contacts);
    }

    fn insert(&mut self, pos: Vec2, dynamic: bool) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, (pos, Vec2::ZERO, dynamic));
        id
    }
}

impl PhysicsAdapter for ScriptedPhysics {
    fn create_static_body(&mut self, rect: Rect) -> BodyId {
        self.insert(rect.center, false)
    }

    fn create_ball_body(&mut self, center: Vec2, _radius: f32) -> BodyId {
        self.insert(center, true)
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), RoundError> {
        let entry = self.bodies.get_mut(&body).ok_or(RoundError::BodyNotFound(body))?;
        entry.1 = velocity;
        Ok(())
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) -> Result<(), RoundError> {
        let entry = self.bodies.get_mut(&body).ok_or(RoundError::BodyNotFound(body))?;
        entry.0 = position;
        Ok(())
    }

    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.0)
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.1)
    }

    fn remove_body(&mut self, body: BodyId) -> Result<(), RoundError> {
        self.bodies
            .remove(&body)
            .map(|_| ())
            .ok_or(RoundError::BodyNotFound(body))
    }

    fn step(&mut self, dt: f32) -> Vec<ContactPair> {
        for (pos, vel, dynamic) in self.bodies.values_mut() {
            if *dynamic {
                *pos += *vel * dt;
            }
        }
        self.script.pop_front().unwrap_or_default()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// `count` blocks in one row near the top of the default playfield
pub fn row_layout(count: u32) -> LevelLayout {
    let blocks = (0..count)
        .map(|i| BlockPlacement {
            column: i,
            row: 0,
            x: 80.0 + i as f32 * 70.0,
            y: 100.0,
        })
        .collect();
    LevelLayout::new(64.0, 32.0, blocks)
}

pub fn scripted_round(blocks: u32) -> Round<ScriptedPhysics> {
    Round::with_physics(ScriptedPhysics::new(), RoundSettings::default(), row_layout(blocks))
        .expect("valid test round")
}

/// Contact between the ball and the given block
pub fn ball_hits(round: &Round<ScriptedPhysics>, block: BlockId) -> ContactPair {
    let body = round.registry().block(block).expect("live block").body;
    ContactPair::new(round.ball().body, body)
}

/// Teleport the ball below the kill line
pub fn drop_ball(round: &mut Round<ScriptedPhysics>) {
    let body = round.ball().body;
    let y = round.settings().playfield_height + round.settings().out_of_bounds_margin + 50.0;
    round
        .physics_mut()
        .set_position(body, Vec2::new(400.0, y))
        .expect("ball body exists");
}

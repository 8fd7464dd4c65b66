//! rapier2d implementation of [`PhysicsAdapter`]
//!
//! Walls, blocks and the paddle are fixed bodies; the ball is the only
//! dynamic one. The world runs in playfield pixels with zero gravity, so
//! `length_unit` is set to the pixel scale and no conversion happens at the
//! seam.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rapier2d::prelude::{
    ActiveEvents, CCDSolver, ChannelEventCollector, CoefficientCombineRule, Collider,
    ColliderBuilder, ColliderHandle, ColliderSet, CollisionEvent, ContactForceEvent,
    DefaultBroadPhase, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    NarrowPhase, PhysicsPipeline, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, Vector,
};

use super::collision::Rect;
use super::physics::{BodyId, ContactPair, PhysicsAdapter};
use crate::error::RoundError;

/// Pixels per rapier length unit (tunes the solver's tolerances)
pub const PIXELS_PER_METER: f32 = 100.0;

/// Smallest half extent handed to rapier for the core of a rounded box
const MIN_CORE_HALF_EXTENT: f32 = 0.01;

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Every collider bounces perfectly and slides without friction
fn elastic(builder: ColliderBuilder) -> Collider {
    builder
        .restitution(1.0)
        .restitution_combine_rule(CoefficientCombineRule::Max)
        .friction(0.0)
        .friction_combine_rule(CoefficientCombineRule::Min)
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .build()
}

/// rapier2d world plus the mapping between rapier handles and [`BodyId`]s
pub struct RapierPhysics {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<BodyId, RigidBodyHandle>,
    collider_to_body: HashMap<ColliderHandle, BodyId>,
    next_id: u32,
}

impl Default for RapierPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierPhysics {
    pub fn new() -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.length_unit = PIXELS_PER_METER;

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector::new(0.0, 0.0),
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            collider_to_body: HashMap::new(),
            // 0 is the placeholder id used before a body exists
            next_id: 1,
        }
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let handle = self.rigid_body_set.insert(body);
        let collider =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.handles.insert(id, handle);
        self.collider_to_body.insert(collider, id);
        id
    }

    fn body(&self, body: BodyId) -> Option<&RigidBody> {
        self.handles
            .get(&body)
            .and_then(|handle| self.rigid_body_set.get(*handle))
    }

    fn body_mut(&mut self, body: BodyId) -> Result<&mut RigidBody, RoundError> {
        self.handles
            .get(&body)
            .and_then(|handle| self.rigid_body_set.get_mut(*handle))
            .ok_or(RoundError::BodyNotFound(body))
    }
}

impl PhysicsAdapter for RapierPhysics {
    fn create_static_body(&mut self, rect: Rect) -> BodyId {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(rect.center))
            .build();

        let corner = rect.corner_radius;
        let shape = if corner > 0.0 {
            let core = (rect.half_extents - Vec2::splat(corner)).max(Vec2::splat(MIN_CORE_HALF_EXTENT));
            ColliderBuilder::round_cuboid(core.x, core.y, corner)
        } else {
            ColliderBuilder::cuboid(rect.half_extents.x, rect.half_extents.y)
        };

        self.insert(body, elastic(shape))
    }

    fn create_ball_body(&mut self, center: Vec2, radius: f32) -> BodyId {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(center))
            .lock_rotations()
            .ccd_enabled(true)
            .can_sleep(false)
            .build();

        self.insert(body, elastic(ColliderBuilder::ball(radius)))
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), RoundError> {
        let rb = self.body_mut(body)?;
        if rb.is_dynamic() {
            rb.set_linvel(to_vector(velocity), true);
        }
        Ok(())
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) -> Result<(), RoundError> {
        self.body_mut(body)?.set_translation(to_vector(position), true);
        Ok(())
    }

    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.body(body).map(|rb| to_vec2(rb.translation()))
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.body(body).map(|rb| to_vec2(rb.linvel()))
    }

    fn remove_body(&mut self, body: BodyId) -> Result<(), RoundError> {
        let handle = self
            .handles
            .remove(&body)
            .ok_or(RoundError::BodyNotFound(body))?;
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_body.retain(|_, id| *id != body);
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Vec<ContactPair> {
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        // Only contact starts matter; a ball resting against a wall reports nothing
        let mut seen = HashSet::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                let a = self.collider_to_body.get(&h1).copied();
                let b = self.collider_to_body.get(&h2).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    seen.insert(ContactPair::new(a, b));
                }
            }
        }

        // Channel order is not stable across runs
        let mut contacts: Vec<ContactPair> = seen.into_iter().collect();
        contacts.sort();
        contacts
    }

    fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

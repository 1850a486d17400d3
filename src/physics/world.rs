//! The rigid-body world owned by the bridge.
//!
//! rapier owns its own body/collider storage, so the world lives outside the
//! ECS as a resource; entity registration maps between Bevy [`Entity`] ids and
//! rapier handles in both directions, with the entity bits mirrored into the
//! body's `user_data` as an opaque back-reference.
//!
//! Stepping is fixed-increment: frame time is accumulated (capped to bound
//! worst-case per-frame work), drained in whole steps, and one trailing step
//! always runs so the world advances even on a zero-delta frame.
use std::collections::HashMap;
use std::num::NonZeroUsize;

use bevy::prelude::*;
use rapier2d::na as nalgebra;
use rapier2d::prelude::{
    ActiveEvents, CCDSolver, ChannelEventCollector, ColliderBuilder, ColliderHandle,
    ColliderSet, CollisionEvent, ContactForceEvent, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, SharedShape, Vector, vector,
};

use crate::core::config::PhysicsConfig;
use crate::physics::categories::interaction_groups;

/// Component linking an entity to its rigid body. The reverse association is
/// the body's `user_data` plus the world's handle maps.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyHandle(pub RigidBodyHandle);

/// A begin-contact pair resolved to owning entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub a: Entity,
    pub b: Entity,
}

/// Fixed-step time accumulator.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepAccumulator {
    acc: f32,
    step: f32,
    cap: f32,
}

impl FixedStepAccumulator {
    pub fn new(step: f32, cap: f32) -> Self {
        Self {
            acc: 0.0,
            step,
            cap,
        }
    }

    /// Feed one frame's wall-clock delta and return the number of steps to
    /// run: every whole step currently accumulated plus the mandatory
    /// trailing step. The sub-step remainder stays in the accumulator.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.acc = (self.acc + frame_dt.max(0.0)).min(self.cap);
        let full = (self.acc / self.step).floor() as u32;
        self.acc -= full as f32 * self.step;
        full + 1
    }

    pub fn remainder(&self) -> f32 {
        self.acc
    }

    pub fn step_size(&self) -> f32 {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Collider shape in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Cuboid { half_x: f32, half_y: f32 },
    Ball { radius: f32 },
}

/// Everything needed to build a body + collider for one entity.
#[derive(Debug, Clone, Copy)]
pub struct BodySpec {
    /// World position in meters.
    pub position: Vec2,
    pub kind: BodyKind,
    pub shape: BodyShape,
    pub memberships: u32,
    pub filter: u32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub sensor: bool,
    pub linvel: Vec2,
    /// 0.0 floats (impact-movable but not falling), 1.0 is normal weight.
    pub gravity_scale: f32,
    pub ccd: bool,
    pub lock_rotations: bool,
}

impl Default for BodySpec {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            kind: BodyKind::Static,
            shape: BodyShape::Cuboid {
                half_x: 0.5,
                half_y: 0.5,
            },
            memberships: 0,
            filter: 0,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            sensor: false,
            linvel: Vec2::ZERO,
            gravity_scale: 1.0,
            ccd: false,
            lock_rotations: false,
        }
    }
}

/// Owns the rapier simulation and the entity <-> body association.
#[derive(Resource)]
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    accumulator: FixedStepAccumulator,
    body_of_entity: HashMap<Entity, RigidBodyHandle>,
    entity_of_collider: HashMap<ColliderHandle, Entity>,
}

impl PhysicsWorld {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = cfg.time_step;
        if let Some(n) = NonZeroUsize::new(cfg.velocity_iterations) {
            params.num_solver_iterations = n;
        }
        params.num_internal_pgs_iterations = cfg.position_iterations.max(1);
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, cfg.gravity_y],
            integration_params: params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            accumulator: FixedStepAccumulator::new(cfg.time_step, cfg.max_accumulated),
            body_of_entity: HashMap::new(),
            entity_of_collider: HashMap::new(),
        }
    }

    /// Build a body + collider for `entity`. Registering an entity twice is a
    /// no-op returning the existing handle.
    pub fn spawn_body(&mut self, entity: Entity, spec: BodySpec) -> RigidBodyHandle {
        if let Some(&existing) = self.body_of_entity.get(&entity) {
            warn!(target: "physics", "entity {entity:?} already has a body; spawn_body ignored");
            return existing;
        }
        let builder = match spec.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let mut builder = builder
            .translation(vector![spec.position.x, spec.position.y])
            .linvel(vector![spec.linvel.x, spec.linvel.y])
            .gravity_scale(spec.gravity_scale)
            .user_data(entity.to_bits() as u128)
            .ccd_enabled(spec.ccd);
        if spec.lock_rotations {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder.build());

        let shape: SharedShape = match spec.shape {
            BodyShape::Cuboid { half_x, half_y } => SharedShape::cuboid(half_x, half_y),
            BodyShape::Ball { radius } => SharedShape::ball(radius),
        };
        let collider = ColliderBuilder::new(shape)
            .density(spec.density)
            .friction(spec.friction)
            .restitution(spec.restitution)
            .sensor(spec.sensor)
            .collision_groups(interaction_groups(spec.memberships, spec.filter))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(entity.to_bits() as u128)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.body_of_entity.insert(entity, handle);
        self.entity_of_collider.insert(collider_handle, entity);
        handle
    }

    /// Remove `entity`'s body and colliders. Idempotent: a second call (or a
    /// call for an entity that never had a body) does nothing and returns
    /// false, and can never touch an unrelated body.
    pub fn destroy_body(&mut self, entity: Entity) -> bool {
        let Some(handle) = self.body_of_entity.remove(&entity) else {
            return false;
        };
        // Liveness check before removal: the handle must still refer to the
        // body registered for this entity.
        let alive = self
            .bodies
            .get(handle)
            .map(|rb| rb.user_data == entity.to_bits() as u128)
            .unwrap_or(false);
        if !alive {
            self.entity_of_collider.retain(|_, e| *e != entity);
            return false;
        }
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.entity_of_collider.retain(|_, e| *e != entity);
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.body_of_entity.contains_key(&entity)
    }

    pub fn body_count(&self) -> usize {
        self.body_of_entity.len()
    }

    pub fn handle_of(&self, entity: Entity) -> Option<RigidBodyHandle> {
        self.body_of_entity.get(&entity).copied()
    }

    /// World-space pose of a body: (translation in meters, angle in radians).
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        let rb = self.bodies.get(handle)?;
        let t = rb.translation();
        Some((Vec2::new(t.x, t.y), rb.rotation().angle()))
    }

    pub fn pose_of(&self, entity: Entity) -> Option<(Vec2, f32)> {
        self.body_pose(self.handle_of(entity)?)
    }

    pub fn linvel_of(&self, entity: Entity) -> Option<Vec2> {
        let rb = self.bodies.get(self.handle_of(entity)?)?;
        let v = rb.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) {
        if let Some(handle) = self.handle_of(entity) {
            if let Some(rb) = self.bodies.get_mut(handle) {
                rb.apply_impulse(vector![impulse.x, impulse.y], true);
            }
        }
    }

    pub fn set_linvel(&mut self, entity: Entity, linvel: Vec2) {
        if let Some(handle) = self.handle_of(entity) {
            if let Some(rb) = self.bodies.get_mut(handle) {
                rb.set_linvel(vector![linvel.x, linvel.y], true);
            }
        }
    }

    /// Editor write-back path: user-authored edits go through the command
    /// layer and land here; the per-tick render sync never writes this way.
    pub fn set_body_pose(&mut self, entity: Entity, position: Vec2, angle: f32) {
        if let Some(handle) = self.handle_of(entity) {
            if let Some(rb) = self.bodies.get_mut(handle) {
                rb.set_translation(vector![position.x, position.y], true);
                rb.set_rotation(rapier2d::prelude::Rotation::new(angle), true);
            }
        }
    }

    /// Advance by one frame's wall-clock delta using the fixed-step
    /// accumulator; returns begin-contact pairs resolved to owning entities.
    pub fn step_frame(&mut self, frame_dt: f32) -> Vec<ContactPair> {
        let steps = self.accumulator.advance(frame_dt);
        self.step_n(steps)
    }

    /// Run exactly `steps` fixed steps, collecting begin-contact events.
    pub fn step_n(&mut self, steps: u32) -> Vec<ContactPair> {
        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        for _ in 0..steps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_params,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &event_handler,
            );
        }

        let mut pairs = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                // Bodies not owned by a tracked entity are ignored.
                let a = self.entity_of_collider.get(&h1).copied();
                let b = self.entity_of_collider.get(&h2).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    pairs.push(ContactPair { a, b });
                }
            }
        }
        // Channel delivery order may vary; sort for deterministic handling.
        pairs.sort_by_key(|p| {
            let (a, b) = (p.a.to_bits(), p.b.to_bits());
            (a.min(b), a.max(b))
        });
        pairs.dedup_by_key(|p| {
            let (a, b) = (p.a.to_bits(), p.b.to_bits());
            (a.min(b), a.max(b))
        });
        pairs
    }

    pub fn accumulator(&self) -> &FixedStepAccumulator {
        &self.accumulator
    }
}

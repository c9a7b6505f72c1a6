use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyDesc, BodyHandle, BodyPose, BodyType, Contact, PhysicsAdapter};
use crate::config::PhysicsSettings;

/// Collects `Started` collision events during a step.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((a, b));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// rapier2d-backed [`PhysicsAdapter`].
pub struct RapierPhysics {
    gravity: Vector<Real>,
    linear_damping: Real,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Our handle → rapier handle.  The reverse lookup is the body's `user_data`.
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    speed_caps: HashMap<BodyHandle, Vec2>,
    next_handle: u64,
}

impl RapierPhysics {
    pub fn new(settings: &PhysicsSettings) -> Self {
        Self {
            gravity: vector![settings.gravity[0], settings.gravity[1]],
            linear_damping: settings.linear_damping(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            speed_caps: HashMap::new(),
            next_handle: 0,
        }
    }

    fn body_of_collider(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        let parent = self.colliders.get(collider)?.parent()?;
        let body = self.bodies.get(parent)?;
        Some(BodyHandle(body.user_data as u64))
    }

    fn clamp_velocities(&mut self) {
        for (handle, cap) in &self.speed_caps {
            let Some(rb) = self.handles.get(handle).and_then(|h| self.bodies.get_mut(*h)) else {
                continue;
            };
            let v = *rb.linvel();
            let clamped = vector![v.x.clamp(-cap.x, cap.x), v.y.clamp(-cap.y, cap.y)];
            if clamped != v {
                rb.set_linvel(clamped, false);
            }
        }
    }
}

impl PhysicsAdapter for RapierPhysics {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        let builder = match desc.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic().linear_damping(self.linear_damping),
            BodyType::Static => RigidBodyBuilder::fixed(),
            BodyType::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let mut builder = builder
            .translation(vector![desc.position.x, desc.position.y])
            .user_data(handle.0 as u128);
        if desc.lock_rotation {
            builder = builder.lock_rotations();
        }
        let rb = self.bodies.insert(builder.build());

        let mut collision_types = ActiveCollisionTypes::default();
        if desc.touches_static {
            collision_types |= ActiveCollisionTypes::KINEMATIC_FIXED | ActiveCollisionTypes::FIXED_FIXED;
        }
        let mut collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .friction(desc.friction)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(collision_types);
        if let (BodyType::Dynamic, Some(mass)) = (desc.body_type, desc.mass) {
            collider = collider.mass(mass);
        }
        self.colliders.insert_with_parent(collider.build(), rb, &mut self.bodies);

        self.handles.insert(handle, rb);
        if let Some(cap) = desc.max_velocity {
            self.speed_caps.insert(handle, cap);
        }
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(rb) = self.handles.remove(&handle) else { return false };
        self.speed_caps.remove(&handle);
        self.bodies
            .remove(
                rb,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        let params = IntegrationParameters { dt, ..Default::default() };
        let collector = ContactCollector::default();

        self.pipeline.step(
            &self.gravity,
            &params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &collector,
        );

        self.clamp_velocities();

        // Forces last one step.
        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }

        let started = collector.started.into_inner().unwrap_or_default();
        started
            .into_iter()
            .filter_map(|(a, b)| {
                Some(Contact { a: self.body_of_collider(a)?, b: self.body_of_collider(b)? })
            })
            .collect()
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        if let Some(rb) = self.handles.get(&handle).and_then(|h| self.bodies.get_mut(*h)) {
            rb.add_force(vector![force.x, force.y], true);
        }
    }

    fn set_friction(&mut self, handle: BodyHandle, friction: f32) {
        let Some(rb) = self.handles.get(&handle).and_then(|h| self.bodies.get(*h)) else {
            return;
        };
        let attached: Vec<ColliderHandle> = rb.colliders().to_vec();
        for ch in attached {
            if let Some(collider) = self.colliders.get_mut(ch) {
                collider.set_friction(friction);
            }
        }
    }

    fn pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        let rb = self.bodies.get(*self.handles.get(&handle)?)?;
        let t = rb.translation();
        Some(BodyPose { position: Vec2::new(t.x, t.y), angle: rb.rotation().angle() })
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        let rb = self.bodies.get(*self.handles.get(&handle)?)?;
        let v = rb.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }
}

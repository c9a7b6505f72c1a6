//! Physics capability.
//!
//! Game code never touches the physics engine directly; it talks to a
//! [`PhysicsAdapter`] through opaque [`BodyHandle`]s.  The production adapter
//! wraps rapier2d ([`rapier::RapierPhysics`]); tests substitute a recorder.

pub mod rapier;

use glam::Vec2;

use crate::config::{PhysicsSettings, SpriteSettings};
use crate::world::EntityKind;

pub use rapier::RapierPhysics;

/// Adapter-issued identifier for one rigid body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyType {
    /// Moves under forces and contacts.
    Dynamic,
    /// Immovable; infinite mass.
    Static,
    /// Immovable like `Static`, but still tested against static bodies.
    Kinematic,
}

/// Everything the adapter needs to create a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    /// Half width / half height of the box collider.
    pub half_extents: Vec2,
    /// `None` keeps the adapter's default mass.  Ignored for static bodies.
    pub mass: Option<f32>,
    pub friction: f32,
    /// Infinite rotational inertia.
    pub lock_rotation: bool,
    /// Per-axis speed cap applied after every step.
    pub max_velocity: Option<Vec2>,
    /// Generate contacts against static bodies even when this body is not
    /// dynamic.
    pub touches_static: bool,
}

impl BodyDesc {
    /// Per-kind physical parameters.
    ///
    /// * Player: dynamic, configured mass, rotation locked, speed capped.
    /// * Wall: static.
    /// * Animal: dynamic, default inertia.
    /// * Breakable: kinematic and never moved, so it behaves like a wall but
    ///   still reports contacts with walls.
    pub fn for_kind(
        kind: EntityKind,
        position: Vec2,
        physics: &PhysicsSettings,
        sprites: &SpriteSettings,
    ) -> Self {
        let half_extents = Vec2::splat(kind.sprite_size(sprites) * 0.5);
        let base = Self {
            body_type: BodyType::Static,
            position,
            half_extents,
            mass: None,
            friction: physics.friction,
            lock_rotation: false,
            max_velocity: None,
            touches_static: false,
        };
        match kind {
            EntityKind::Player => Self {
                body_type: BodyType::Dynamic,
                mass: Some(physics.player_mass),
                lock_rotation: true,
                max_velocity: Some(Vec2::splat(physics.max_speed)),
                ..base
            },
            EntityKind::Wall => base,
            EntityKind::Animal => Self {
                body_type: BodyType::Dynamic,
                mass: Some(physics.animal_mass),
                ..base
            },
            EntityKind::Breakable => Self {
                body_type: BodyType::Kinematic,
                touches_static: true,
                ..base
            },
        }
    }
}

/// A contact that began during the last step.  Order of `a`/`b` is arbitrary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

/// Snapshot of a body's pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyPose {
    pub position: Vec2,
    /// Radians, counter-clockwise.
    pub angle: f32,
}

pub trait PhysicsAdapter {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Remove a body.  Returns `false` if the handle was unknown or already
    /// removed; calling this twice is harmless.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// Advance the simulation by `dt` seconds and return contacts that
    /// started during the step.  Forces applied before the step are consumed.
    fn step(&mut self, dt: f32) -> Vec<Contact>;

    /// Apply `force` for the next step only.
    fn apply_force(&mut self, handle: BodyHandle, force: Vec2);

    fn set_friction(&mut self, handle: BodyHandle, friction: f32);

    fn pose(&self, handle: BodyHandle) -> Option<BodyPose>;

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2>;

    fn body_count(&self) -> usize;
}

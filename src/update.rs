//! The fixed per-tick update:
//!
//! 1. step physics, resolve collision rules, sync entity poses;
//! 2. turn the held intents into a force on the player, or brake;
//! 3. age out breakables according to the configured decay policy.

use glam::Vec2;

use crate::collision::{self, CollisionListener};
use crate::config::{BreakableDecay, GameConfig};
use crate::input::{Direction, Intents};
use crate::physics::PhysicsAdapter;
use crate::world::World;

/// What the player's body should do this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Movement {
    /// Push in a direction with zero friction.
    Push(Direction),
    /// Raise friction to the stopping value and apply no force.
    Stop,
}

impl Movement {
    /// Resolve intents to at most one axis.
    ///
    /// Checked in order left, right, up, down; a direction only counts when
    /// its opposite is not also held.  Horizontal input therefore wins over
    /// vertical input, and diagonal motion never happens.
    pub fn from_intents(intents: &Intents) -> Self {
        if intents.left && !intents.right {
            Movement::Push(Direction::Left)
        } else if intents.right && !intents.left {
            Movement::Push(Direction::Right)
        } else if intents.up && !intents.down {
            Movement::Push(Direction::Up)
        } else if intents.down && !intents.up {
            Movement::Push(Direction::Down)
        } else {
            Movement::Stop
        }
    }

    pub fn force(self, magnitude: f32) -> Vec2 {
        match self {
            Movement::Push(dir) => dir.unit() * magnitude,
            Movement::Stop => Vec2::ZERO,
        }
    }
}

/// Apply `movement` to the player's body.
pub fn drive_player(world: &World, physics: &mut dyn PhysicsAdapter, movement: Movement, config: &GameConfig) {
    let Some(body) = world.player().body else { return };
    match movement {
        Movement::Push(_) => {
            physics.apply_force(body, movement.force(config.physics.move_force));
            physics.set_friction(body, 0.0);
        }
        Movement::Stop => physics.set_friction(body, config.physics.stop_friction),
    }
}

/// Remove breakables per `policy`.  Returns how many were removed.
pub fn decay_breakables(world: &mut World, physics: &mut dyn PhysicsAdapter, policy: BreakableDecay) -> usize {
    match policy {
        BreakableDecay::EveryTick => usize::from(world.pop_breakable(physics).is_some()),
        BreakableDecay::AfterTicks { ticks } => world.expire_breakables(ticks, physics),
        BreakableDecay::Never => 0,
    }
}

/// Run one full tick.
pub fn tick(
    world: &mut World,
    physics: &mut dyn PhysicsAdapter,
    listeners: &mut [Box<dyn CollisionListener>],
    config: &GameConfig,
) -> Movement {
    let contacts = physics.step(config.physics.timestep);
    collision::dispatch(&contacts, world, physics, listeners);
    world.sync_from(physics);

    let movement = Movement::from_intents(&world.intents);
    drive_player(world, physics, movement, config);

    world.advance_tick();
    decay_breakables(world, physics, config.actions.breakable_decay);
    movement
}

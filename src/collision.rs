//! Post-step collision rules.
//!
//! The physics adapter reports raw body contacts; this module maps them back
//! to entities and hands matching pairs to the installed listeners.

use crate::physics::{Contact, PhysicsAdapter};
use crate::world::{EntityId, EntityKind, World};

pub trait CollisionListener {
    /// The ordered pair of kinds this listener reacts to.
    fn kinds(&self) -> (EntityKind, EntityKind);

    /// Called after the step that produced the contact.  `first` has kind
    /// `kinds().0`, `second` has kind `kinds().1`; both are alive.
    fn on_contact(
        &mut self,
        world: &mut World,
        physics: &mut dyn PhysicsAdapter,
        first: EntityId,
        second: EntityId,
    );
}

/// A breakable touching a wall destroys both.
#[derive(Debug, Default)]
pub struct WallBreakRule {
    breaks: u64,
}

impl WallBreakRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of walls broken so far.
    pub fn breaks(&self) -> u64 {
        self.breaks
    }
}

impl CollisionListener for WallBreakRule {
    fn kinds(&self) -> (EntityKind, EntityKind) {
        (EntityKind::Breakable, EntityKind::Wall)
    }

    fn on_contact(
        &mut self,
        world: &mut World,
        physics: &mut dyn PhysicsAdapter,
        breakable: EntityId,
        wall: EntityId,
    ) {
        let removed_wall = world.despawn(wall, physics);
        let removed_breakable = world.despawn(breakable, physics);
        if removed_wall && removed_breakable {
            self.breaks += 1;
            tracing::info!(breakable = breakable.id(), wall = wall.id(), "break wall");
        }
    }
}

/// Route each contact to every listener whose kinds match, in either order.
///
/// Contacts are resolved against the world at dispatch time, so a body removed
/// by an earlier contact in the same batch is skipped.  Duplicate contacts for
/// one pair therefore fire at most once.
pub fn dispatch(
    contacts: &[Contact],
    world: &mut World,
    physics: &mut dyn PhysicsAdapter,
    listeners: &mut [Box<dyn CollisionListener>],
) {
    for contact in contacts {
        for listener in listeners.iter_mut() {
            let (Some(a), Some(b)) = (world.find_by_body(contact.a), world.find_by_body(contact.b)) else {
                break;
            };
            let (a_id, a_kind, b_id, b_kind) = (a.id, a.kind, b.id, b.kind);
            let (want_first, want_second) = listener.kinds();
            if a_kind == want_first && b_kind == want_second {
                listener.on_contact(world, physics, a_id, b_id);
            } else if b_kind == want_first && a_kind == want_second {
                listener.on_contact(world, physics, b_id, a_id);
            }
        }
    }
}

//! World state: every entity on the map, the player's facing, and the held
//! movement intents.  The `World` exclusively owns entity records; the
//! physics adapter only ever sees their [`BodyHandle`]s.

use glam::Vec2;

use crate::config::{GameConfig, SpriteSettings};
use crate::input::{Direction, Intents};
use crate::map::MapLayout;
use crate::physics::{BodyDesc, BodyHandle, PhysicsAdapter};

// ── EntityKind ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Wall,
    Animal,
    Breakable,
}

impl EntityKind {
    /// Sprite name in the sprite folder (file stem).
    pub fn sprite_name(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Wall | EntityKind::Breakable => "brick",
            EntityKind::Animal => "cow",
        }
    }

    pub fn sprite_scale(self, sprites: &SpriteSettings) -> f32 {
        match self {
            EntityKind::Player => sprites.player_scale,
            EntityKind::Wall | EntityKind::Breakable => sprites.tile_scale,
            EntityKind::Animal => sprites.animal_scale,
        }
    }

    /// Edge length of the drawn sprite (and of its collider) in world units.
    pub fn sprite_size(self, sprites: &SpriteSettings) -> f32 {
        sprites.image_size * self.sprite_scale(sprites)
    }
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn id(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Sprite centre in world units.
    pub position: Vec2,
    pub angle: f32,
    pub body: Option<BodyHandle>,
    /// World tick on which the entity was created.
    pub spawned_at: u64,
}

// ── World ────────────────────────────────────────────────────────────────────

pub struct World {
    next_id: u32,
    tick: u64,
    player: Entity,
    walls: Vec<Entity>,
    animals: Vec<Entity>,
    breakables: Vec<Entity>,
    /// Last direction pressed.  Never changed by a key release.
    pub facing: Direction,
    pub intents: Intents,
}

impl World {
    /// Build the world from a parsed map and register every entity with
    /// `physics`.
    pub fn setup(layout: &MapLayout, physics: &mut dyn PhysicsAdapter, config: &GameConfig) -> Self {
        let spawn = layout.player();
        let player_body =
            physics.add_body(&BodyDesc::for_kind(EntityKind::Player, spawn.position, &config.physics, &config.sprites));

        let mut world = Self {
            next_id: 1,
            tick: 0,
            player: Entity {
                id: EntityId(0),
                kind: EntityKind::Player,
                position: spawn.position,
                angle: 0.0,
                body: Some(player_body),
                spawned_at: 0,
            },
            walls: Vec::new(),
            animals: Vec::new(),
            breakables: Vec::new(),
            facing: Direction::Right,
            intents: Intents::default(),
        };

        for placement in layout.placements() {
            if placement.kind != EntityKind::Player {
                world.spawn(placement.kind, placement.position, physics, config);
            }
        }

        tracing::info!(
            walls = world.walls.len(),
            animals = world.animals.len(),
            "world ready, player at ({}, {})",
            spawn.position.x,
            spawn.position.y
        );
        world
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn walls(&self) -> &[Entity] {
        &self.walls
    }

    pub fn animals(&self) -> &[Entity] {
        &self.animals
    }

    pub fn breakables(&self) -> &[Entity] {
        &self.breakables
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Every entity in draw order: walls, player, animals, breakables.
    pub fn draw_order(&self) -> impl Iterator<Item = &Entity> {
        self.walls
            .iter()
            .chain(std::iter::once(&self.player))
            .chain(self.animals.iter())
            .chain(self.breakables.iter())
    }

    pub fn entity_count(&self) -> usize {
        1 + self.walls.len() + self.animals.len() + self.breakables.len()
    }

    /// Find the live entity owning `body`.
    pub fn find_by_body(&self, body: BodyHandle) -> Option<&Entity> {
        self.draw_order().find(|e| e.body == Some(body))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.draw_order().any(|e| e.id == id)
    }

    // ── Spawning ───────────────────────────────────────────────────────────

    /// Create a non-player entity at `position` and register its body.
    ///
    /// Player spawns are refused: exactly one player exists for the
    /// lifetime of the world.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        physics: &mut dyn PhysicsAdapter,
        config: &GameConfig,
    ) -> Option<EntityId> {
        let list = match kind {
            EntityKind::Player => return None,
            EntityKind::Wall => &mut self.walls,
            EntityKind::Animal => &mut self.animals,
            EntityKind::Breakable => &mut self.breakables,
        };
        let body = physics.add_body(&BodyDesc::for_kind(kind, position, &config.physics, &config.sprites));
        let id = EntityId(self.next_id);
        self.next_id += 1;
        list.push(Entity { id, kind, position, angle: 0.0, body: Some(body), spawned_at: self.tick });
        tracing::debug!(?kind, id = id.0, x = position.x, y = position.y, "spawned");
        Some(id)
    }

    // ── Removal ────────────────────────────────────────────────────────────

    /// Remove a non-player entity from its collection and from `physics`.
    ///
    /// Returns `false` when the entity is already gone, so repeated calls for
    /// the same id are harmless.
    pub fn despawn(&mut self, id: EntityId, physics: &mut dyn PhysicsAdapter) -> bool {
        let Some(entity) = self.take(id) else { return false };
        if let Some(body) = entity.body {
            physics.remove_body(body);
        }
        tracing::debug!(kind = ?entity.kind, id = id.0, "despawned");
        true
    }

    /// Remove the most recently placed breakable.
    pub fn pop_breakable(&mut self, physics: &mut dyn PhysicsAdapter) -> Option<EntityId> {
        let entity = self.breakables.pop()?;
        if let Some(body) = entity.body {
            physics.remove_body(body);
        }
        Some(entity.id)
    }

    /// Remove every breakable spawned at least `ticks` ticks ago.
    pub fn expire_breakables(&mut self, ticks: u64, physics: &mut dyn PhysicsAdapter) -> usize {
        let now = self.tick;
        let (expired, kept): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.breakables)
            .into_iter()
            .partition(|e| now.saturating_sub(e.spawned_at) >= ticks);
        self.breakables = kept;
        for entity in &expired {
            if let Some(body) = entity.body {
                physics.remove_body(body);
            }
        }
        expired.len()
    }

    fn take(&mut self, id: EntityId) -> Option<Entity> {
        for list in [&mut self.walls, &mut self.animals, &mut self.breakables] {
            if let Some(idx) = list.iter().position(|e| e.id == id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    // ── Physics sync ───────────────────────────────────────────────────────

    /// Copy each body's pose back onto its entity.
    pub fn sync_from(&mut self, physics: &dyn PhysicsAdapter) {
        let lists = [&mut self.walls, &mut self.animals, &mut self.breakables];
        for entity in std::iter::once(&mut self.player).chain(lists.into_iter().flat_map(|l| l.iter_mut())) {
            if let Some(pose) = entity.body.and_then(|b| physics.pose(b)) {
                entity.position = pose.position;
                entity.angle = pose.angle;
            }
        }
    }
}

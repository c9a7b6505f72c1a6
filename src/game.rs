use glam::Vec2;

use crate::collision::{CollisionListener, WallBreakRule};
use crate::config::GameConfig;
use crate::engine::{Engine, Game};
use crate::input::{self, Command, KeyBindings, KeyCode};
use crate::map::MapLayout;
use crate::physics::PhysicsAdapter;
use crate::update::{self, Movement};
use crate::world::{EntityId, EntityKind, World};

/// Sound played when a wall is placed.
pub const HIT_SOUND: &str = "hit";

/// Sprites every map needs.
pub const REQUIRED_SPRITES: [&str; 3] = ["player", "brick", "cow"];

/// One queued sprite in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    pub name: &'static str,
    pub center: Vec2,
    pub size: Vec2,
    pub angle: f32,
}

/// The farm demo: world, physics, bindings and collision rules.
///
/// Everything here is independent of the window, so the whole game can be
/// driven headless by calling [`FarmGame::key_down`], [`FarmGame::key_up`]
/// and [`FarmGame::tick`].
pub struct FarmGame {
    config: GameConfig,
    bindings: KeyBindings,
    world: World,
    physics: Box<dyn PhysicsAdapter>,
    listeners: Vec<Box<dyn CollisionListener>>,
    last_movement: Movement,
}

impl FarmGame {
    pub fn new(config: GameConfig, layout: &MapLayout, mut physics: Box<dyn PhysicsAdapter>) -> Self {
        let world = World::setup(layout, physics.as_mut(), &config);
        Self {
            config,
            bindings: KeyBindings::default(),
            world,
            physics,
            listeners: vec![Box::new(WallBreakRule::new())],
            last_movement: Movement::Stop,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &dyn PhysicsAdapter {
        self.physics.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn last_movement(&self) -> Movement {
        self.last_movement
    }

    // ── Input ──────────────────────────────────────────────────────────────

    /// Handle a fresh key press; returns the command that was executed, if any.
    pub fn key_down(&mut self, key: KeyCode) -> Option<Command> {
        let command = input::key_down(&self.bindings, &mut self.world, key)?;
        self.execute(command);
        Some(command)
    }

    pub fn key_up(&mut self, key: KeyCode) {
        input::key_up(&self.bindings, &mut self.world, key);
    }

    fn execute(&mut self, command: Command) -> Option<EntityId> {
        let player = self.world.player().position;
        let (kind, position) = match command {
            Command::PlaceWall => (EntityKind::Wall, player),
            Command::PlaceBreak => (
                EntityKind::Breakable,
                player + self.world.facing.unit() * self.config.actions.break_offset,
            ),
        };
        self.world.spawn(kind, position, self.physics.as_mut(), &self.config)
    }

    // ── Update / draw ──────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.last_movement =
            update::tick(&mut self.world, self.physics.as_mut(), &mut self.listeners, &self.config);
    }

    /// Sprites in draw order: walls, player, animals, breakables.
    pub fn sprites(&self) -> Vec<SpriteDraw> {
        self.world
            .draw_order()
            .map(|e| {
                let size = e.kind.sprite_size(&self.config.sprites);
                SpriteDraw {
                    name: e.kind.sprite_name(),
                    center: e.position,
                    size: Vec2::splat(size),
                    angle: e.angle,
                }
            })
            .collect()
    }
}

impl Game for FarmGame {
    fn on_enter(&mut self, _engine: &mut Engine) {
        tracing::info!("arrows/WASD move, J places a wall, K places a breakable");
    }

    fn on_key_press(&mut self, engine: &mut Engine, key: KeyCode) {
        if self.key_down(key) == Some(Command::PlaceWall) {
            engine.play_sound(HIT_SOUND);
        }
    }

    fn on_key_release(&mut self, _engine: &mut Engine, key: KeyCode) {
        self.key_up(key);
    }

    fn update(&mut self, _engine: &mut Engine) {
        self.tick();
    }

    fn render(&mut self, engine: &mut Engine) {
        for sprite in self.sprites() {
            engine.draw_sprite(sprite.name, sprite.center, sprite.size, sprite.angle);
        }
    }
}

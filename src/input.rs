use std::collections::HashMap;

use glam::Vec2;
pub use winit::keyboard::KeyCode;

use crate::world::World;

// ── Direction / Intents ──────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in world space (Y up).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Held-key movement flags, one per direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Intents {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

// ── Actions ──────────────────────────────────────────────────────────────────

/// Logical meaning of a bound key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Held movement in a direction.
    Move(Direction),
    /// Drop a wall where the player stands.
    PlaceWall,
    /// Drop a breakable brick in front of the player.
    PlaceBreak,
}

/// Discrete, edge-triggered command produced by a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    PlaceWall,
    PlaceBreak,
}

/// Maps physical keys to logical actions.  Several keys may share an action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Action>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn action(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to `action`.
    pub fn keys_for(&self, action: Action) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> =
            self.bindings.iter().filter(|(_, a)| **a == action).map(|(k, _)| *k).collect();
        keys.sort_by_key(|k| format!("{k:?}"));
        keys
    }
}

impl Default for KeyBindings {
    /// Arrow keys and WASD for movement, `J` places a wall, `K` a breakable.
    fn default() -> Self {
        let mut b = Self::new();
        b.bind(KeyCode::ArrowLeft, Action::Move(Direction::Left));
        b.bind(KeyCode::KeyA, Action::Move(Direction::Left));
        b.bind(KeyCode::ArrowRight, Action::Move(Direction::Right));
        b.bind(KeyCode::KeyD, Action::Move(Direction::Right));
        b.bind(KeyCode::ArrowUp, Action::Move(Direction::Up));
        b.bind(KeyCode::KeyW, Action::Move(Direction::Up));
        b.bind(KeyCode::ArrowDown, Action::Move(Direction::Down));
        b.bind(KeyCode::KeyS, Action::Move(Direction::Down));
        b.bind(KeyCode::KeyJ, Action::PlaceWall);
        b.bind(KeyCode::KeyK, Action::PlaceBreak);
        b
    }
}

// ── Key handling ─────────────────────────────────────────────────────────────

/// Apply a key press to the world's intent flags and facing.
///
/// Movement keys raise their flag and turn the player; action keys return
/// the command to execute and leave movement state untouched.
pub fn key_down(bindings: &KeyBindings, world: &mut World, key: KeyCode) -> Option<Command> {
    match bindings.action(key)? {
        Action::Move(dir) => {
            world.intents.set(dir, true);
            world.facing = dir;
            None
        }
        Action::PlaceWall => Some(Command::PlaceWall),
        Action::PlaceBreak => Some(Command::PlaceBreak),
    }
}

/// Apply a key release.  Facing is left as it was.
pub fn key_up(bindings: &KeyBindings, world: &mut World, key: KeyCode) {
    if let Some(Action::Move(dir)) = bindings.action(key) {
        world.intents.set(dir, false);
    }
}

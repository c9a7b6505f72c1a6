use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Fixed location of the optional config file, relative to the working directory.
pub const CONFIG_PATH: &str = "farmgame.json";

// ── WindowSettings ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Visible grid size in tiles.
    pub grid_width: u32,
    pub grid_height: u32,
    /// Clear color, sRGB RGBA.
    pub background: [f32; 4],
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Farm Game".into(),
            grid_width: 25,
            grid_height: 16,
            background: [0.0, 100.0 / 255.0, 0.0, 1.0],
        }
    }
}

// ── PhysicsSettings ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: [f32; 2],
    /// Fraction of velocity a dynamic body keeps after one second of free motion.
    pub damping: f32,
    /// Seconds simulated per physics step (and per game tick).
    pub timestep: f32,
    pub player_mass: f32,
    pub animal_mass: f32,
    /// Friction coefficient shared by every body kind.
    pub friction: f32,
    /// Player friction while no movement key resolves to a direction.
    pub stop_friction: f32,
    pub move_force: f32,
    /// Per-axis player speed cap.
    pub max_speed: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0],
            damping: 0.0005,
            timestep: 1.0 / 60.0,
            player_mass: 2.0,
            animal_mass: 1.0,
            friction: 2.0,
            stop_friction: 10.0,
            move_force: 3500.0,
            max_speed: 800.0,
        }
    }
}

impl PhysicsSettings {
    /// Convert `damping` into a per-second linear damping coefficient
    /// (`v' = -c·v`), so that `e^{-c} == damping`.
    pub fn linear_damping(&self) -> f32 {
        if self.damping <= 0.0 {
            return 0.0;
        }
        -self.damping.clamp(f32::MIN_POSITIVE, 1.0).ln()
    }

    /// Game ticks per second implied by `timestep`.
    pub fn ticks_per_second(&self) -> u32 {
        if self.timestep <= 0.0 {
            return 60;
        }
        (1.0 / self.timestep).round().max(1.0) as u32
    }
}

// ── SpriteSettings ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    /// Edge length of the square source images in pixels.
    pub image_size: f32,
    pub player_scale: f32,
    pub animal_scale: f32,
    pub tile_scale: f32,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self { image_size: 128.0, player_scale: 0.8, animal_scale: 0.7, tile_scale: 0.5 }
    }
}

// ── MapSettings / ActionSettings ──────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// World units between adjacent grid cells.
    pub tile_stride: f32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self { tile_stride: 64.0 }
    }
}

/// How breakable bricks age out when they never touch a wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakableDecay {
    /// Remove the most recently placed breakable at the end of every tick.
    #[default]
    EveryTick,
    /// Remove each breakable once it has existed for `ticks` ticks.
    AfterTicks { ticks: u64 },
    /// Breakables only disappear by breaking a wall.
    Never,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSettings {
    /// Distance from the player at which a breakable is placed.
    pub break_offset: f32,
    pub breakable_decay: BreakableDecay,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self { break_offset: 40.0, breakable_decay: BreakableDecay::EveryTick }
    }
}

// ── AssetSettings ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub map: PathBuf,
    /// Folder scanned for `player.png`, `brick.png` and `cow.png`.
    pub sprites: PathBuf,
    pub hit_sound: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            map: "assets/maps/testmap.csv".into(),
            sprites: "assets/images".into(),
            hit_sound: "assets/hit_sound.wav".into(),
        }
    }
}

// ── GameConfig ────────────────────────────────────────────────────────────────

/// All tunables in one place.  `Default` reproduces the stock game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub sprites: SpriteSettings,
    pub map: MapSettings,
    pub actions: ActionSettings,
    pub assets: AssetSettings,
}

impl GameConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("no config at '{}', using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|reason| GameError::Config { path: path.to_path_buf(), reason })
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Window size in physical pixels: the visible grid times the tile stride.
    pub fn window_size(&self) -> (u32, u32) {
        let stride = self.map.tile_stride.max(1.0);
        (
            (self.window.grid_width as f32 * stride) as u32,
            (self.window.grid_height as f32 * stride) as u32,
        )
    }
}

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::audio::{AudioContext, SoundConfig};
use crate::error::GameError;
use crate::input::KeyCode;
use crate::renderer::Renderer;
use crate::renderer::pipeline::SpriteVertex;
use crate::renderer::sprite_atlas::SpriteSheet;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
}

// ── Game trait ──────────────────────────────────────────────────────────────

/// Callbacks driven by the engine's event loop.
///
/// Per frame the engine first delivers key events, then runs `update` once
/// per elapsed fixed tick, then calls `render`.
pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    /// A key went down.  Auto-repeat is filtered out.
    fn on_key_press(&mut self, _engine: &mut Engine, _key: KeyCode) {}
    fn on_key_release(&mut self, _engine: &mut Engine, _key: KeyCode) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

// ── Sprite draw command ──────────────────────────────────────────────────────

struct SpriteCommand {
    name: &'static str,
    center: Vec2,
    size: Vec2,
    angle: f32,
    tint: Color,
}

/// Four corners of a `size` quad centred on `center`, rotated by `angle`
/// (counter-clockwise), in the order top-left, top-right, bottom-left,
/// bottom-right (world Y up).
pub fn quad_corners(center: Vec2, size: Vec2, angle: f32) -> [Vec2; 4] {
    let h = size * 0.5;
    let rot = Vec2::from_angle(angle);
    [
        Vec2::new(-h.x, h.y),
        Vec2::new(h.x, h.y),
        Vec2::new(-h.x, -h.y),
        Vec2::new(h.x, -h.y),
    ]
    .map(|c| center + rot.rotate(c))
}

// ── Frame recovery ──────────────────────────────────────────────────────────

/// What the loop does after a frame could not be acquired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameRecovery {
    /// Drop this frame; the next redraw tries again.
    Skip,
    /// Reconfigure the surface at the window's current size.
    Reconfigure,
    /// Stop the event loop and return the error from `run`.
    Fatal,
}

impl FrameRecovery {
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Timeout => Self::Skip,
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other => Self::Fatal,
        }
    }
}

/// A minimised window reports a zero-sized surface, which cannot be drawn to.
pub fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU surface, sprite pipeline and atlas.
    pub renderer: Renderer,
    /// Audio subsystem for sound effects.
    pub audio: AudioContext,
    clear_color: Color,
    /// Queued sprite draw calls; cleared before each render.
    sprite_commands: Vec<SpriteCommand>,
    /// Keys currently down, used to drop OS auto-repeat presses.
    keys_held: HashSet<KeyCode>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // ── Audio API ──────────────────────────────────────────────────────────

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name, SoundConfig::default());
    }

    // ── Sprite drawing ─────────────────────────────────────────────────────

    /// Queue a sprite by name.  Sprites draw in the order they are queued.
    pub fn draw_sprite(&mut self, name: &'static str, center: Vec2, size: Vec2, angle: f32) {
        self.draw_sprite_tinted(name, center, size, angle, Color::WHITE);
    }

    pub fn draw_sprite_tinted(&mut self, name: &'static str, center: Vec2, size: Vec2, angle: f32, tint: Color) {
        self.sprite_commands.push(SpriteCommand { name, center, size, angle, tint });
    }

    /// Build vertex data for the queued sprites.  Unknown sprite names are
    /// skipped.
    fn build_vertices(&self) -> Vec<SpriteVertex> {
        let mut verts = Vec::with_capacity(self.sprite_commands.len() * 6);
        for cmd in &self.sprite_commands {
            let Some(data) = self.renderer.sprite_data(cmd.name) else { continue };
            let [tl, tr, bl, br] = quad_corners(cmd.center, cmd.size, cmd.angle);
            let (uv_min, uv_max) = (data.uv_min, data.uv_max);
            let tint = cmd.tint.0;

            let tl = SpriteVertex { position: tl.into(), uv: uv_min,                  tint };
            let tr = SpriteVertex { position: tr.into(), uv: [uv_max[0], uv_min[1]], tint };
            let bl = SpriteVertex { position: bl.into(), uv: [uv_min[0], uv_max[1]], tint };
            let br = SpriteVertex { position: br.into(), uv: uv_max,                  tint };
            verts.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
        verts
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
    clear_color: Color,
    sprites: Option<SpriteSheet>,
    audio: Option<AudioContext>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "farmgame".into(),
            width: 800,
            height: 600,
            target_ups: 60,
            clear_color: Color::BLACK,
            sprites: None,
            audio: None,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }
    pub fn with_clear_color(mut self, color: Color) -> Self { self.clear_color = color; self }

    /// Sprites decoded ahead of time; uploaded once the window exists.
    pub fn with_sprites(mut self, sheet: SpriteSheet) -> Self {
        self.sprites = Some(sheet); self
    }

    /// Audio context with sounds already loaded.
    pub fn with_audio(mut self, audio: AudioContext) -> Self {
        self.audio = Some(audio); self
    }

    /// Open the window and run until it is closed.
    pub fn run(self, game: impl Game + 'static) -> Result<(), GameError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
            error: None,
        };
        event_loop.run_app(&mut app)?;
        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
    /// First fatal error; stops the loop and is returned from `run`.
    error: Option<GameError>,
}

impl App {
    fn create_engine(&mut self, event_loop: &ActiveEventLoop) -> Result<Engine, GameError> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
                    .with_resizable(false),
            )
            .map_err(|e| GameError::Platform(e.to_string()))?;

        let sheet = self.config.sprites.take().unwrap_or_default();
        let renderer = pollster::block_on(Renderer::new(Arc::new(window), &sheet))?;

        Ok(Engine {
            renderer,
            audio: self.config.audio.take().unwrap_or_default(),
            clear_color: self.config.clear_color,
            sprite_commands: Vec::new(),
            keys_held: HashSet::new(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GameError) {
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        match self.create_engine(event_loop) {
            Ok(mut engine) => {
                self.game.on_enter(&mut engine);
                self.engine = Some(engine);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => engine.renderer.resize(size),

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => match state {
                ElementState::Pressed => {
                    if engine.keys_held.insert(code) {
                        self.game.on_key_press(engine, code);
                    }
                }
                ElementState::Released => {
                    engine.keys_held.remove(&code);
                    self.game.on_key_release(engine, code);
                }
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    self.game.update(engine);
                    self.accumulator -= self.fixed_dt;
                }

                if !is_drawable(engine.renderer.window.inner_size()) {
                    return;
                }

                engine.sprite_commands.clear();
                self.game.render(engine);
                let verts = engine.build_vertices();

                let Err(e) = engine.renderer.render(&verts, engine.clear_color) else { return };
                match FrameRecovery::for_error(&e) {
                    FrameRecovery::Skip => tracing::warn!("frame skipped: {e}"),
                    FrameRecovery::Reconfigure => {
                        tracing::warn!("surface lost, reconfiguring");
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    FrameRecovery::Fatal => self.fail(event_loop, GameError::Render(e.to_string())),
                }
            }

            _ => {}
        }
    }
}

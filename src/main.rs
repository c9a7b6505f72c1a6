use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use farmgame::audio::AudioContext;
use farmgame::config::{CONFIG_PATH, GameConfig};
use farmgame::engine::{Color, Engine};
use farmgame::error::GameError;
use farmgame::game::{FarmGame, HIT_SOUND, REQUIRED_SPRITES};
use farmgame::map;
use farmgame::physics::RapierPhysics;
use farmgame::renderer::sprite_atlas::SpriteSheet;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let config = GameConfig::load_or_default(CONFIG_PATH)?;

    // Every asset is loaded before the window opens.
    let layout = map::load(&config.assets.map, config.map.tile_stride)?;
    let sprites = SpriteSheet::load_folder(&config.assets.sprites, &REQUIRED_SPRITES)?;
    let mut audio = AudioContext::new();
    audio.load_sound(HIT_SOUND, &config.assets.hit_sound)?;

    let (width, height) = config.window_size();
    let title = config.window.title.clone();
    let background = Color(config.window.background);
    let ups = config.physics.ticks_per_second();

    let physics = RapierPhysics::new(&config.physics);
    let game = FarmGame::new(config, &layout, Box::new(physics));
    info!(%title, width, height, ups, "opening window");

    Engine::builder()
        .with_title(&title)
        .with_size(width, height)
        .with_ups(ups)
        .with_clear_color(background)
        .with_sprites(sprites)
        .with_audio(audio)
        .run(game)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

use std::collections::HashMap;
use std::path::Path;

use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{PlaybackRate, static_sound::{StaticSoundData, StaticSoundSettings}},
    Volume,
};

use crate::error::GameError;

/// How to play a one-shot sound.
#[derive(Debug, Clone, Copy)]
pub struct SoundConfig {
    pub volume: f32,
    pub pitch: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { volume: 1.0, pitch: 1.0 }
    }
}

pub struct AudioContext {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!("failed to initialize audio: {e}; sound disabled");
                None
            }
        };
        Self { manager, sounds: HashMap::new() }
    }

    /// A context that never opens an output device.  Sounds still load, so
    /// missing files are reported the same way.
    pub fn disabled() -> Self {
        Self { manager: None, sounds: HashMap::new() }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Decode a sound file (OGG, WAV) into memory under `name`.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<(), GameError> {
        let path = path.as_ref();
        let sound = StaticSoundData::from_file(path).map_err(|e| GameError::asset(path, e))?;
        self.sounds.insert(name.to_string(), sound);
        tracing::debug!(name, "loaded sound from '{}'", path.display());
        Ok(())
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Play a loaded sound once.  Does nothing without an output device.
    pub fn play(&mut self, name: &str, config: SoundConfig) {
        let Some(manager) = self.manager.as_mut() else { return };
        let Some(data) = self.sounds.get(name) else {
            tracing::warn!(name, "unknown sound");
            return;
        };

        let mut settings = StaticSoundSettings::new();
        settings.playback_rate = PlaybackRate::Factor(config.pitch as f64).into();
        settings.volume = Volume::Amplitude(config.volume.clamp(0.0, 2.0) as f64).into();

        if let Err(e) = manager.play(data.clone().with_settings(settings)) {
            tracing::warn!(name, "failed to play sound: {e}");
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

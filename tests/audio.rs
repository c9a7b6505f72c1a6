use farmgame::audio::{AudioContext, SoundConfig};
use farmgame::error::GameError;
use farmgame::game::HIT_SOUND;

#[test]
fn test_missing_sound_is_asset_error() {
    let mut audio = AudioContext::disabled();
    let err = audio.load_sound(HIT_SOUND, "does/not/exist.wav").unwrap_err();
    assert!(matches!(err, GameError::AssetLoad { .. }));
    assert!(!audio.has_sound(HIT_SOUND));
}

#[test]
fn test_bundled_hit_sound_loads_without_device() {
    let mut audio = AudioContext::disabled();
    audio
        .load_sound(HIT_SOUND, concat!(env!("CARGO_MANIFEST_DIR"), "/assets/hit_sound.wav"))
        .unwrap();
    assert!(audio.has_sound(HIT_SOUND));
    assert!(!audio.is_available());
    // No device: playing is a silent no-op.
    audio.play(HIT_SOUND, SoundConfig::default());
}

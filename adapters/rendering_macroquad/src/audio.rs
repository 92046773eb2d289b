use std::fs;

use anyhow::{anyhow, Context, Result};
use macroquad::audio::{self, PlaySoundParams, Sound};
use zombie_pop_core::AudioCue;
use zombie_pop_rendering::{AssetManifest, SoundKey};

/// The theme plays through once when the window opens.
const THEME_PLAYBACK: PlaySoundParams = PlaySoundParams {
    looped: false,
    volume: 1.0,
};

/// Sounds loaded from the asset manifest.
pub(crate) struct SoundBank {
    theme: Sound,
    hit: Sound,
}

impl SoundBank {
    /// Loads the theme and hit sounds.
    pub(crate) async fn load(manifest: &AssetManifest) -> Result<Self> {
        Ok(Self {
            theme: load_sound(manifest, SoundKey::Theme).await?,
            hit: load_sound(manifest, SoundKey::Hit).await?,
        })
    }

    /// Starts the background theme.
    pub(crate) fn start_theme(&self) {
        audio::play_sound(self.theme, THEME_PLAYBACK);
    }

    /// Plays the sound associated with `cue` once.
    pub(crate) fn play(&self, cue: AudioCue) {
        match cue {
            AudioCue::Hit => audio::play_sound_once(self.hit),
        }
    }
}

async fn load_sound(manifest: &AssetManifest, key: SoundKey) -> Result<Sound> {
    let path = manifest.sound(key);
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sound {key:?} at {}", path.display()))?;
    audio::load_sound_from_bytes(&bytes)
        .await
        .map_err(|error| anyhow!("failed to decode sound {key:?}: {error:?}"))
}

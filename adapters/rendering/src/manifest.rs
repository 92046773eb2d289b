//! Asset manifest describing where every texture, font and sound lives.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_TEXTURE_KEYS: [TextureKey; 3] = [
    TextureKey::Background,
    TextureKey::Graves,
    TextureKey::Popup,
];
const ALL_SOUND_KEYS: [SoundKey; 2] = [SoundKey::Theme, SoundKey::Hit];

/// Single-image textures referenced by the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Full-screen backdrop drawn first every frame.
    Background,
    /// Sheet containing every grave sprite.
    Graves,
    /// Vertical strip the emerge animation is sliced from.
    Popup,
}

/// Sounds referenced by the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Looping background music.
    Theme,
    /// Played once per scored hit.
    Hit,
}

/// Resolved asset locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    textures: HashMap<TextureKey, PathBuf>,
    sounds: HashMap<SoundKey, PathBuf>,
    dying: Vec<PathBuf>,
    hud_font: PathBuf,
}

impl AssetManifest {
    /// Returns the default manifest path inside the provided asset directory.
    #[must_use]
    pub fn default_path(assets: impl AsRef<Path>) -> PathBuf {
        assets.as_ref().join("manifest.toml")
    }

    /// Loads and validates the manifest at `path`. Relative asset paths are
    /// resolved against the manifest's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!("failed to read asset manifest at {}", manifest_path.display())
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Parses manifest contents, resolving relative paths against `base_path`.
    pub fn parse(contents: &str, base_path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
        if raw.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported asset manifest version {}; expected {}",
                raw.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let textures = resolve_section(
            raw.textures,
            base_path,
            &ALL_TEXTURE_KEYS,
            parse_texture_key,
        )
        .context("invalid [textures] section")?;
        let sounds = resolve_section(raw.sounds, base_path, &ALL_SOUND_KEYS, parse_sound_key)
            .context("invalid [sounds] section")?;

        if raw.dying.is_empty() {
            bail!("asset manifest must list at least one dying frame");
        }
        let dying = raw
            .dying
            .into_iter()
            .map(|relative| base_path.join(relative))
            .collect();

        Ok(Self {
            textures,
            sounds,
            dying,
            hud_font: base_path.join(raw.fonts.hud),
        })
    }

    /// Location of the requested texture.
    #[must_use]
    pub fn texture(&self, key: TextureKey) -> &Path {
        self.textures
            .get(&key)
            .map_or_else(|| Path::new(""), PathBuf::as_path)
    }

    /// Location of the requested sound.
    #[must_use]
    pub fn sound(&self, key: SoundKey) -> &Path {
        self.sounds
            .get(&key)
            .map_or_else(|| Path::new(""), PathBuf::as_path)
    }

    /// Dying frames in playback order.
    #[must_use]
    pub fn dying_frames(&self) -> &[PathBuf] {
        &self.dying
    }

    /// Font used for the score and miss counters.
    #[must_use]
    pub fn hud_font(&self) -> &Path {
        &self.hud_font
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    version: u32,
    dying: Vec<String>,
    textures: HashMap<String, String>,
    sounds: HashMap<String, String>,
    fonts: RawFonts,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFonts {
    hud: String,
}

fn resolve_section<K>(
    entries: HashMap<String, String>,
    base_path: &Path,
    expected: &[K],
    parse_key: fn(&str) -> Result<K>,
) -> Result<HashMap<K, PathBuf>>
where
    K: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    let mut resolved = HashMap::with_capacity(entries.len());
    for (name, relative_path) in entries {
        let key = parse_key(&name)?;
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("asset manifest contains duplicate entry for {key:?}");
        }
    }

    for key in expected {
        if !resolved.contains_key(key) {
            bail!("asset manifest missing entry for {key:?}");
        }
    }

    Ok(resolved)
}

fn parse_texture_key(name: &str) -> Result<TextureKey> {
    match name {
        "background" => Ok(TextureKey::Background),
        "graves" => Ok(TextureKey::Graves),
        "popup" => Ok(TextureKey::Popup),
        _ => bail!("unknown texture key `{name}`"),
    }
}

fn parse_sound_key(name: &str) -> Result<SoundKey> {
    match name {
        "theme" => Ok(SoundKey::Theme),
        "hit" => Ok(SoundKey::Hit),
        _ => bail!("unknown sound key `{name}`"),
    }
}

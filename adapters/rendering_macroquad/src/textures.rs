use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use macroquad::{
    math::{Rect, Vec2 as MacroquadVec2},
    text::{self, Font},
    texture::{self, DrawTextureParams, Texture2D},
};
use zombie_pop_rendering::{AssetManifest, Color, SourceRect, TextureKey};

use crate::to_macroquad_color;

const ALL_TEXTURE_KEYS: [TextureKey; 3] =
    [TextureKey::Background, TextureKey::Graves, TextureKey::Popup];

/// Textures and the HUD font loaded from the asset manifest.
pub(crate) struct Textures {
    sheets: HashMap<TextureKey, Texture2D>,
    dying: Vec<Texture2D>,
    font: Font,
}

impl Textures {
    /// Loads every texture and the HUD font referenced by `manifest`.
    pub(crate) fn load(manifest: &AssetManifest) -> Result<Self> {
        Self::load_with(manifest, load_texture_file)
    }

    fn load_with(
        manifest: &AssetManifest,
        mut loader: impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut sheets = HashMap::with_capacity(ALL_TEXTURE_KEYS.len());
        for key in ALL_TEXTURE_KEYS {
            let path = manifest.texture(key);
            let texture = loader(path).with_context(|| {
                format!("failed to load texture {key:?} from {}", path.display())
            })?;
            if sheets.insert(key, texture).is_some() {
                bail!("duplicate texture entry for {key:?}");
            }
        }

        let dying = manifest
            .dying_frames()
            .iter()
            .map(|path| {
                loader(path)
                    .with_context(|| format!("failed to load dying frame {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let font_path = manifest.hud_font();
        let font_bytes = fs::read(font_path)
            .with_context(|| format!("failed to read HUD font at {}", font_path.display()))?;
        let font = text::load_ttf_font_from_bytes(&font_bytes).map_err(|error| {
            anyhow!("failed to parse HUD font {}: {error:?}", font_path.display())
        })?;

        Ok(Self {
            sheets,
            dying,
            font,
        })
    }

    /// Font used for the HUD counters.
    pub(crate) fn font(&self) -> Font {
        self.font
    }

    /// Draws the whole texture registered under `key` with its top-left corner at `position`.
    pub(crate) fn draw_full(&self, key: TextureKey, position: glam::Vec2) -> Result<()> {
        let texture = self.sheet(key)?;
        texture::draw_texture(
            texture,
            position.x,
            position.y,
            to_macroquad_color(Color::WHITE),
        );
        Ok(())
    }

    /// Draws the `source` rectangle of the sheet registered under `key`.
    pub(crate) fn draw_region(
        &self,
        key: TextureKey,
        source: SourceRect,
        position: glam::Vec2,
    ) -> Result<()> {
        let texture = self.sheet(key)?;
        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(source.size.x, source.size.y)),
            source: Some(Rect::new(
                source.origin.x,
                source.origin.y,
                source.size.x,
                source.size.y,
            )),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(
            texture,
            position.x,
            position.y,
            to_macroquad_color(Color::WHITE),
            params,
        );
        Ok(())
    }

    /// Draws dying frame `index` with its top-left corner at `position`.
    pub(crate) fn draw_dying(&self, index: usize, position: glam::Vec2) -> Result<()> {
        let texture = *self
            .dying
            .get(index)
            .with_context(|| format!("dying frame {index} missing from textures"))?;
        texture::draw_texture(
            texture,
            position.x,
            position.y,
            to_macroquad_color(Color::WHITE),
        );
        Ok(())
    }

    fn sheet(&self, key: TextureKey) -> Result<Texture2D> {
        self.sheets
            .get(&key)
            .copied()
            .with_context(|| format!("texture {key:?} missing from textures"))
    }
}

fn load_texture_file(path: &Path) -> Result<Texture2D> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read texture at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

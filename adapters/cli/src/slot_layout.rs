use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use zombie_pop_core::{ConfigError, HitRegion, RegionSize, ScreenPoint, SlotTable};
use zombie_pop_rendering::GraveSprite;

/// Positions of every grave and actor slot on the stage.
///
/// The four lists are parallel: entry `i` of each describes slot `i`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SlotLayout {
    /// Top-left corners of the graves inside the grave sheet.
    extraction_positions: Vec<ScreenPoint>,
    /// Screen positions the graves are drawn at.
    placement_positions: Vec<ScreenPoint>,
    /// Screen positions the emerging actor is drawn at.
    popup_positions: Vec<ScreenPoint>,
    /// Screen positions the dying animation is drawn at.
    dying_positions: Vec<ScreenPoint>,
}

impl SlotLayout {
    /// Loads and validates the layout stored at `path`.
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read slot positions at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid slot positions in {}", path.display()))
    }

    /// Parses and validates layout JSON.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let layout: Self =
            serde_json::from_str(contents).context("failed to parse slot positions json")?;

        let lengths = [
            layout.extraction_positions.len(),
            layout.placement_positions.len(),
            layout.popup_positions.len(),
            layout.dying_positions.len(),
        ];
        if lengths.iter().any(|&length| length != lengths[0]) {
            bail!(
                "slot position lists differ in length \
                 (extraction {}, placement {}, popup {}, dying {})",
                lengths[0],
                lengths[1],
                lengths[2],
                lengths[3]
            );
        }
        if lengths[0] == 0 {
            bail!("slot positions must describe at least one slot");
        }

        Ok(layout)
    }

    /// Number of slots described by the layout.
    pub(crate) fn len(&self) -> usize {
        self.popup_positions.len()
    }

    /// Grave sprites cut from the sheet and placed on the stage.
    pub(crate) fn graves(&self) -> Vec<GraveSprite> {
        self.extraction_positions
            .iter()
            .zip(&self.placement_positions)
            .map(|(extraction, placement)| GraveSprite::new(*extraction, *placement))
            .collect()
    }

    /// Builds the slot table, giving every hit region the size of one popup frame.
    pub(crate) fn slot_table(&self, hit_size: RegionSize) -> Result<SlotTable, ConfigError> {
        let hit_regions: Vec<_> = self
            .popup_positions
            .iter()
            .map(|position| HitRegion::from_origin_and_size(*position, hit_size))
            .collect();
        SlotTable::from_parallel_lists(&self.popup_positions, &hit_regions, &self.dying_positions)
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Zombie Pop adapters.
//!
//! The world speaks in slots, frame references and screen points. This crate
//! turns those into backend-agnostic drawing descriptors: the static stage
//! (background and graves), the popup strip geometry, the per-tick [`Scene`]
//! and the HUD text layout.

mod manifest;

pub use manifest::{AssetManifest, SoundKey, TextureKey};

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt};
use zombie_pop_core::{
    AudioCue, FrameRef, InputEvent, RegionSize, RenderCommand, Scoreboard, ScreenPoint,
};

/// Size of a single grave cut from the grave sheet, in pixels.
pub const GRAVE_SIZE: Vec2 = Vec2::new(74.0, 84.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Converts a screen point into a drawing position.
#[must_use]
pub fn to_vec2(point: ScreenPoint) -> Vec2 {
    Vec2::new(point.x() as f32, point.y() as f32)
}

/// Rectangle inside a texture, in texture pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    /// Top-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

impl SourceRect {
    /// Creates a new source rectangle.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Geometry of the vertical strip the emerge animation is sliced from.
///
/// Every frame is as wide as the sheet and half as tall. Frame `i` starts
/// `i / steps` of the way down the upper half, so frame `steps` shows the
/// lower half in full.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupStrip {
    sheet_size: Vec2,
    steps: u32,
}

impl PopupStrip {
    /// Number of slicing steps used by the bundled popup sheet.
    pub const DEFAULT_STEPS: u32 = 30;

    /// Creates the strip geometry for a sheet of the provided size.
    pub fn new(sheet_width: u32, sheet_height: u32, steps: u32) -> Result<Self, RenderingError> {
        if steps == 0 {
            return Err(RenderingError::InvalidPopupSteps { steps });
        }
        if sheet_width == 0 || sheet_height < 2 {
            return Err(RenderingError::DegenerateSheet {
                width: sheet_width,
                height: sheet_height,
            });
        }
        Ok(Self {
            sheet_size: Vec2::new(sheet_width as f32, sheet_height as f32),
            steps,
        })
    }

    /// Number of frames in the strip.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.steps as usize + 1
    }

    /// Size of a single frame in texture pixels.
    #[must_use]
    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.sheet_size.x, self.sheet_size.y / 2.0)
    }

    /// Size of the clickable region covered by an emerged actor.
    #[must_use]
    pub fn hit_size(&self) -> RegionSize {
        let frame = self.frame_size();
        RegionSize::new(frame.x as u32, frame.y as u32)
    }

    /// Texture rectangle holding frame `index`. Indices past the end are clamped.
    #[must_use]
    pub fn frame_source(&self, index: usize) -> SourceRect {
        let frame = self.frame_size();
        let index = index.min(self.steps as usize) as f32;
        let offset = index * frame.y / self.steps as f32;
        SourceRect::new(Vec2::new(0.0, offset), frame)
    }
}

/// Grave sprite composed onto the background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraveSprite {
    /// Rectangle in the grave sheet holding this grave.
    pub source: SourceRect,
    /// Screen position of the grave's top-left corner.
    pub position: Vec2,
}

impl GraveSprite {
    /// Cuts a [`GRAVE_SIZE`] grave at `extraction` and places it at `placement`.
    #[must_use]
    pub fn new(extraction: ScreenPoint, placement: ScreenPoint) -> Self {
        Self {
            source: SourceRect::new(to_vec2(extraction), GRAVE_SIZE),
            position: to_vec2(placement),
        }
    }
}

/// Static backdrop that never changes during play.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    /// Width and height of the background, which also sizes the window.
    pub size: Vec2,
    /// Graves drawn over the background.
    pub graves: Vec<GraveSprite>,
}

impl Stage {
    /// Creates a new stage descriptor.
    #[must_use]
    pub fn new(size: Vec2, graves: Vec<GraveSprite>) -> Self {
        Self { size, graves }
    }
}

/// Single line of HUD text.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLine {
    /// Text to draw.
    pub text: String,
    /// Point the text is centred on.
    pub center: Vec2,
}

/// Layout of the score and miss counters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudLayout {
    /// Font size in pixels.
    pub font_size: u16,
    /// Vertical centre of both counters.
    pub center_y: f32,
    /// Text color.
    pub color: Color,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            font_size: 31,
            center_y: 26.0,
            color: Color::WHITE,
        }
    }
}

impl HudLayout {
    /// Lays out the score at one third and the misses at two thirds of the stage width.
    #[must_use]
    pub fn lines(&self, scoreboard: Scoreboard, stage_width: f32) -> [HudLine; 2] {
        [
            HudLine {
                text: format!("SCORE: {}", scoreboard.score()),
                center: Vec2::new(stage_width / 3.0, self.center_y),
            },
            HudLine {
                text: format!("MISSES: {}", scoreboard.misses()),
                center: Vec2::new(stage_width / 3.0 * 2.0, self.center_y),
            },
        ]
    }
}

/// Actor frame drawn this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSprite {
    /// Frame to draw.
    pub frame: FrameRef,
    /// Screen position of the frame's top-left corner.
    pub position: Vec2,
}

/// Per-tick scene description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scene {
    /// Actor frame drawn over the stage.
    pub actor: ActorSprite,
    /// Counters shown in the HUD.
    pub scoreboard: Scoreboard,
    /// Sound to start this tick.
    pub audio: Option<AudioCue>,
}

impl Scene {
    /// Builds a scene from a world render command.
    #[must_use]
    pub fn from_command(command: RenderCommand) -> Self {
        Self {
            actor: ActorSprite {
                frame: command.frame,
                position: to_vec2(command.position),
            },
            scoreboard: command.scoreboard,
            audio: command.audio,
        }
    }

    /// Replaces the scene content with the provided command.
    pub fn apply(&mut self, command: RenderCommand) {
        *self = Self::from_command(command);
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Events observed since the previous frame, in arrival order.
    pub events: Vec<InputEvent>,
}

/// Instruction returned by the scene update callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneControl {
    /// Present the scene and keep running.
    Continue,
    /// Leave the render loop.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Asset locations the backend loads before the first frame.
    pub assets: AssetManifest,
    /// Static backdrop.
    pub stage: Stage,
    /// Geometry of the popup strip.
    pub popup: PopupStrip,
    /// Layout of the counters.
    pub hud: HudLayout,
    /// Scene displayed on the first frame.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        assets: AssetManifest,
        stage: Stage,
        popup: PopupStrip,
        scene: Scene,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color: Color::from_rgb_u8(0, 0, 0),
            assets,
            stage,
            popup,
            hud: HudLayout::default(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Zombie Pop scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter since the previous frame and may mutate the scene before it is
    /// rendered. Returning [`SceneControl::Exit`] ends the loop.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> SceneControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The popup strip must be sliced into at least one step.
    InvalidPopupSteps {
        /// Provided step count that failed validation.
        steps: u32,
    },
    /// The popup sheet is too small to slice.
    DegenerateSheet {
        /// Width of the sheet in pixels.
        width: u32,
        /// Height of the sheet in pixels.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPopupSteps { steps } => {
                write!(f, "popup steps must be positive (received {steps})")
            }
            Self::DegenerateSheet { width, height } => {
                write!(f, "popup sheet of {width}x{height} pixels cannot be sliced")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_strip_rejects_zero_steps_without_panicking() {
        let error = PopupStrip::new(74, 84, 0).expect_err("zero steps must be rejected");
        assert_eq!(error, RenderingError::InvalidPopupSteps { steps: 0 });
    }

    #[test]
    fn popup_strip_rejects_degenerate_sheets() {
        assert!(matches!(
            PopupStrip::new(74, 1, 30),
            Err(RenderingError::DegenerateSheet { width: 74, height: 1 })
        ));
    }

    #[test]
    fn popup_strip_slices_half_height_frames() {
        let strip = PopupStrip::new(74, 84, 30).expect("valid strip");

        assert_eq!(strip.frame_count(), 31);
        assert_eq!(strip.frame_size(), Vec2::new(74.0, 42.0));
        assert_eq!(strip.hit_size(), RegionSize::new(74, 42));
        assert_eq!(strip.frame_source(0).origin, Vec2::ZERO);
        assert_eq!(strip.frame_source(15).origin, Vec2::new(0.0, 21.0));
        assert_eq!(strip.frame_source(30).origin, Vec2::new(0.0, 42.0));
        assert_eq!(strip.frame_source(99), strip.frame_source(30));
    }

    #[test]
    fn grave_sprite_cuts_fixed_size_tiles() {
        let grave = GraveSprite::new(ScreenPoint::new(148, 0), ScreenPoint::new(300, 420));
        assert_eq!(grave.source.origin, Vec2::new(148.0, 0.0));
        assert_eq!(grave.source.size, GRAVE_SIZE);
        assert_eq!(grave.position, Vec2::new(300.0, 420.0));
    }

    #[test]
    fn hud_lines_split_the_stage_in_thirds() {
        let [score, misses] = HudLayout::default().lines(Scoreboard::new(3, 7), 900.0);

        assert_eq!(score.text, "SCORE: 3");
        assert_eq!(score.center, Vec2::new(300.0, 26.0));
        assert_eq!(misses.text, "MISSES: 7");
        assert_eq!(misses.center, Vec2::new(600.0, 26.0));
    }

    #[test]
    fn scene_mirrors_render_commands() {
        let command = RenderCommand {
            frame: FrameRef::Dying(4),
            position: ScreenPoint::new(12, -3),
            scoreboard: Scoreboard::new(2, 1),
            audio: Some(AudioCue::Hit),
        };
        let mut scene = Scene::from_command(RenderCommand {
            frame: FrameRef::Popup(0),
            position: ScreenPoint::default(),
            scoreboard: Scoreboard::default(),
            audio: None,
        });

        scene.apply(command);

        assert_eq!(scene.actor.frame, FrameRef::Dying(4));
        assert_eq!(scene.actor.position, Vec2::new(12.0, -3.0));
        assert_eq!(scene.scoreboard, Scoreboard::new(2, 1));
        assert_eq!(scene.audio, Some(AudioCue::Hit));
    }
}

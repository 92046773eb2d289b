#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Zombie Pop experience.

mod slot_layout;

use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zombie_pop_core::{
    Clock, Durations, Event, FrameCounts, MonotonicClock, TickOutcome, WINDOW_TITLE,
};
use zombie_pop_rendering::{
    AssetManifest, PopupStrip, Presentation, RenderingBackend, Scene, SceneControl, Stage,
    TextureKey,
};
use zombie_pop_rendering_macroquad::MacroquadBackend;
use zombie_pop_world::{self as world, Config, World};

use self::slot_layout::SlotLayout;

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(
    name = "zombie-pop",
    about = "Whack the zombies before they sink back into their graves"
)]
struct Cli {
    /// Directory holding the game assets.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Asset manifest to load. Defaults to `<assets>/manifest.toml`.
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Slot positions to load. Defaults to `<assets>/positions.json`.
    #[arg(long)]
    positions: Option<PathBuf>,
    /// Seed for slot selection. Defaults to one derived from the system time.
    #[arg(long)]
    seed: Option<u64>,
    /// Length of the emerge animation in milliseconds.
    #[arg(long, default_value_t = duration_millis(Durations::DEFAULT_POPUP))]
    popup_ms: u64,
    /// Time the actor stays fully emerged in milliseconds.
    #[arg(long, default_value_t = duration_millis(Durations::DEFAULT_STAY_UP))]
    stay_up_ms: u64,
    /// Length of the dying animation in milliseconds.
    #[arg(long, default_value_t = duration_millis(Durations::DEFAULT_DYING))]
    dying_ms: u64,
    /// Number of slicing steps in the popup sheet; the strip holds one more frame.
    #[arg(long, default_value_t = PopupStrip::DEFAULT_STEPS)]
    popup_steps: u32,
    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render frames as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frames per second once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Cli {
    fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| AssetManifest::default_path(&self.assets))
    }

    fn positions_path(&self) -> PathBuf {
        self.positions
            .clone()
            .unwrap_or_else(|| self.assets.join("positions.json"))
    }

    fn durations(&self) -> Result<Durations> {
        Durations::new(
            Duration::from_millis(self.popup_ms),
            Duration::from_millis(self.stay_up_ms),
            Duration::from_millis(self.dying_ms),
        )
        .context("invalid animation timings")
    }

    fn vsync_enabled(&self) -> bool {
        self.vsync || !self.no_vsync
    }
}

/// Entry point for the Zombie Pop command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let assets = AssetManifest::from_path(cli.manifest_path())?;
    let (stage_width, stage_height) = decoded_size(assets.texture(TextureKey::Background))?;
    let (sheet_width, sheet_height) = decoded_size(assets.texture(TextureKey::Popup))?;
    ensure_decodable(&assets)?;
    let popup = PopupStrip::new(sheet_width, sheet_height, cli.popup_steps)?;

    let layout = SlotLayout::from_path(cli.positions_path())?;
    let slots = layout.slot_table(popup.hit_size())?;
    let stage = Stage::new(
        Vec2::new(stage_width as f32, stage_height as f32),
        layout.graves(),
    );

    let frame_counts = FrameCounts::new(popup.frame_count(), assets.dying_frames().len())?;
    let seed = cli.seed.unwrap_or_else(time_seed);
    let config = Config::new(cli.durations()?, frame_counts, seed);
    info!(
        slots = layout.len(),
        popup_frames = frame_counts.popup(),
        dying_frames = frame_counts.dying(),
        seed,
        "assets loaded"
    );

    let clock = MonotonicClock::start();
    let mut world = World::new(slots, config, clock.now());
    let mut events = Vec::new();
    let first_frame = match world::advance(&mut world, clock.now(), &[], &mut events) {
        TickOutcome::Render(command) => command,
        TickOutcome::Quit => return Ok(()),
    };
    log_events(&events);

    let presentation = Presentation::new(
        WINDOW_TITLE,
        assets,
        stage,
        popup,
        Scene::from_command(first_frame),
    );
    let backend = MacroquadBackend::new()
        .with_vsync(cli.vsync_enabled())
        .with_show_fps(cli.show_fps);

    backend.run(presentation, move |input, scene| {
        events.clear();
        let outcome = world::advance(&mut world, clock.now(), &input.events, &mut events);
        log_events(&events);
        match outcome {
            TickOutcome::Render(command) => {
                scene.apply(command);
                SceneControl::Continue
            }
            TickOutcome::Quit => SceneControl::Exit,
        }
    })
}

/// Decodes the image at `path` and returns its width and height.
fn decoded_size(path: &Path) -> Result<(u32, u32)> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image at {}", path.display()))?;
    Ok((image.width(), image.height()))
}

/// Decodes the grave sheet and every dying frame so broken files are reported
/// before the window opens.
fn ensure_decodable(assets: &AssetManifest) -> Result<()> {
    let _ = decoded_size(assets.texture(TextureKey::Graves))?;
    for frame in assets.dying_frames() {
        let _ = decoded_size(frame)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::QuitRequested => info!("quit requested"),
            _ => debug!(?event, "world event"),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

const fn duration_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

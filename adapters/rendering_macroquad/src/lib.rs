#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Zombie Pop.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Enable this crate's `audio` feature to play the
//! theme and hit sounds; without it audio cues are logged and dropped.

#[cfg(feature = "audio")]
mod audio;
mod textures;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    input::{
        is_key_pressed, is_mouse_button_pressed, is_quit_requested, mouse_position,
        prevent_quit, KeyCode, MouseButton,
    },
    text::{self, Font, TextParams},
};
use std::{
    collections::VecDeque,
    sync::mpsc,
    time::{Duration, Instant},
};
use zombie_pop_core::{FrameRef, InputEvent, ScreenPoint};
use zombie_pop_rendering::{
    ActorSprite, FrameInput, HudLayout, PopupStrip, Presentation, RenderingBackend, Scene,
    SceneControl, Stage, TextureKey,
};

use self::textures::Textures;

/// Collects the input observed between two scene updates.
///
/// Presses are latched in arrival order until the next [`InputLatch::take`].
#[derive(Clone, Debug, Default)]
pub struct InputLatch {
    events: Vec<InputEvent>,
    quit: bool,
}

impl InputLatch {
    /// Records a primary pointer press at the provided window position.
    pub fn register_pointer_press(&mut self, position: Vec2) {
        self.events.push(InputEvent::PointerDown(ScreenPoint::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
        )));
    }

    /// Records a request to close the game.
    pub fn register_quit(&mut self) {
        if !self.quit {
            self.quit = true;
            self.events.push(InputEvent::Quit);
        }
    }

    /// Drains the latched input into a frame snapshot.
    pub fn take(&mut self) -> FrameInput {
        self.quit = false;
        FrameInput {
            events: std::mem::take(&mut self.events),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / self.frames,
            avg_render: self.render_accum / self.frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> SceneControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            assets,
            stage,
            popup,
            hud,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: stage.size.x as i32,
            window_height: stage.size.y as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let textures = match Textures::load(&assets).context("failed to load textures") {
                Ok(textures) => textures,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };

            #[cfg(feature = "audio")]
            let sounds = match audio::SoundBank::load(&assets)
                .await
                .context("failed to load sounds")
            {
                Ok(sounds) => sounds,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            #[cfg(feature = "audio")]
            sounds.start_theme();

            let _ = init_sender.send(Ok(()));
            tracing::info!(
                width = stage.size.x,
                height = stage.size.y,
                graves = stage.graves.len(),
                "presentation ready"
            );

            prevent_quit();
            let background = to_macroquad_color(clear_color);
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut latch = InputLatch::default();

            loop {
                if is_mouse_button_pressed(MouseButton::Left) {
                    let (cursor_x, cursor_y) = mouse_position();
                    latch.register_pointer_press(Vec2::new(cursor_x, cursor_y));
                }
                if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
                    latch.register_quit();
                }

                let frame_dt = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let update_start = Instant::now();
                let control = update_scene(latch.take(), &mut scene);
                let update_duration = update_start.elapsed();
                if control == SceneControl::Exit {
                    break;
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                if let Err(error) = draw_frame(&textures, &stage, &popup, &hud, &scene) {
                    tracing::warn!(error = %format!("{error:#}"), "failed to draw frame");
                }
                if let Some(cue) = scene.audio {
                    #[cfg(feature = "audio")]
                    sounds.play(cue);
                    #[cfg(not(feature = "audio"))]
                    drop_cue(cue);
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        tracing::info!(
                            fps = f64::from(metrics.per_second),
                            fps_10s = f64::from(metrics.trailing_ten_seconds),
                            update_ms = metrics.avg_update.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timings"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

#[cfg(not(feature = "audio"))]
fn drop_cue(cue: zombie_pop_core::AudioCue) {
    tracing::debug!(?cue, "audio support disabled; dropping cue");
}

fn draw_frame(
    textures: &Textures,
    stage: &Stage,
    popup: &PopupStrip,
    hud: &HudLayout,
    scene: &Scene,
) -> Result<()> {
    textures.draw_full(TextureKey::Background, Vec2::ZERO)?;
    for grave in &stage.graves {
        textures.draw_region(TextureKey::Graves, grave.source, grave.position)?;
    }
    draw_actor(textures, popup, scene.actor)?;
    draw_hud(textures.font(), hud, scene, stage.size.x);
    Ok(())
}

fn draw_actor(textures: &Textures, popup: &PopupStrip, actor: ActorSprite) -> Result<()> {
    match actor.frame {
        FrameRef::Popup(index) => {
            textures.draw_region(TextureKey::Popup, popup.frame_source(index), actor.position)
        }
        FrameRef::Dying(index) => textures.draw_dying(index, actor.position),
    }
}

fn draw_hud(font: Font, hud: &HudLayout, scene: &Scene, stage_width: f32) {
    let color = to_macroquad_color(hud.color);
    for line in hud.lines(scene.scoreboard, stage_width) {
        let dimensions = text::measure_text(&line.text, Some(font), hud.font_size, 1.0);
        let origin = centered_text_origin(
            line.center,
            Vec2::new(dimensions.width, dimensions.height),
            dimensions.offset_y,
        );
        text::draw_text_ex(
            &line.text,
            origin.x,
            origin.y,
            TextParams {
                font,
                font_size: hud.font_size,
                color,
                ..TextParams::default()
            },
        );
    }
}

/// Baseline origin that centres text of `size` on `center`.
fn centered_text_origin(center: Vec2, size: Vec2, baseline_offset: f32) -> Vec2 {
    Vec2::new(
        center.x - size.x / 2.0,
        center.y - size.y / 2.0 + baseline_offset,
    )
}

fn to_macroquad_color(color: zombie_pop_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

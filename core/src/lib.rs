#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zombie Pop engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters collect [`InputEvent`]
//! batches and hand them to the world together with the current clock
//! reading. The world answers each tick with a [`TickOutcome`] describing what
//! should be drawn and heard, and broadcasts [`Event`] values describing the
//! transitions it performed so adapters can log or react to them.

mod clock;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Canonical window title used by adapters.
pub const WINDOW_TITLE: &str = "Zombie Pop";

/// Pixel coordinate expressed in screen space with the origin in the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    x: i32,
    y: i32,
}

impl ScreenPoint {
    /// Creates a new screen-space point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel offset from the left edge of the screen.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel offset from the top edge of the screen.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Size of a [`HitRegion`] measured in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionSize {
    width: u32,
    height: u32,
}

impl RegionSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the region in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the region in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Axis-aligned rectangle used for click testing.
///
/// Covers `width` columns and `height` rows starting at the origin, so
/// `right()` and `bottom()` name the last covered pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitRegion {
    origin: ScreenPoint,
    size: RegionSize,
}

impl HitRegion {
    /// Constructs a region from its top-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: ScreenPoint, size: RegionSize) -> Self {
        Self { origin, size }
    }

    /// Top-left corner that anchors the region.
    #[must_use]
    pub const fn origin(&self) -> ScreenPoint {
        self.origin
    }

    /// Dimensions of the region.
    #[must_use]
    pub const fn size(&self) -> RegionSize {
        self.size
    }

    /// Leftmost column covered by the region.
    #[must_use]
    pub const fn left(&self) -> i64 {
        self.origin.x as i64
    }

    /// Topmost row covered by the region.
    #[must_use]
    pub const fn top(&self) -> i64 {
        self.origin.y as i64
    }

    /// Rightmost column covered by the region. Less than `left()` when the
    /// region is zero pixels wide.
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.left() + self.size.width as i64 - 1
    }

    /// Bottommost row covered by the region. Less than `top()` when the
    /// region is zero pixels tall.
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.top() + self.size.height as i64 - 1
    }
}

/// Fixed screen location an actor may emerge from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Render origin used while the actor emerges, stays up and retreats.
    pub position: ScreenPoint,
    /// Rectangle that accepts clicks while the actor is not hit.
    pub hit_region: HitRegion,
    /// Render origin used while the actor plays its dying animation.
    pub dying_position: ScreenPoint,
}

impl Slot {
    /// Creates a new slot description.
    #[must_use]
    pub const fn new(
        position: ScreenPoint,
        hit_region: HitRegion,
        dying_position: ScreenPoint,
    ) -> Self {
        Self {
            position,
            hit_region,
            dying_position,
        }
    }
}

/// Index into the [`SlotTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Creates a new slot index with the provided numeric value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Immutable table of every slot available to the actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    /// Creates a slot table, rejecting empty input.
    pub fn new(slots: Vec<Slot>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::EmptySlotTable);
        }
        Ok(Self { slots })
    }

    /// Zips parallel position, hit-region and dying-position lists into a table.
    pub fn from_parallel_lists(
        positions: &[ScreenPoint],
        hit_regions: &[HitRegion],
        dying_positions: &[ScreenPoint],
    ) -> Result<Self, ConfigError> {
        if positions.len() != hit_regions.len() || positions.len() != dying_positions.len() {
            return Err(ConfigError::MismatchedSlotLists {
                positions: positions.len(),
                hit_regions: hit_regions.len(),
                dying_positions: dying_positions.len(),
            });
        }

        let slots = positions
            .iter()
            .zip(hit_regions)
            .zip(dying_positions)
            .map(|((position, hit_region), dying_position)| {
                Slot::new(*position, *hit_region, *dying_position)
            })
            .collect();
        Self::new(slots)
    }

    /// Number of slots contained in the table. Always positive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot stored at the provided index, if in range.
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index.get())
    }
}

impl std::ops::Index<SlotIndex> for SlotTable {
    type Output = Slot;

    fn index(&self, index: SlotIndex) -> &Self::Output {
        &self.slots[index.get()]
    }
}

/// Discrete stage of the live actor's animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The actor climbs out of its slot.
    PoppingUp,
    /// The actor holds its fully emerged pose.
    StayingUp,
    /// The actor sinks back into its slot.
    PoppingDown,
    /// The actor was struck and plays its dying animation.
    Dying,
}

impl Phase {
    /// Super-state the phase belongs to.
    #[must_use]
    pub const fn super_state(self) -> SuperState {
        match self {
            Self::PoppingUp | Self::StayingUp | Self::PoppingDown => SuperState::NotHit,
            Self::Dying => SuperState::Hit,
        }
    }

    /// Whether a registered hit awards a point during this phase.
    #[must_use]
    pub const fn awards_hits(self) -> bool {
        matches!(self, Self::PoppingUp | Self::StayingUp)
    }
}

/// Grouping of phases that gates whether clicks can score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuperState {
    /// The actor emerges, holds and retreats; clicks are classified.
    NotHit,
    /// The actor is dying; clicks are ignored.
    Hit,
}

/// Fixed animation timings applied to every actor cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Durations {
    popup: Duration,
    stay_up: Duration,
    dying: Duration,
}

impl Durations {
    /// Default time spent emerging.
    pub const DEFAULT_POPUP: Duration = Duration::from_millis(500);
    /// Default time spent fully emerged.
    pub const DEFAULT_STAY_UP: Duration = Duration::from_millis(1_000);
    /// Default time spent dying.
    pub const DEFAULT_DYING: Duration = Duration::from_millis(500);

    /// Creates validated timings. Every span must be positive.
    pub fn new(popup: Duration, stay_up: Duration, dying: Duration) -> Result<Self, ConfigError> {
        for (name, value) in [("popup", popup), ("stay_up", stay_up), ("dying", dying)] {
            if value.is_zero() {
                return Err(ConfigError::NonPositiveDuration { name });
            }
        }
        Ok(Self {
            popup,
            stay_up,
            dying,
        })
    }

    /// Time spent emerging.
    #[must_use]
    pub const fn popup(&self) -> Duration {
        self.popup
    }

    /// Time spent fully emerged.
    #[must_use]
    pub const fn stay_up(&self) -> Duration {
        self.stay_up
    }

    /// Time spent retreating. Mirrors the emerge timing.
    #[must_use]
    pub const fn pop_down(&self) -> Duration {
        self.popup
    }

    /// Time spent dying.
    #[must_use]
    pub const fn dying(&self) -> Duration {
        self.dying
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            popup: Self::DEFAULT_POPUP,
            stay_up: Self::DEFAULT_STAY_UP,
            dying: Self::DEFAULT_DYING,
        }
    }
}

/// Number of frames available in each animation set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameCounts {
    popup: usize,
    dying: usize,
}

impl FrameCounts {
    /// Creates validated frame counts. Both sets must contain at least one frame.
    pub fn new(popup: usize, dying: usize) -> Result<Self, ConfigError> {
        if popup == 0 {
            return Err(ConfigError::EmptyFrameSet { set: "popup" });
        }
        if dying == 0 {
            return Err(ConfigError::EmptyFrameSet { set: "dying" });
        }
        Ok(Self { popup, dying })
    }

    /// Frames in the emerge sequence. The last one doubles as the staying-up pose.
    #[must_use]
    pub const fn popup(&self) -> usize {
        self.popup
    }

    /// Frames in the dying sequence.
    #[must_use]
    pub const fn dying(&self) -> usize {
        self.dying
    }
}

/// Reference to a single frame inside one of the animation sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameRef {
    /// Frame from the emerge/retreat sequence.
    Popup(usize),
    /// Frame from the dying sequence.
    Dying(usize),
}

impl FrameRef {
    /// Index of the frame within its set.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Popup(index) | Self::Dying(index) => *index,
        }
    }
}

/// Read-only view of the live actor cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CycleSnapshot {
    /// Slot the actor currently occupies.
    pub slot: SlotIndex,
    /// Phase reported by the most recent tick.
    pub phase: Phase,
    /// Clock reading at which the current super-state began.
    pub phase_start: Duration,
    /// Whether a hit was registered and not yet consumed.
    pub hit_pending: bool,
}

/// Input gathered by adapters between two ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Primary pointer button pressed at the provided screen position.
    PointerDown(ScreenPoint),
    /// The player asked to leave the game.
    Quit,
}

/// Fire-and-forget sound requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// The actor was struck.
    Hit,
}

/// Snapshot of the player's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    misses: u32,
}

impl Scoreboard {
    /// Creates a snapshot with explicit counters.
    #[must_use]
    pub const fn new(score: u32, misses: u32) -> Self {
        Self { score, misses }
    }

    /// Successful hits registered so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Clicks that missed the actor so far.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }

    /// Returns a copy with the score incremented.
    #[must_use]
    pub const fn with_hit(self) -> Self {
        Self {
            score: self.score.saturating_add(1),
            misses: self.misses,
        }
    }

    /// Returns a copy with the miss counter incremented.
    #[must_use]
    pub const fn with_miss(self) -> Self {
        Self {
            score: self.score,
            misses: self.misses.saturating_add(1),
        }
    }
}

/// Everything external sinks need to present a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderCommand {
    /// Frame that should be drawn for the actor.
    pub frame: FrameRef,
    /// Screen position of the frame's top-left corner.
    pub position: ScreenPoint,
    /// Counters after the tick was processed.
    pub scoreboard: Scoreboard,
    /// Sound that should be started this tick, if any.
    pub audio: Option<AudioCue>,
}

/// Result of advancing the world by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// The input batch contained a quit request; nothing else was processed.
    Quit,
    /// The tick was processed and should be presented.
    Render(RenderCommand),
}

/// Events broadcast by the world while advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A fresh actor cycle started.
    ActorSpawned {
        /// Slot chosen for the new cycle.
        slot: SlotIndex,
    },
    /// A hit was scored and the actor started dying.
    ActorStruck {
        /// Slot occupied by the struck actor.
        slot: SlotIndex,
        /// Score after the hit was counted.
        score: u32,
    },
    /// A click landed outside the actor's hit region.
    ClickMissed {
        /// Position of the click.
        point: ScreenPoint,
        /// Miss counter after the click was counted.
        misses: u32,
    },
    /// A hit registered while retreating was dropped without scoring.
    HitDiscarded {
        /// Slot occupied by the retreating actor.
        slot: SlotIndex,
    },
    /// The actor retreated without being hit.
    ActorRetreated {
        /// Slot the actor retreated into.
        slot: SlotIndex,
    },
    /// The dying animation finished.
    ActorExpired {
        /// Slot the actor died in.
        slot: SlotIndex,
    },
    /// The input batch contained a quit request.
    QuitRequested,
}

/// Configuration problems that prevent the world from being constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The slot table contained no slots.
    #[error("slot table must contain at least one slot")]
    EmptySlotTable,
    /// Parallel slot lists disagreed on their length.
    #[error(
        "slot lists differ in length \
         (positions: {positions}, hit regions: {hit_regions}, dying: {dying_positions})"
    )]
    MismatchedSlotLists {
        /// Number of render positions supplied.
        positions: usize,
        /// Number of hit regions supplied.
        hit_regions: usize,
        /// Number of dying positions supplied.
        dying_positions: usize,
    },
    /// An animation set contained no frames.
    #[error("{set} frame set must contain at least one frame")]
    EmptyFrameSet {
        /// Name of the empty set.
        set: &'static str,
    },
    /// A configured duration was zero.
    #[error("{name} duration must be positive")]
    NonPositiveDuration {
        /// Name of the offending duration.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: i32, y: i32) -> HitRegion {
        HitRegion::from_origin_and_size(ScreenPoint::new(x, y), RegionSize::new(10, 20))
    }

    #[test]
    fn hit_region_edges_name_last_covered_pixel() {
        let region = region(5, 7);
        assert_eq!(region.left(), 5);
        assert_eq!(region.top(), 7);
        assert_eq!(region.right(), 14);
        assert_eq!(region.bottom(), 26);
    }

    #[test]
    fn empty_hit_region_covers_nothing() {
        let region =
            HitRegion::from_origin_and_size(ScreenPoint::new(5, 7), RegionSize::new(0, 0));
        assert!(region.right() < region.left());
        assert!(region.bottom() < region.top());
    }

    #[test]
    fn slot_table_rejects_empty_input() {
        assert_eq!(SlotTable::new(Vec::new()), Err(ConfigError::EmptySlotTable));
        assert_eq!(
            SlotTable::from_parallel_lists(&[], &[], &[]),
            Err(ConfigError::EmptySlotTable)
        );
    }

    #[test]
    fn slot_table_rejects_mismatched_lists() {
        let positions = [ScreenPoint::new(0, 0), ScreenPoint::new(1, 1)];
        let error = SlotTable::from_parallel_lists(&positions, &[region(0, 0)], &positions)
            .expect_err("length mismatch must be rejected");

        assert_eq!(
            error,
            ConfigError::MismatchedSlotLists {
                positions: 2,
                hit_regions: 1,
                dying_positions: 2,
            }
        );
    }

    #[test]
    fn slot_table_zips_lists_in_order() {
        let positions = [ScreenPoint::new(1, 2), ScreenPoint::new(3, 4)];
        let regions = [region(10, 10), region(20, 20)];
        let dying = [ScreenPoint::new(5, 6), ScreenPoint::new(7, 8)];
        let table = SlotTable::from_parallel_lists(&positions, &regions, &dying)
            .expect("consistent lists");

        let second = table.get(SlotIndex::new(1)).expect("slot in range");
        assert_eq!(second.position, ScreenPoint::new(3, 4));
        assert_eq!(second.hit_region, region(20, 20));
        assert_eq!(second.dying_position, ScreenPoint::new(7, 8));
        assert!(table.get(SlotIndex::new(2)).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn durations_reject_zero_spans() {
        let error = Durations::new(
            Duration::from_millis(1),
            Duration::ZERO,
            Duration::from_millis(1),
        )
        .expect_err("zero stay-up must be rejected");
        assert_eq!(error, ConfigError::NonPositiveDuration { name: "stay_up" });
    }

    #[test]
    fn pop_down_mirrors_popup() {
        let durations = Durations::default();
        assert_eq!(durations.pop_down(), durations.popup());
        assert_eq!(durations.popup(), Duration::from_millis(500));
        assert_eq!(durations.stay_up(), Duration::from_millis(1_000));
        assert_eq!(durations.dying(), Duration::from_millis(500));
    }

    #[test]
    fn frame_counts_reject_empty_sets() {
        assert_eq!(
            FrameCounts::new(0, 11),
            Err(ConfigError::EmptyFrameSet { set: "popup" })
        );
        assert_eq!(
            FrameCounts::new(31, 0),
            Err(ConfigError::EmptyFrameSet { set: "dying" })
        );
    }

    #[test]
    fn only_emerged_phases_award_hits() {
        assert!(Phase::PoppingUp.awards_hits());
        assert!(Phase::StayingUp.awards_hits());
        assert!(!Phase::PoppingDown.awards_hits());
        assert!(!Phase::Dying.awards_hits());
        assert_eq!(Phase::PoppingDown.super_state(), SuperState::NotHit);
        assert_eq!(Phase::Dying.super_state(), SuperState::Hit);
    }

    #[test]
    fn slot_round_trips_through_bincode() {
        let slot = Slot::new(ScreenPoint::new(4, 8), region(4, 8), ScreenPoint::new(-2, 6));
        let bytes = bincode::serialize(&slot).expect("serialize");
        let restored: Slot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, slot);
    }
}

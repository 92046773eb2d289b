#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure frame selection converting elapsed phase time into animation frames.

use std::time::Duration;

use zombie_pop_core::{Durations, FrameCounts, FrameRef, Phase};

/// Direction and pacing used when sweeping through a frame set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sweep {
    /// Walks from the first frame to the last over the duration.
    Ascending,
    /// Walks from the last frame back towards the first over the duration.
    /// Stops at frame 1 so the fully sunk frame is left to the next cycle.
    Descending,
    /// Ascends over `frame_count + 1` steps, so the last frame is reached
    /// before the duration ends and then held.
    Overshoot,
}

/// Maps time elapsed within a span to a frame index in `0..frame_count`.
///
/// The raw index is `floor(elapsed / duration * steps)` where `steps` is the
/// frame count, or one more for [`Sweep::Overshoot`]. The result is always
/// clamped to the last valid frame. A zero `frame_count` yields `0`.
#[must_use]
pub fn pick(elapsed: Duration, duration: Duration, frame_count: usize, sweep: Sweep) -> usize {
    let last = frame_count.saturating_sub(1);
    let steps = match sweep {
        Sweep::Ascending | Sweep::Descending => frame_count,
        Sweep::Overshoot => frame_count.saturating_add(1),
    };

    let raw = (elapsed.as_nanos() * steps as u128)
        .checked_div(duration.as_nanos())
        .unwrap_or(steps as u128);
    let clamped = usize::try_from(raw).map_or(last, |raw| raw.min(last));

    match sweep {
        Sweep::Ascending | Sweep::Overshoot => clamped,
        Sweep::Descending => last - clamped.min(last.saturating_sub(1)),
    }
}

/// Selects the frame shown for `phase` once `elapsed` has passed inside it.
///
/// `elapsed` is measured from the start of the phase itself, not from the
/// start of the cycle.
#[must_use]
pub fn frame_for_phase(
    phase: Phase,
    elapsed: Duration,
    durations: &Durations,
    counts: &FrameCounts,
) -> FrameRef {
    match phase {
        Phase::PoppingUp => FrameRef::Popup(pick(
            elapsed,
            durations.popup(),
            counts.popup(),
            Sweep::Ascending,
        )),
        Phase::StayingUp => FrameRef::Popup(counts.popup().saturating_sub(1)),
        Phase::PoppingDown => FrameRef::Popup(pick(
            elapsed,
            durations.pop_down(),
            counts.popup(),
            Sweep::Descending,
        )),
        Phase::Dying => FrameRef::Dying(pick(
            elapsed,
            durations.dying(),
            counts.dying(),
            Sweep::Overshoot,
        )),
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative actor state for Zombie Pop.
//!
//! The world owns the single live actor cycle and the player's counters. It is
//! mutated exclusively through [`advance`], which consumes one tick's worth of
//! input together with the current clock reading and reports what should be
//! presented. Read-only access goes through the [`query`] module.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use zombie_pop_core::{
    AudioCue, Durations, Event, FrameCounts, FrameRef, InputEvent, Phase, RenderCommand,
    Scoreboard, ScreenPoint, SlotIndex, SlotTable, SuperState, TickOutcome,
};
use zombie_pop_system_frame_picker::frame_for_phase;
use zombie_pop_system_hit_detection::{classify, Verdict};
use zombie_pop_system_slot_selection::SlotSelector;

/// Configuration parameters required to construct the world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    durations: Durations,
    frame_counts: FrameCounts,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from validated timings, frame counts and a slot seed.
    #[must_use]
    pub const fn new(durations: Durations, frame_counts: FrameCounts, rng_seed: u64) -> Self {
        Self {
            durations,
            frame_counts,
            rng_seed,
        }
    }
}

/// Represents the authoritative Zombie Pop world state.
#[derive(Debug)]
pub struct World<R = ChaCha8Rng> {
    slots: SlotTable,
    durations: Durations,
    frame_counts: FrameCounts,
    selector: SlotSelector<R>,
    cycle: ActorCycle,
    scoreboard: Scoreboard,
}

impl World<ChaCha8Rng> {
    /// Creates a world whose first actor cycle starts at `now`.
    #[must_use]
    pub fn new(slots: SlotTable, config: Config, now: Duration) -> Self {
        Self::with_selector(slots, config, SlotSelector::seeded(config.rng_seed), now)
    }
}

impl<R> World<R>
where
    R: Rng,
{
    /// Creates a world drawing slots from the provided selector instead of the seeded default.
    #[must_use]
    pub fn with_selector(
        slots: SlotTable,
        config: Config,
        mut selector: SlotSelector<R>,
        now: Duration,
    ) -> Self {
        let slot = selector.next_slot(&slots);
        Self {
            slots,
            durations: config.durations,
            frame_counts: config.frame_counts,
            selector,
            cycle: ActorCycle::spawn(slot, now),
            scoreboard: Scoreboard::default(),
        }
    }

    fn respawn(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let slot = self.selector.next_slot(&self.slots);
        self.cycle = ActorCycle::spawn(slot, now);
        out_events.push(Event::ActorSpawned { slot });
    }

    fn first_popup_frame(&self) -> RenderCommand {
        self.render(FrameRef::Popup(0), self.slots[self.cycle.slot].position)
    }

    fn render(&self, frame: FrameRef, position: ScreenPoint) -> RenderCommand {
        RenderCommand {
            frame,
            position,
            scoreboard: self.scoreboard,
            audio: None,
        }
    }

    fn register_clicks(&mut self, input: &[InputEvent], out_events: &mut Vec<Event>) {
        let region = self.slots[self.cycle.slot].hit_region;
        for event in input {
            let InputEvent::PointerDown(point) = *event else {
                continue;
            };

            match classify(point, &region) {
                Verdict::Hit => self.cycle.hit = true,
                Verdict::Miss => {
                    self.scoreboard = self.scoreboard.with_miss();
                    out_events.push(Event::ClickMissed {
                        point,
                        misses: self.scoreboard.misses(),
                    });
                }
            }
        }
    }

    fn advance_not_hit(
        &mut self,
        now: Duration,
        input: &[InputEvent],
        out_events: &mut Vec<Event>,
    ) -> RenderCommand {
        self.register_clicks(input, out_events);

        let elapsed = now.saturating_sub(self.cycle.phase_start);
        let Some((phase, elapsed_in_phase)) = not_hit_phase(elapsed, &self.durations) else {
            let slot = self.cycle.slot;
            if self.cycle.hit {
                out_events.push(Event::HitDiscarded { slot });
            }
            out_events.push(Event::ActorRetreated { slot });
            self.respawn(now, out_events);
            return self.first_popup_frame();
        };

        self.cycle.phase = phase;
        let frame = frame_for_phase(
            phase,
            elapsed_in_phase,
            &self.durations,
            &self.frame_counts,
        );
        let mut command = self.render(frame, self.slots[self.cycle.slot].position);

        if std::mem::take(&mut self.cycle.hit) {
            let slot = self.cycle.slot;
            if phase.awards_hits() {
                self.scoreboard = self.scoreboard.with_hit();
                self.cycle.phase = Phase::Dying;
                self.cycle.phase_start = now;
                command.scoreboard = self.scoreboard;
                command.audio = Some(AudioCue::Hit);
                out_events.push(Event::ActorStruck {
                    slot,
                    score: self.scoreboard.score(),
                });
            } else {
                out_events.push(Event::HitDiscarded { slot });
            }
        }

        command
    }

    fn advance_hit(&mut self, now: Duration, out_events: &mut Vec<Event>) -> RenderCommand {
        let slot = self.cycle.slot;
        let elapsed = now.saturating_sub(self.cycle.phase_start);
        if elapsed > self.durations.dying() {
            out_events.push(Event::ActorExpired { slot });
            self.respawn(now, out_events);
            return self.first_popup_frame();
        }

        let frame = frame_for_phase(
            Phase::Dying,
            elapsed,
            &self.durations,
            &self.frame_counts,
        );
        let command = self.render(frame, self.slots[slot].dying_position);
        if frame.index() + 1 >= self.frame_counts.dying() {
            out_events.push(Event::ActorExpired { slot });
            self.respawn(now, out_events);
        }
        command
    }
}

/// Advances the world to `now`, consuming the input gathered since the previous tick.
///
/// A quit request anywhere in `input` short-circuits the tick: nothing else in
/// the batch is processed and the world is left untouched. Clicks that arrive
/// while the actor is dying are ignored.
pub fn advance<R>(
    world: &mut World<R>,
    now: Duration,
    input: &[InputEvent],
    out_events: &mut Vec<Event>,
) -> TickOutcome
where
    R: Rng,
{
    if input.iter().any(|event| matches!(event, InputEvent::Quit)) {
        out_events.push(Event::QuitRequested);
        return TickOutcome::Quit;
    }

    let command = match world.cycle.phase.super_state() {
        SuperState::NotHit => world.advance_not_hit(now, input, out_events),
        SuperState::Hit => world.advance_hit(now, out_events),
    };
    TickOutcome::Render(command)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use zombie_pop_core::{CycleSnapshot, Scoreboard, Slot};

    use super::World;

    /// Current score and miss counters.
    #[must_use]
    pub fn scoreboard<R>(world: &World<R>) -> Scoreboard {
        world.scoreboard
    }

    /// Snapshot of the live actor cycle.
    #[must_use]
    pub fn cycle<R>(world: &World<R>) -> CycleSnapshot {
        CycleSnapshot {
            slot: world.cycle.slot,
            phase: world.cycle.phase,
            phase_start: world.cycle.phase_start,
            hit_pending: world.cycle.hit,
        }
    }

    /// Slot occupied by the live actor.
    #[must_use]
    pub fn active_slot<R>(world: &World<R>) -> &Slot {
        &world.slots[world.cycle.slot]
    }

    /// Total length of an unhit cycle from spawn to retreat.
    #[must_use]
    pub fn unhit_cycle_length<R>(world: &World<R>) -> Duration {
        world.durations.popup() + world.durations.stay_up() + world.durations.pop_down()
    }
}

/// State of the single live actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActorCycle {
    slot: SlotIndex,
    phase: Phase,
    phase_start: Duration,
    hit: bool,
}

impl ActorCycle {
    const fn spawn(slot: SlotIndex, now: Duration) -> Self {
        Self {
            slot,
            phase: Phase::PoppingUp,
            phase_start: now,
            hit: false,
        }
    }
}

/// Resolves the unhit phase for `elapsed` time since spawn, together with the
/// time spent inside that phase. Returns `None` once the cycle has run out.
fn not_hit_phase(elapsed: Duration, durations: &Durations) -> Option<(Phase, Duration)> {
    let popped_up = durations.popup();
    let stayed_up = popped_up + durations.stay_up();
    let popped_down = stayed_up + durations.pop_down();

    if elapsed <= popped_up {
        Some((Phase::PoppingUp, elapsed))
    } else if elapsed <= stayed_up {
        Some((Phase::StayingUp, elapsed - popped_up))
    } else if elapsed <= popped_down {
        Some((Phase::PoppingDown, elapsed - stayed_up))
    } else {
        None
    }
}

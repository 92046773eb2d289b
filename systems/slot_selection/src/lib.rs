#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded slot selection used whenever a new actor cycle begins.
//!
//! Every draw is uniform over the whole table and independent of the previous
//! one, so the actor may reappear in the slot it just left.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zombie_pop_core::{SlotIndex, SlotTable};

/// Draws a slot index uniformly from `0..slot_count`.
///
/// `slot_count` must be positive; slot tables are validated before reaching
/// this point.
pub fn pick<R>(slot_count: usize, rng: &mut R) -> SlotIndex
where
    R: Rng + ?Sized,
{
    debug_assert!(slot_count > 0, "pick requires at least one slot");
    if slot_count <= 1 {
        return SlotIndex::new(0);
    }
    SlotIndex::new(rng.gen_range(0..slot_count))
}

/// Slot selector owning its random source.
#[derive(Clone, Debug)]
pub struct SlotSelector<R = ChaCha8Rng> {
    rng: R,
}

impl SlotSelector<ChaCha8Rng> {
    /// Creates a selector backed by a ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R> SlotSelector<R>
where
    R: Rng,
{
    /// Creates a selector drawing from the provided random source.
    #[must_use]
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draws the slot for the next actor cycle.
    pub fn next_slot(&mut self, table: &SlotTable) -> SlotIndex {
        pick(table.len(), &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot_tables_always_pick_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(pick(1, &mut rng), SlotIndex::new(0));
        }
    }

    #[test]
    fn picks_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..1_000 {
            assert!(pick(9, &mut rng).get() < 9);
        }
    }
}

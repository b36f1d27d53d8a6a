//! Random slot choice that never shows the same hole twice in a row.

use crate::error::{GameError, Result};
use crate::rng::Draw;

pub type Slot = usize;

/// Redraws allowed before we sample straight from the non-repeating set.
pub const MAX_REDRAWS: usize = 4;

/// Remembers the last slot it handed out.
#[derive(Clone, Debug, Default)]
pub struct SlotSelector {
    last: Option<Slot>,
}

impl SlotSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_slot(&self) -> Option<Slot> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Pick one of `slots`, avoiding the previous pick whenever there is a
    /// choice. An empty candidate list is a configuration error.
    pub fn select<D: Draw + ?Sized>(&mut self, slots: &[Slot], rng: &mut D) -> Result<Slot> {
        let chosen = match slots {
            [] => {
                return Err(GameError::InvalidConfiguration(
                    "no slots to choose from".to_string(),
                ));
            }
            [only] => *only,
            _ => self.draw_distinct(slots, rng),
        };
        self.last = Some(chosen);
        Ok(chosen)
    }

    fn draw_distinct<D: Draw + ?Sized>(&self, slots: &[Slot], rng: &mut D) -> Slot {
        let mut pick = slots[rng.draw(slots.len())];
        let mut redraws = 0;
        while Some(pick) == self.last && redraws < MAX_REDRAWS {
            pick = slots[rng.draw(slots.len())];
            redraws += 1;
        }
        if Some(pick) != self.last {
            return pick;
        }
        // Unlucky streak: sample directly from everything but the last slot.
        let others: Vec<Slot> = slots.iter().copied().filter(|s| Some(*s) != self.last).collect();
        if others.is_empty() {
            // Every entry is the last slot (duplicated input); nothing else to offer.
            return pick;
        }
        others[rng.draw(others.len())]
    }
}

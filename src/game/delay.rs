//! How long a mole stays up, per difficulty.

use std::time::Duration;

use crate::config::Difficulty;
use crate::rng::{Draw, random_integer};

pub const EASY_DELAY_MS: u32 = 1500;
pub const NORMAL_DELAY_MS: u32 = 1000;
pub const HARD_DELAY_MIN_MS: u32 = 600;
pub const HARD_DELAY_MAX_MS: u32 = 1200;
/// Pace used for difficulty names we do not recognise.
pub const FALLBACK_DELAY_MS: u32 = NORMAL_DELAY_MS;

/// Display duration in milliseconds. `Hard` resamples on every call.
pub fn delay_ms<D: Draw + ?Sized>(difficulty: Difficulty, rng: &mut D) -> u32 {
    match difficulty {
        Difficulty::Easy => EASY_DELAY_MS,
        Difficulty::Normal => NORMAL_DELAY_MS,
        Difficulty::Hard => random_integer(HARD_DELAY_MIN_MS, HARD_DELAY_MAX_MS, rng),
        Difficulty::Other => FALLBACK_DELAY_MS,
    }
}

pub fn compute_delay<D: Draw + ?Sized>(difficulty: Difficulty, rng: &mut D) -> Duration {
    Duration::from_millis(u64::from(delay_ms(difficulty, rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    #[test]
    fn fixed_difficulties_return_fixed_delays() {
        let mut rng = seeded_rng(3);
        for _ in 0..50 {
            assert_eq!(compute_delay(Difficulty::Easy, &mut rng), Duration::from_millis(1500));
            assert_eq!(compute_delay(Difficulty::Normal, &mut rng), Duration::from_millis(1000));
        }
    }

    #[test]
    fn unknown_difficulty_falls_back_to_normal_pace() {
        let mut rng = seeded_rng(3);
        let d = compute_delay(Difficulty::from("bogus"), &mut rng);
        assert_eq!(d, Duration::from_millis(1000));
    }

    #[test]
    fn hard_delay_stays_within_bounds() {
        let mut rng = seeded_rng(11);
        let mut distinct = std::collections::HashSet::new();
        for _ in 0..1000 {
            let ms = compute_delay(Difficulty::Hard, &mut rng).as_millis() as u32;
            assert!((HARD_DELAY_MIN_MS..=HARD_DELAY_MAX_MS).contains(&ms), "{ms} out of range");
            distinct.insert(ms);
        }
        // Resampled per call, not a single cached value.
        assert!(distinct.len() > 100);
    }
}

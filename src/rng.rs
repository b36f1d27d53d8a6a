//! Random source used by the mole scheduler.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Anything that can hand out uniform indices. Implemented for every `rand`
/// generator; tests plug in scripted sequences.
pub trait Draw {
    /// Uniform integer in `0..upper`. `upper` is always > 0.
    fn draw(&mut self, upper: usize) -> usize;

    /// Uniform integer in `lo..=hi`. `lo <= hi`; the full `u32` range is valid.
    fn draw_inclusive(&mut self, lo: u32, hi: u32) -> u32;
}

impl<R: RngCore> Draw for R {
    fn draw(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }

    fn draw_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        self.gen_range(lo..=hi)
    }
}

/// Uniform integer in `[min, max]` inclusive. Bounds are swapped if reversed.
pub fn random_integer<D: Draw + ?Sized>(min: u32, max: u32, rng: &mut D) -> u32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.draw_inclusive(lo, hi)
}

// Used only when the platform refuses to hand out entropy.
const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// 64-bit seed from the OS / `crypto.getRandomValues`.
pub fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("getrandom failed ({e}); using fixed seed");
            FALLBACK_SEED
        }
    }
}

pub fn entropy_rng() -> SmallRng {
    SmallRng::seed_from_u64(entropy_seed())
}

pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::Draw;
    use std::collections::VecDeque;

    /// Replays fixed draws (each reduced modulo `upper`), then counts upward.
    pub struct ScriptedDraws {
        draws: VecDeque<usize>,
        fallback: usize,
    }

    impl ScriptedDraws {
        pub fn new(draws: &[usize]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
                fallback: 0,
            }
        }
    }

    impl ScriptedDraws {
        fn next_raw(&mut self) -> usize {
            match self.draws.pop_front() {
                Some(d) => d,
                None => {
                    self.fallback = self.fallback.wrapping_add(1);
                    self.fallback
                }
            }
        }
    }

    impl Draw for ScriptedDraws {
        fn draw(&mut self, upper: usize) -> usize {
            self.next_raw() % upper
        }

        fn draw_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
            // Span computed in u64: `0..=u32::MAX` has 2^32 values.
            let span = u64::from(hi - lo) + 1;
            lo + (self.next_raw() as u64 % span) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_integer_stays_in_inclusive_bounds() {
        let mut rng = seeded_rng(7);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..5000 {
            let v = random_integer(1, 4, &mut rng);
            assert!((1..=4).contains(&v));
            saw_min |= v == 1;
            saw_max |= v == 4;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn random_integer_handles_degenerate_and_reversed_ranges() {
        let mut rng = seeded_rng(1);
        assert_eq!(random_integer(5, 5, &mut rng), 5);
        for _ in 0..100 {
            let v = random_integer(10, 2, &mut rng);
            assert!((2..=10).contains(&v));
        }
    }

    #[test]
    fn random_integer_accepts_the_full_u32_range() {
        let mut rng = seeded_rng(11);
        for _ in 0..100 {
            random_integer(0, u32::MAX, &mut rng);
        }
        assert_eq!(random_integer(u32::MAX, u32::MAX, &mut rng), u32::MAX);

        let mut scripted = scripted::ScriptedDraws::new(&[usize::MAX, 7]);
        let top = random_integer(0, u32::MAX, &mut scripted);
        assert_eq!(u64::from(top), usize::MAX as u64 % (1u64 << 32));
        assert_eq!(random_integer(1, u32::MAX, &mut scripted), 8);
    }

    #[test]
    fn seeded_rngs_are_reproducible() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        for _ in 0..32 {
            assert_eq!(a.draw(100), b.draw(100));
        }
    }
}

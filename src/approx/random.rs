//! Seedable randomness for search starting points.

use malachite::num::arithmetic::traits::PowerOf2;
use malachite::Rational;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Resolution of the fractions drawn by [`start_fraction`].
const FRACTION_BITS: u64 = 53;

/// A generator for a fit seeded with `seed`.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// An independent generator for the `index`-th of several sibling fits
/// sharing `seed`.
pub fn forked(seed: u64, index: u64) -> StdRng {
    let mut key = <StdRng as SeedableRng>::Seed::default();

    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&index.to_le_bytes());

    StdRng::from_seed(key)
}

/// Draws a fraction in [2/5, 3/5) for placing a search start inside a
/// bracket without always landing on its midpoint.
pub fn start_fraction<R: RngCore + ?Sized>(rng: &mut R) -> Rational {
    let step = rng.random_range(0..1u64 << FRACTION_BITS);
    let unit = Rational::from(step) / Rational::power_of_2(FRACTION_BITS);

    Rational::from_signeds(2, 5) + unit / Rational::from(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        let mut a = seeded(42);
        let mut b = seeded(42);

        for _ in 0..100 {
            assert_eq!(start_fraction(&mut a), start_fraction(&mut b));
        }

        assert_ne!(seeded(42).next_u64(), seeded(43).next_u64());
    }

    #[test]
    fn forks_differ() {
        let first = forked(7, 0).next_u64();
        let second = forked(7, 1).next_u64();

        assert_ne!(first, second);
        assert_eq!(first, forked(7, 0).next_u64());
        assert_ne!(forked(7, 1).next_u64(), forked(8, 1).next_u64());
    }

    #[test]
    fn fractions_in_range() {
        let mut rng = seeded(0);
        let lo = Rational::from_signeds(2, 5);
        let hi = Rational::from_signeds(3, 5);

        for _ in 0..1000 {
            let u = start_fraction(&mut rng);
            assert!(u >= lo && u < hi);
        }
    }

    #[test]
    fn works_through_trait_objects() {
        let mut boxed: Box<dyn RngCore> = Box::new(seeded(3));
        let u = start_fraction(boxed.as_mut());

        assert_eq!(u, start_fraction(&mut seeded(3)));
    }
}

use malachite::num::arithmetic::traits::RoundToMultipleOfPowerOf2;
use malachite::rounding_modes::RoundingMode;

/// Rounding to a multiple of a power of two.
pub trait RoundBinary: Sized {
    type Output;

    fn round(self, position: i64, mode: RoundingMode) -> Self::Output;

    #[inline]
    fn floor(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Floor)
    }

    #[inline]
    fn ceil(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Ceiling)
    }

    #[inline]
    fn round_nearest(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Nearest)
    }
}

impl<T> RoundBinary for T
where
    T: RoundToMultipleOfPowerOf2<i64>,
{
    type Output = T::Output;

    fn round(self, position: i64, mode: RoundingMode) -> Self::Output {
        self.round_to_multiple_of_power_of_2(position, mode).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use malachite::num::basic::traits::One;
    use malachite::Rational;

    #[test]
    fn rounding_modes() {
        let five_quarters = Rational::from_signeds(5, 4);
        let neg_five_quarters = Rational::from_signeds(-5, 4);

        assert_eq!(five_quarters.clone().floor(-1), Rational::ONE);
        assert_eq!(
            five_quarters.clone().ceil(-1),
            Rational::from_signeds(3, 2)
        );
        assert_eq!(five_quarters.clone().round_nearest(0), Rational::ONE);
        assert_eq!(
            five_quarters.round_nearest(-2),
            Rational::from_signeds(5, 4)
        );

        assert_eq!(
            neg_five_quarters.clone().floor(-1),
            Rational::from_signeds(-3, 2)
        );
        assert_eq!(neg_five_quarters.ceil(-1), Rational::from(-1));
    }
}

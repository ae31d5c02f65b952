//! Numeric conversions.

use std::cmp::Ordering;
use std::fmt;

use malachite::num::arithmetic::traits::{PowerOf2, Sign};
use malachite::num::basic::traits::Zero;
use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::{Integer, Rational};

use super::RoundBinary;
use crate::format::Format;

/// A trait for converting to fixed-point representation.
pub trait FixedPoint {
    /// Rounds `self` to the nearest multiple of 2^`scale` and returns the
    /// multiplier.
    fn scaled_integer(&self, scale: i32) -> Integer;

    /// Computes the fixed-point representation of `self` in the given format,
    /// rounding to the nearest representable value.
    fn to_fixed_point(&self, format: &Format) -> Result<Integer, QuantizeError>;
}

impl FixedPoint for Rational {
    fn scaled_integer(&self, scale: i32) -> Integer {
        let rounded = self.clone().round_nearest(i64::from(scale));
        let scaled = rounded * Rational::power_of_2(-i64::from(scale));

        // `scaled` is an integer, so its denominator is one.
        Integer::from_sign_and_abs(
            scaled.sign() != Ordering::Less,
            scaled.numerator_ref().clone(),
        )
    }

    fn to_fixed_point(
        &self,
        format: &Format,
    ) -> Result<Integer, QuantizeError> {
        let value = self.scaled_integer(format.scale);

        let (min, max) = if format.is_signed {
            let bound = Integer::power_of_2(u64::from(format.width) - 1);

            (-bound.clone(), bound)
        } else {
            (Integer::ZERO, Integer::power_of_2(u64::from(format.width)))
        };

        if value >= min && value < max {
            Ok(value)
        } else {
            Err(QuantizeError {
                value: self.clone(),
                format: format.clone(),
            })
        }
    }
}

/// A value outside the range of a fixed-point format.
#[derive(Debug)]
pub struct QuantizeError {
    pub value: Rational,
    pub format: Format,
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} is out of range for format {}",
            to_f64(&self.value),
            self.format
        )
    }
}

impl std::error::Error for QuantizeError {}

/// Computes the native float nearest to `x`.
///
/// Intended for reporting only; magnitudes outside the range of `f64` saturate
/// to zero or the largest finite value.
pub fn to_f64(x: &Rational) -> f64 {
    f64::rounding_from(x, RoundingMode::Nearest).0
}

/// Number of correct bits implied by an error magnitude, -log2(`error`).
pub fn error_bits(error: &Rational) -> f64 {
    if error.sign() == Ordering::Equal {
        return f64::INFINITY;
    }

    let exponent = error.floor_log_base_2_abs();
    let mantissa = to_f64(&(error * Rational::power_of_2(-exponent))).abs();

    -(exponent as f64 + mantissa.log2())
}

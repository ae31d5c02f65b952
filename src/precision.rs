//! Working precision.
//!
//! Every computation in the fitting pipeline is carried out on exact
//! [`Rational`] values which are rounded back to a fixed number of significant
//! bits whenever an operation would otherwise let their size grow without
//! bound. A [`Precision`] is a plain value threaded through each call, so
//! concurrent fits never observe each other's settings.

use std::fmt;

use malachite::num::arithmetic::traits::{Pow, Reciprocal, Sign};
use malachite::num::basic::traits::{One, Zero};
use malachite::{Natural, Rational};

use crate::utils::rational::RoundBinary;

/// Bits carried beyond those needed to represent the requested number of
/// decimal digits.
const GUARD_BITS: u64 = 16;

/// A working precision, given in significant decimal digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Precision {
    digits: u32,
    bits: u64,
    epsilon: Rational,
}

impl Precision {
    pub const DEFAULT_DIGITS: u32 = 120;

    /// Creates a context carrying `digits` significant decimal digits.
    ///
    /// A request for zero digits is treated as a request for one.
    pub fn new(digits: u32) -> Precision {
        let digits = digits.max(1);

        // 3.322 > log2(10)
        let bits = u64::from(digits) * 3322 / 1000 + 1 + GUARD_BITS;

        let epsilon =
            Rational::from(Natural::from(10u32).pow(u64::from(digits)))
                .reciprocal();

        Precision {
            digits,
            bits,
            epsilon,
        }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Number of significant bits kept by [`Precision::round`].
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// The tolerance 10^-digits used to terminate bisection searches and, by
    /// default, to detect convergence.
    pub fn epsilon(&self) -> &Rational {
        &self.epsilon
    }

    /// Returns a context keeping `extra` additional significant bits.
    ///
    /// The decimal digit count and epsilon are unchanged; the wider context
    /// only absorbs round-off inside longer internal computations.
    pub fn widen(&self, extra: u64) -> Precision {
        Precision {
            bits: self.bits + extra,
            ..self.clone()
        }
    }

    /// Rounds `x` to the nearest value with at most [`Precision::bits`]
    /// significant bits.
    pub fn round(&self, x: Rational) -> Rational {
        if x.sign() == std::cmp::Ordering::Equal {
            return x;
        }

        let msb = x.floor_log_base_2_abs();
        let position = msb + 1 - self.bits as i64;

        x.round_nearest(position)
    }

    /// Converts a native float, failing on infinities and NaN.
    pub fn from_f64(&self, x: f64) -> Result<Rational, NonFiniteError> {
        let value = Rational::try_from(x).map_err(|_| NonFiniteError(x))?;

        Ok(self.round(value))
    }

    /// Converts the ratio `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    pub fn from_ratio(&self, numerator: i64, denominator: i64) -> Rational {
        self.round(Rational::from_signeds(numerator, denominator))
    }

    pub fn zeros(&self, size: usize) -> Vec<Rational> {
        vec![Rational::ZERO; size]
    }

    pub fn ones(&self, size: usize) -> Vec<Rational> {
        vec![Rational::ONE; size]
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::new(Precision::DEFAULT_DIGITS)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} digits ({} bits)", self.digits, self.bits)
    }
}

/// A native float without a rational value.
#[derive(Clone, Copy, Debug)]
pub struct NonFiniteError(pub f64);

impl fmt::Display for NonFiniteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} has no rational value", self.0)
    }
}

impl std::error::Error for NonFiniteError {}

//! Approximation domains.

use std::fmt;

use malachite::num::basic::traits::Two;
use malachite::Rational;

use crate::precision::Precision;
use crate::utils::rational::to_f64;

/// A closed interval [`low`, `high`] of the original input variable, mapped
/// affinely onto the canonical interval [-1, 1].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    low: Rational,
    high: Rational,
    midpoint: Rational,
    half_width: Rational,
}

impl Domain {
    pub fn new(low: Rational, high: Rational) -> Result<Domain, DomainError> {
        if low >= high {
            return Err(DomainError::new(DomainErrorKind::Empty, low, high));
        }

        let midpoint = (&high + &low) / Rational::TWO;
        let half_width = (&high - &low) / Rational::TWO;

        Ok(Domain {
            low,
            high,
            midpoint,
            half_width,
        })
    }

    pub fn low(&self) -> &Rational {
        &self.low
    }

    pub fn high(&self) -> &Rational {
        &self.high
    }

    pub fn width(&self) -> Rational {
        &self.high - &self.low
    }

    pub fn midpoint(&self) -> &Rational {
        &self.midpoint
    }

    pub fn half_width(&self) -> &Rational {
        &self.half_width
    }

    /// Maps a canonical point in [-1, 1] to the original variable.
    pub fn to_original(&self, x: &Rational, prec: &Precision) -> Rational {
        prec.round(x * &self.half_width + &self.midpoint)
    }

    /// Partitions the domain into `count` subdomains of equal width.
    ///
    /// Breakpoints are computed exactly, so adjacent subdomains share their
    /// endpoints.
    pub fn split(&self, count: usize) -> Result<Vec<Domain>, DomainError> {
        if count == 0 {
            return Err(DomainError::new(
                DomainErrorKind::NoSegments,
                self.low.clone(),
                self.high.clone(),
            ));
        }

        let width = self.width();
        let count_q = Rational::from(count);

        let breakpoint =
            |k: usize| &self.low + &width * Rational::from(k) / &count_q;

        (0..count)
            .map(|k| Domain::new(breakpoint(k), breakpoint(k + 1)))
            .collect()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", to_f64(&self.low), to_f64(&self.high))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainErrorKind {
    Empty,
    NoSegments,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainError {
    pub kind: DomainErrorKind,
    pub low: Rational,
    pub high: Rational,
}

impl DomainError {
    fn new(
        kind: DomainErrorKind,
        low: Rational,
        high: Rational,
    ) -> DomainError {
        DomainError { kind, low, high }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (low, high) = (to_f64(&self.low), to_f64(&self.high));

        match self.kind {
            DomainErrorKind::Empty => {
                write!(f, "domain [{low}, {high}] is empty")
            }
            DomainErrorKind::NoSegments => {
                write!(f, "domain [{low}, {high}] split into zero segments")
            }
        }
    }
}

impl std::error::Error for DomainError {}

//! Bisection searches for zero crossings and local maxima.
//!
//! Both searches shrink a bracket until its width drops to a tolerance and
//! guarantee that the point they return lies strictly inside the bracket they
//! were given. A result outside the bracket means the assumptions of the
//! search (a single sign change, or a single interior maximum) do not hold,
//! and is reported as a [`NumericalInstabilityError`].

use std::cmp::Ordering;
use std::fmt;

use malachite::num::arithmetic::traits::Sign;
use malachite::Rational;

use crate::precision::Precision;
use crate::utils::rational::to_f64;

/// A point together with the value of the searched function there.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub x: Rational,
    pub y: Rational,
}

impl Sample {
    pub fn new(x: Rational, y: Rational) -> Sample {
        Sample { x, y }
    }

    /// Evaluates `f` at `x`.
    pub fn at<F>(x: Rational, f: &mut F) -> Sample
    where
        F: FnMut(&Rational) -> Rational,
    {
        let y = f(&x);

        Sample { x, y }
    }
}

/// Finds a zero crossing of `f` between `left` and `right`.
///
/// The bracket is halved at its midpoint, keeping the half whose endpoints
/// differ in sign, until its width is at most `tolerance` or `f` vanishes at
/// the midpoint.
pub fn find_root<F>(
    left: &Sample,
    right: &Sample,
    mut f: F,
    tolerance: &Rational,
    prec: &Precision,
) -> Result<Sample, NumericalInstabilityError>
where
    F: FnMut(&Rational) -> Rational,
{
    check_bracket(left, right)?;

    let mut a = left.clone();
    let mut b = right.clone();

    for _ in 0..step_limit(&left.x, &right.x, tolerance) {
        let c = Sample::at(midpoint(&a.x, &b.x, prec), &mut f);

        if c.y.sign() == Ordering::Equal || &b.x - &a.x <= *tolerance {
            return contained(c, left, right, SearchKind::Root);
        }

        if a.y.sign() != Ordering::Equal && a.y.sign() == c.y.sign() {
            a = c;
        } else {
            b = c;
        }
    }

    Err(NumericalInstabilityError::stalled(SearchKind::Root, left, right))
}

/// Finds a local maximum of `f` between `left` and `right`, starting from the
/// interior point `start`.
///
/// The best point seen so far is kept together with a bracket around it. Each
/// step samples the midpoint of the wider side of the bracket: a better
/// sample becomes the new best point and the bracket is cut at the old one;
/// otherwise the bracket is cut at the new sample. This assumes `f` is
/// unimodal on the bracket.
pub fn find_extremum<F>(
    left: &Sample,
    right: &Sample,
    start: Sample,
    mut f: F,
    tolerance: &Rational,
    prec: &Precision,
) -> Result<Sample, NumericalInstabilityError>
where
    F: FnMut(&Rational) -> Rational,
{
    check_bracket(left, right)?;

    let mut a = left.clone();
    let mut b = right.clone();
    let mut c = start;

    for _ in 0..step_limit(&left.x, &right.x, tolerance) {
        let trial = if &b.x - &c.x > &c.x - &a.x {
            midpoint(&c.x, &b.x, prec)
        } else {
            midpoint(&a.x, &c.x, prec)
        };
        let d = Sample::at(trial, &mut f);

        if d.y < c.y {
            if d.x > c.x {
                b = d;
            } else {
                a = d;
            }
        } else {
            if d.x > c.x {
                a = c;
            } else {
                b = c;
            }

            c = d;
        }

        if &b.x - &a.x <= *tolerance {
            return contained(c, left, right, SearchKind::Extremum);
        }
    }

    Err(NumericalInstabilityError::stalled(
        SearchKind::Extremum,
        left,
        right,
    ))
}

fn midpoint(a: &Rational, b: &Rational, prec: &Precision) -> Rational {
    prec.round((a + b) >> 1u32)
}

/// Bounds the number of steps either search may take. Every two steps shrink
/// the bracket by at least a quarter, so five steps per halving is never
/// exceeded by a search that behaves as intended.
fn step_limit(left: &Rational, right: &Rational, tolerance: &Rational) -> u64 {
    let width = right - left;

    if width <= *tolerance || tolerance.sign() != Ordering::Greater {
        return 1;
    }

    let halvings =
        width.floor_log_base_2_abs() - tolerance.floor_log_base_2_abs();

    5 * (halvings.unsigned_abs() + 1) + 64
}

fn check_bracket(
    left: &Sample,
    right: &Sample,
) -> Result<(), NumericalInstabilityError> {
    if left.x < right.x {
        Ok(())
    } else {
        Err(NumericalInstabilityError {
            kind: SearchKind::Bracket,
            cause: Cause::EmptyBracket,
            left: left.x.clone(),
            right: right.x.clone(),
            found: None,
        })
    }
}

fn contained(
    found: Sample,
    left: &Sample,
    right: &Sample,
    kind: SearchKind,
) -> Result<Sample, NumericalInstabilityError> {
    if left.x < found.x && found.x < right.x {
        Ok(found)
    } else {
        Err(NumericalInstabilityError {
            kind,
            cause: Cause::OutsideBracket,
            left: left.x.clone(),
            right: right.x.clone(),
            found: Some(found.x),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Root,
    Extremum,
    Bracket,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchKind::Root => write!(f, "root search"),
            SearchKind::Extremum => write!(f, "extremum search"),
            SearchKind::Bracket => write!(f, "bracket"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    /// The search produced a point outside its bracket.
    OutsideBracket,
    /// The search failed to shrink its bracket to the tolerance.
    Stalled,
    /// The bracket endpoints were not in increasing order.
    EmptyBracket,
}

/// A violated search invariant.
#[derive(Clone, Debug)]
pub struct NumericalInstabilityError {
    pub kind: SearchKind,
    pub cause: Cause,
    pub left: Rational,
    pub right: Rational,
    pub found: Option<Rational>,
}

impl NumericalInstabilityError {
    fn stalled(kind: SearchKind, left: &Sample, right: &Sample) -> Self {
        NumericalInstabilityError {
            kind,
            cause: Cause::Stalled,
            left: left.x.clone(),
            right: right.x.clone(),
            found: None,
        }
    }
}

impl fmt::Display for NumericalInstabilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (left, right) = (to_f64(&self.left), to_f64(&self.right));

        match (self.cause, &self.found) {
            (Cause::OutsideBracket, Some(found)) => write!(
                f,
                "{} returned {} outside of [{left}, {right}]",
                self.kind,
                to_f64(found)
            ),
            (Cause::EmptyBracket, _) => {
                write!(f, "empty {} [{left}, {right}]", self.kind)
            }
            _ => write!(
                f,
                "{} did not converge on [{left}, {right}]",
                self.kind
            ),
        }
    }
}

impl std::error::Error for NumericalInstabilityError {}

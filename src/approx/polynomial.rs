//! Polynomials in the monomial basis.

use std::fmt;

use itertools::Itertools;
use malachite::num::basic::traits::{NegativeOne, One, Two, Zero};
use malachite::Rational;

use super::remez::RemezState;
use crate::utils::rational::to_f64;

/// A polynomial with exact coefficients, lowest degree first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<Rational>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<Rational>) -> Polynomial {
        Polynomial { coefficients }
    }

    pub fn coefficients(&self) -> &[Rational] {
        &self.coefficients
    }

    /// Converts sum_k `weights`\[k\] T_k(x) to the monomial basis.
    pub fn from_chebyshev(weights: &[Rational]) -> Polynomial {
        let mut result = vec![Rational::ZERO; weights.len()];

        // Monomial coefficients of T_{k-1} and T_k.
        let mut prev: Vec<Rational> = Vec::new();
        let mut curr = vec![Rational::ONE];

        for (k, weight) in weights.iter().enumerate() {
            for (r, c) in result.iter_mut().zip(&curr) {
                *r += weight * c;
            }

            if k + 1 == weights.len() {
                break;
            }

            // T_1 = x, T_{k+1} = 2x T_k - T_{k-1}
            let factor = if k == 0 { Rational::ONE } else { Rational::TWO };
            let mut next = vec![Rational::ZERO; curr.len() + 1];

            for (i, c) in curr.iter().enumerate() {
                next[i + 1] += c * &factor;
            }

            for (i, c) in prev.iter().enumerate() {
                next[i] -= c;
            }

            prev = std::mem::replace(&mut curr, next);
        }

        Polynomial::new(result)
    }

    /// Computes the polynomial x -> p(`offset` + `slope` x).
    pub fn compose_linear(
        &self,
        offset: &Rational,
        slope: &Rational,
    ) -> Polynomial {
        let mut result: Vec<Rational> =
            Vec::with_capacity(self.coefficients.len());

        // Horner's scheme over polynomials.
        for c in self.coefficients.iter().rev() {
            let mut next = vec![Rational::ZERO; result.len() + 1];

            for (i, r) in result.iter().enumerate() {
                next[i] += offset * r;
                next[i + 1] += slope * r;
            }

            next[0] += c;
            result = next;
        }

        Polynomial::new(result)
    }

    /// Evaluates the polynomial exactly.
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coefficients
            .iter()
            .rev()
            .fold(Rational::ZERO, |acc, c| acc * x + c)
    }

    /// The approximation held by `state`, as a polynomial in the fraction t
    /// in [0, 1] of the way through its domain.
    pub fn on_unit_interval(state: &RemezState) -> Polynomial {
        Polynomial::from_chebyshev(state.weights())
            .compose_linear(&Rational::NEGATIVE_ONE, &Rational::TWO)
    }

    /// The approximation held by `state`, as a polynomial in the original
    /// variable.
    pub fn on_domain(state: &RemezState) -> Polynomial {
        let domain = state.problem().domain();

        let slope = Rational::ONE / domain.half_width();
        let offset = -(domain.midpoint() * &slope);

        Polynomial::from_chebyshev(state.weights())
            .compose_linear(&offset, &slope)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(k, c)| match k {
                0 => format!("{}", to_f64(c)),
                1 => format!("{} x", to_f64(c)),
                _ => format!("{} x^{k}", to_f64(c)),
            })
            .join(" + ");

        write!(f, "{terms}")
    }
}

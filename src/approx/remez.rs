//! Minimax approximations by the Remez exchange algorithm.
//!
//! A fit alternates between two phases. The first locates the extrema of the
//! weighted error of the current polynomial, one between each pair of adjacent
//! roots, and re-solves for Chebyshev weights that make the weighted error
//! alternate in sign with a common magnitude at those points. The second
//! locates the roots of the new error, one between each pair of adjacent
//! control points, which bracket the extrema of the next round.
//!
//! All computation happens on the canonical interval [-1, 1]; the problem's
//! domain maps it onto the original variable whenever the target or weight is
//! evaluated.

use std::fmt;

use itertools::Itertools;
use malachite::num::arithmetic::traits::{Abs, Sign};
use malachite::num::basic::traits::{NegativeOne, One, Zero};
use malachite::Rational;
use rand::RngCore;

use super::chebyshev::{basis_matrix, chebyshev_row, evaluate_series};
use super::linalg::{solve, Matrix, SingularSystemError};
use super::problem::Problem;
use super::random::{seeded, start_fraction};
use super::search::{
    find_extremum, find_root, NumericalInstabilityError, Sample,
};
use crate::precision::Precision;
use crate::utils::rational::{error_bits, to_f64};

/// Progress of a fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitStatus {
    /// The initial interpolant has been computed; no step has run yet.
    Initialized,
    /// At least one step has run without meeting the threshold.
    Iterating,
    /// Successive maximum errors differed by less than the threshold.
    Converged,
    /// The iteration cap was reached before converging. The state still holds
    /// the most recent approximation.
    IterationLimitReached,
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FitStatus::Initialized => write!(f, "initialized"),
            FitStatus::Iterating => write!(f, "iterating"),
            FitStatus::Converged => write!(f, "converged"),
            FitStatus::IterationLimitReached => {
                write!(f, "iteration limit reached")
            }
        }
    }
}

/// The evolving state of one fit.
#[derive(Clone, Debug)]
pub struct RemezState {
    problem: Problem,
    roots: Vec<Rational>,
    weights: Vec<Rational>,
    control: Vec<Rational>,
    leveled_error: Rational,
    max_error: Option<Rational>,
    status: FitStatus,
    iterations: usize,
}

impl RemezState {
    /// Computes the initial approximation: the polynomial interpolating the
    /// target at `order + 1` evenly spaced points strictly inside [-1, 1].
    pub fn new(problem: Problem) -> Result<RemezState, RemezError> {
        let prec = problem.precision();
        let order = problem.order();

        let n = order as i64;
        let roots: Vec<Rational> = (0..=n)
            .map(|i| prec.from_ratio(2 * i - n, n + 1))
            .collect();

        let values: Vec<Rational> =
            roots.iter().map(|x| problem.target_at(x)).collect();

        let weights = solve(&basis_matrix(&roots, order, prec), &values, prec)?;

        log::debug!(
            "initial interpolant of order {order} over {}",
            problem.domain()
        );

        Ok(RemezState {
            problem,
            roots,
            weights,
            control: Vec::new(),
            leveled_error: Rational::ZERO,
            max_error: None,
            status: FitStatus::Initialized,
            iterations: 0,
        })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn precision(&self) -> &Precision {
        self.problem.precision()
    }

    /// Current roots of the error, in increasing order.
    pub fn roots(&self) -> &[Rational] {
        &self.roots
    }

    /// Chebyshev weights of the current approximation, lowest degree first.
    pub fn weights(&self) -> &[Rational] {
        &self.weights
    }

    /// Control points of the most recent step, starting at -1 and ending at 1.
    /// Empty before the first step.
    pub fn control_points(&self) -> &[Rational] {
        &self.control
    }

    /// The signed level of the weighted error solved for in the most recent
    /// step.
    pub fn leveled_error(&self) -> &Rational {
        &self.leveled_error
    }

    /// Largest magnitude of the weighted error at the control points of the
    /// most recent step, or `None` before the first step.
    pub fn max_error(&self) -> Option<&Rational> {
        self.max_error.as_ref()
    }

    pub fn status(&self) -> FitStatus {
        self.status
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Evaluates the current approximation at a canonical point.
    pub fn evaluate(&self, x: &Rational) -> Rational {
        evaluate_series(&self.weights, x, self.precision())
    }

    /// The error p(x) - f(x) at a canonical point.
    pub fn residual(&self, x: &Rational) -> Rational {
        let prec = self.precision();

        prec.round(self.evaluate(x) - self.problem.target_at(x))
    }

    /// The error p(x) - f(x) divided by w(x), at a canonical point.
    ///
    /// A vanishing weight yields a vanishing weighted error.
    pub fn weighted_residual(&self, x: &Rational) -> Rational {
        let weight = self.problem.weight_at(x);

        if weight == 0u32 {
            return Rational::ZERO;
        }

        self.precision().round(self.residual(x) / weight)
    }

    fn weighted_error(&self, x: &Rational) -> Rational {
        self.weighted_residual(x).abs()
    }

    /// Runs one exchange followed by a root search.
    ///
    /// Returns `true` once the fit has converged, in which case the roots are
    /// left as they were. Calling `step` on a converged state starts another
    /// round.
    pub fn step<R: RngCore + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<bool, RemezError> {
        let (control, max_error) = self.find_extrema(rng)?;
        let (weights, leveled_error) = self.exchange(&control)?;

        self.weights = weights;
        self.leveled_error = leveled_error;
        self.control = control;
        self.iterations += 1;

        let converged = self
            .max_error
            .as_ref()
            .map_or(false, |previous| {
                (&max_error - previous).abs() < *self.problem.threshold()
            });

        log::debug!(
            "step {}: max error {:e} ({:.2} bits), leveled error {:.2} bits",
            self.iterations,
            to_f64(&max_error),
            error_bits(&max_error),
            error_bits(&self.leveled_error),
        );

        self.max_error = Some(max_error);

        if converged {
            self.status = FitStatus::Converged;
            return Ok(true);
        }

        self.roots = self.find_roots()?;
        self.status = FitStatus::Iterating;

        Ok(false)
    }

    /// Locates the extremum of the weighted error between each pair of
    /// adjacent roots. The domain endpoints are added as the first and last
    /// control points.
    fn find_extrema<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Vec<Rational>, Rational), RemezError> {
        let prec = self.precision();
        let tolerance = prec.epsilon();
        let mut error = |x: &Rational| self.weighted_error(x);

        let mut control = Vec::with_capacity(self.roots.len() + 1);
        control.push(Rational::NEGATIVE_ONE);

        for (a, b) in self.roots.iter().tuple_windows() {
            let start = prec.round(a + (b - a) * start_fraction(rng));

            let left = Sample::at(a.clone(), &mut error);
            let right = Sample::at(b.clone(), &mut error);
            let start = Sample::at(start, &mut error);

            let extremum = find_extremum(
                &left, &right, start, &mut error, tolerance, prec,
            )?;

            log::trace!(
                "extremum of weighted error at {}",
                to_f64(&extremum.x)
            );

            control.push(extremum.x);
        }

        control.push(Rational::ONE);

        let max_error = control
            .iter()
            .map(|x| self.weighted_error(x))
            .max()
            .unwrap_or(Rational::ZERO);

        Ok((control, max_error))
    }

    /// Solves for weights w and a level E such that
    ///
    ///   sum_k w_k T_k(c_i) + s_i |W(c_i)| E = f(c_i)
    ///
    /// at every control point c_i, where s_i alternates starting from -1 at
    /// the first control point. The level term is dropped at both domain
    /// endpoints, so the approximation interpolates the target there.
    fn exchange(
        &self,
        control: &[Rational],
    ) -> Result<(Vec<Rational>, Rational), RemezError> {
        let prec = self.precision();
        let order = self.problem.order();
        let size = control.len();

        let mut matrix = Matrix::zeros(size, size);

        for (i, x) in control.iter().enumerate() {
            let row = chebyshev_row(order, x, prec);

            for (j, value) in row.into_iter().enumerate() {
                matrix[(i, j)] = value;
            }

            if i != 0 && i != size - 1 {
                let weight = self.problem.weight_at(x).abs();
                let level = if i % 2 == 0 { -weight } else { weight };

                matrix[(i, size - 1)] = level;
            }
        }

        let values: Vec<Rational> =
            control.iter().map(|x| self.problem.target_at(x)).collect();

        let mut solution = solve(&matrix, &values, prec)?;
        let leveled_error = solution.pop().unwrap_or(Rational::ZERO);

        Ok((solution, leveled_error))
    }

    /// Locates the zero crossing of the residual between each pair of
    /// adjacent control points.
    fn find_roots(&self) -> Result<Vec<Rational>, RemezError> {
        let prec = self.precision();
        let tolerance = prec.epsilon();
        let mut residual = |x: &Rational| self.residual(x);

        self.control
            .iter()
            .tuple_windows()
            .map(|(a, b)| -> Result<Rational, RemezError> {
                let left = Sample::at(a.clone(), &mut residual);
                let right = Sample::at(b.clone(), &mut residual);

                if left.y.sign() == right.y.sign() {
                    log::debug!(
                        "residual keeps its sign on [{}, {}]",
                        to_f64(&left.x),
                        to_f64(&right.x)
                    );
                }

                let root =
                    find_root(&left, &right, &mut residual, tolerance, prec)?;

                log::trace!("root of residual at {}", to_f64(&root.x));

                Ok(root.x)
            })
            .collect()
    }
}

/// Runs the exchange algorithm to convergence or until the iteration cap,
/// drawing search starting points from a generator seeded by the problem.
pub fn fit(problem: Problem) -> Result<RemezState, RemezError> {
    let mut rng = seeded(problem.seed());

    fit_with(problem, &mut rng)
}

/// Like [`fit`], drawing search starting points from `rng`.
pub fn fit_with<R: RngCore + ?Sized>(
    problem: Problem,
    rng: &mut R,
) -> Result<RemezState, RemezError> {
    let mut state = RemezState::new(problem)?;

    for _ in 0..state.problem.max_iterations() {
        if state.step(rng)? {
            log::info!(
                "converged after {} steps over {}: {:.2} bits",
                state.iterations,
                state.problem.domain(),
                state.max_error.as_ref().map_or(f64::INFINITY, error_bits),
            );

            return Ok(state);
        }
    }

    state.status = FitStatus::IterationLimitReached;

    log::warn!(
        "no convergence within {} steps over {}",
        state.problem.max_iterations(),
        state.problem.domain(),
    );

    Ok(state)
}

/// A fit aborted by a failed linear solve or search.
#[derive(Clone, Debug)]
pub enum RemezError {
    SingularSystem(SingularSystemError),
    NumericalInstability(NumericalInstabilityError),
}

impl From<SingularSystemError> for RemezError {
    fn from(err: SingularSystemError) -> Self {
        RemezError::SingularSystem(err)
    }
}

impl From<NumericalInstabilityError> for RemezError {
    fn from(err: NumericalInstabilityError) -> Self {
        RemezError::NumericalInstability(err)
    }
}

impl fmt::Display for RemezError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RemezError::SingularSystem(err) => write!(f, "{err}"),
            RemezError::NumericalInstability(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RemezError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemezError::SingularSystem(err) => Some(err),
            RemezError::NumericalInstability(err) => Some(err),
        }
    }
}

//! Approximation problems.

use std::fmt;
use std::sync::Arc;

use malachite::Rational;

use super::domain::{Domain, DomainError};
use crate::precision::Precision;

/// A real function evaluated at a working precision.
pub type RealFn = dyn Fn(&Rational, &Precision) -> Rational + Send + Sync;

/// The function being approximated together with its weight.
///
/// The minimized quantity is (p(x) - f(x)) / w(x), so taking the weight equal
/// to the target yields a relative-error fit and a constant weight of one an
/// absolute-error fit. Both receive points of the original variable.
#[derive(Clone)]
pub struct FunctionPair {
    target: Arc<RealFn>,
    weight: Arc<RealFn>,
}

impl FunctionPair {
    pub fn new<F, W>(target: F, weight: W) -> FunctionPair
    where
        F: Fn(&Rational, &Precision) -> Rational + Send + Sync + 'static,
        W: Fn(&Rational, &Precision) -> Rational + Send + Sync + 'static,
    {
        FunctionPair {
            target: Arc::new(target),
            weight: Arc::new(weight),
        }
    }

    /// A pair whose weight coincides with the target.
    pub fn relative<F>(target: F) -> FunctionPair
    where
        F: Fn(&Rational, &Precision) -> Rational + Send + Sync + 'static,
    {
        let target: Arc<RealFn> = Arc::new(target);

        FunctionPair {
            weight: Arc::clone(&target),
            target,
        }
    }

    pub fn target(&self, x: &Rational, prec: &Precision) -> Rational {
        (self.target)(x, prec)
    }

    pub fn weight(&self, x: &Rational, prec: &Precision) -> Rational {
        (self.weight)(x, prec)
    }
}

impl fmt::Debug for FunctionPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionPair").finish_non_exhaustive()
    }
}

/// A complete description of one fit.
///
/// Problems are built once and then only read. The `with_*` methods consume
/// the problem and return an adjusted copy.
#[derive(Clone, Debug)]
pub struct Problem {
    functions: FunctionPair,
    domain: Domain,
    order: usize,
    precision: Precision,
    threshold: Option<Rational>,
    max_iterations: usize,
    seed: u64,
}

impl Problem {
    pub const DEFAULT_MAX_ITERATIONS: usize = 10;

    /// Creates a problem fitting a polynomial of degree `order` to
    /// `functions` over `domain`.
    pub fn new(
        functions: FunctionPair,
        domain: Domain,
        order: usize,
    ) -> Result<Problem, ProblemError> {
        if order == 0 {
            return Err(ProblemError::ZeroOrder);
        }

        Ok(Problem {
            functions,
            domain,
            order,
            precision: Precision::default(),
            threshold: None,
            max_iterations: Problem::DEFAULT_MAX_ITERATIONS,
            seed: 0,
        })
    }

    pub fn with_digits(self, digits: u32) -> Problem {
        self.with_precision(Precision::new(digits))
    }

    pub fn with_precision(self, precision: Precision) -> Problem {
        Problem { precision, ..self }
    }

    /// Sets the convergence threshold. Unless set, the threshold follows the
    /// precision's epsilon.
    pub fn with_threshold(self, threshold: Rational) -> Problem {
        Problem {
            threshold: Some(threshold),
            ..self
        }
    }

    /// Caps the number of exchange steps. At least one step always runs.
    pub fn with_max_iterations(self, max_iterations: usize) -> Problem {
        Problem {
            max_iterations: max_iterations.max(1),
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Problem {
        Problem { seed, ..self }
    }

    pub fn with_domain(self, domain: Domain) -> Problem {
        Problem { domain, ..self }
    }

    pub fn functions(&self) -> &FunctionPair {
        &self.functions
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    pub fn threshold(&self) -> &Rational {
        self.threshold
            .as_ref()
            .unwrap_or_else(|| self.precision.epsilon())
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Evaluates the target at a canonical point in [-1, 1].
    pub fn target_at(&self, x: &Rational) -> Rational {
        let original = self.domain.to_original(x, &self.precision);

        self.functions.target(&original, &self.precision)
    }

    /// Evaluates the weight at a canonical point in [-1, 1].
    pub fn weight_at(&self, x: &Rational) -> Rational {
        let original = self.domain.to_original(x, &self.precision);

        self.functions.weight(&original, &self.precision)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProblemError {
    ZeroOrder,
    Domain(DomainError),
}

impl From<DomainError> for ProblemError {
    fn from(err: DomainError) -> Self {
        ProblemError::Domain(err)
    }
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProblemError::ZeroOrder => {
                write!(f, "polynomial order must be at least one")
            }
            ProblemError::Domain(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ProblemError {}

//! Built-in functions.

use malachite::num::arithmetic::traits::Pow;
use malachite::num::basic::traits::{One, Zero};
use malachite::Rational;
use strum_macros::{Display, EnumIter, EnumString};

use super::elementary;
use crate::approx::{Domain, DomainError, FunctionPair, Problem, ProblemError};
use crate::precision::Precision;

/// A function with a predefined weight and domain.
///
/// Arguments that would make the target or weight singular are shifted into
/// the domain, e.g., `log` approximates ln(1 + x) on (0, 1). Every built-in is
/// fitted for relative error, except `log` and `log2`, whose weights also
/// vanish towards the upper end of the domain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Exp,
    Exp2,
    Log,
    Log2,
    Rcp,
    Sqrt,
    Rsqrt,
    Atan,
    Sin,
}

impl Builtin {
    pub fn functions(self) -> FunctionPair {
        match self {
            Builtin::Exp => FunctionPair::relative(elementary::exp),
            Builtin::Exp2 => FunctionPair::relative(elementary::exp2),
            Builtin::Log => FunctionPair::new(log1p, |x, prec| {
                let y = log1p(x, prec);

                prec.round(&y * (elementary::ln2(prec) - &y))
            }),
            Builtin::Log2 => FunctionPair::new(log2_1p, |x, prec| {
                let y = log2_1p(x, prec);

                prec.round(&y * (Rational::ONE - &y))
            }),
            Builtin::Rcp => FunctionPair::relative(|x, prec| {
                prec.round(Rational::ONE / (x + Rational::ONE))
            }),
            Builtin::Sqrt => FunctionPair::relative(|x, prec| {
                elementary::sqrt(&(x + Rational::ONE), prec)
            }),
            Builtin::Rsqrt => FunctionPair::relative(|x, prec| {
                let root = elementary::sqrt(&(x + Rational::ONE), prec);

                prec.round(Rational::ONE / root)
            }),
            Builtin::Atan => FunctionPair::relative(elementary::atan),
            Builtin::Sin => FunctionPair::relative(sin_sqrt),
        }
    }

    /// The domain over which the function is approximated.
    pub fn domain(self, prec: &Precision) -> Result<Domain, DomainError> {
        let digits = i64::from(prec.digits() / 3).max(1);
        let nudge = Rational::from(10).pow(-digits);

        match self {
            Builtin::Log | Builtin::Log2 => {
                Domain::new(nudge.clone(), Rational::ONE - nudge)
            }
            Builtin::Sin => Domain::new(nudge, Rational::ONE),
            _ => Domain::new(Rational::ZERO, Rational::ONE),
        }
    }

    /// A problem fitting a polynomial of degree `order` at precision `prec`.
    pub fn problem(
        self,
        order: usize,
        prec: Precision,
    ) -> Result<Problem, ProblemError> {
        let domain = self.domain(&prec)?;

        Ok(Problem::new(self.functions(), domain, order)?.with_precision(prec))
    }
}

fn log1p(x: &Rational, prec: &Precision) -> Rational {
    elementary::ln(&(x + Rational::ONE), prec)
}

fn log2_1p(x: &Rational, prec: &Precision) -> Rational {
    elementary::log2(&(x + Rational::ONE), prec)
}

/// sin(pi/2 sqrt(x)) / sqrt(x), the factor left after extracting sqrt(x)
/// from a quarter-wave sine of a squared argument.
fn sin_sqrt(x: &Rational, prec: &Precision) -> Rational {
    let work = prec.widen(16);
    let half_pi = elementary::pi(&work) >> 1u32;

    let s = work.round(elementary::sqrt(x, &work) * &half_pi);

    prec.round(elementary::sin(&s, &work) / s * half_pi)
}

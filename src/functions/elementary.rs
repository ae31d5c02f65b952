//! Elementary functions at arbitrary precision.
//!
//! Each function is evaluated as a [`BigFloat`] carrying a few guard bits
//! beyond the given precision and returned rounded to that precision.

use std::cell::RefCell;

use astro_float::{BigFloat, Consts, Exponent, RoundingMode, Word};
use malachite::num::arithmetic::traits::Sign;
use malachite::num::basic::traits::Zero;
use malachite::num::logic::traits::SignificantBits;
use malachite::{Natural, Rational};

use crate::precision::Precision;
use crate::utils::rational::{to_f64, RoundBinary};

/// Extra bits carried through each evaluation.
const GUARD_BITS: u64 = 16;

const ROUNDING: RoundingMode = RoundingMode::ToEven;

const WORD_BITS: u64 = Word::BITS as u64;

thread_local! {
    static CONSTS: RefCell<Result<Consts, astro_float::Error>> =
        RefCell::new(Consts::new());
}

/// Converts `x`, rounded to `bits` significant bits, to a float.
fn to_big_float(x: &Rational, bits: usize) -> BigFloat {
    if *x == 0u32 {
        return BigFloat::from_word(0, bits);
    }

    let msb = x.floor_log_base_2_abs();
    let x = x.clone().round_nearest(msb + 1 - bits as i64);

    // x = m 2^-k with the denominator 2^k.
    let shift = x.denominator_ref().significant_bits() - 1;
    let m = x.numerator_ref();
    let len = m.significant_bits().div_ceil(WORD_BITS);

    // Normalize so that the top bit of the top word is set.
    let mantissa = m << (len * WORD_BITS - m.significant_bits());
    let exponent = m.significant_bits() as i64 - shift as i64;

    let sign = if x.sign() == std::cmp::Ordering::Less {
        astro_float::Sign::Neg
    } else {
        astro_float::Sign::Pos
    };

    BigFloat::from_raw_parts(
        &mantissa.to_limbs_asc(),
        (len * WORD_BITS) as usize,
        sign,
        exponent as Exponent,
        false,
    )
}

/// Converts a finite float to the rational it represents exactly.
fn from_big_float(x: &BigFloat) -> Option<Rational> {
    if x.is_zero() {
        return Some(Rational::ZERO);
    }

    let (words, _, sign, exponent, _) = x.as_raw_parts()?;

    let mantissa = Rational::from(Natural::from_limbs_asc(words));
    let scale = i64::from(exponent) - (words.len() as u64 * WORD_BITS) as i64;
    let magnitude = mantissa << scale;

    Some(match sign {
        astro_float::Sign::Neg => -magnitude,
        astro_float::Sign::Pos => magnitude,
    })
}

/// Evaluates `f` at the working precision for `prec`, given the number of
/// bits to compute with and a constants cache.
///
/// # Panics
///
/// Panics if the result is not finite.
fn evaluate<F>(name: &str, x: &Rational, prec: &Precision, f: F) -> Rational
where
    F: FnOnce(usize, &mut Consts) -> BigFloat,
{
    let bits = (prec.bits() + GUARD_BITS) as usize;

    let result = CONSTS.with(|cell| match &mut *cell.borrow_mut() {
        Ok(consts) => f(bits, consts),
        Err(err) => panic!("{name}: no constants cache: {err:?}"),
    });

    match from_big_float(&result) {
        Some(value) => prec.round(value),
        None => panic!("{name}({}) is not finite", to_f64(x)),
    }
}

/// Computes e^`x`.
pub fn exp(x: &Rational, prec: &Precision) -> Rational {
    evaluate("exp", x, prec, |p, cc| {
        to_big_float(x, p).exp(p, ROUNDING, cc)
    })
}

/// Computes 2^`x`.
pub fn exp2(x: &Rational, prec: &Precision) -> Rational {
    evaluate("exp2", x, prec, |p, cc| {
        BigFloat::from_word(2, p).pow(&to_big_float(x, p), p, ROUNDING, cc)
    })
}

/// Computes ln 2.
pub fn ln2(prec: &Precision) -> Rational {
    evaluate("ln", &Rational::from(2), prec, |p, cc| {
        BigFloat::from_word(2, p).ln(p, ROUNDING, cc)
    })
}

/// Computes the natural logarithm of `x`.
///
/// # Panics
///
/// Panics if `x` is not positive.
pub fn ln(x: &Rational, prec: &Precision) -> Rational {
    assert!(*x > 0u32, "logarithm of a non-positive value");

    evaluate("ln", x, prec, |p, cc| to_big_float(x, p).ln(p, ROUNDING, cc))
}

/// Computes the base-2 logarithm of `x`.
///
/// # Panics
///
/// Panics if `x` is not positive.
pub fn log2(x: &Rational, prec: &Precision) -> Rational {
    assert!(*x > 0u32, "logarithm of a non-positive value");

    evaluate("log2", x, prec, |p, cc| {
        to_big_float(x, p).log2(p, ROUNDING, cc)
    })
}

/// Computes the square root of `x`.
///
/// # Panics
///
/// Panics if `x` is negative.
pub fn sqrt(x: &Rational, prec: &Precision) -> Rational {
    assert!(*x >= 0u32, "square root of a negative value");

    evaluate("sqrt", x, prec, |p, _| to_big_float(x, p).sqrt(p, ROUNDING))
}

/// Computes pi.
pub fn pi(prec: &Precision) -> Rational {
    evaluate("pi", &Rational::ZERO, prec, |p, cc| cc.pi(p, ROUNDING))
}

/// Computes the arctangent of `x`.
pub fn atan(x: &Rational, prec: &Precision) -> Rational {
    evaluate("atan", x, prec, |p, cc| {
        to_big_float(x, p).atan(p, ROUNDING, cc)
    })
}

/// Computes the sine of `x`.
pub fn sin(x: &Rational, prec: &Precision) -> Rational {
    evaluate("sin", x, prec, |p, cc| to_big_float(x, p).sin(p, ROUNDING, cc))
}

#[cfg(test)]
mod tests {
    use super::*;

    use malachite::num::arithmetic::traits::{Abs, PowerOf2};
    use malachite::num::basic::traits::One;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::from_signeds(n, d)
    }

    fn assert_near(got: &Rational, want: f64) {
        let got = to_f64(got);

        assert!(
            (got - want).abs() <= 4.0 * f64::EPSILON * want.abs().max(1e-300),
            "{got} != {want}"
        );
    }

    /// Checks that two evaluations agree to nearly the full precision.
    fn assert_agree(a: &Rational, b: &Rational, prec: &Precision) {
        let tolerance = a.abs().max(Rational::ONE) * prec.epsilon();

        assert!((a - b).abs() < tolerance, "{a} != {b}");
    }

    #[test]
    fn native_agreement() {
        let prec = Precision::new(30);

        for (n, d) in [(-7, 2), (-1, 3), (1, 10), (1, 2), (3, 4), (5, 1)] {
            let x = rat(n, d);
            let native = n as f64 / d as f64;

            assert_near(&exp(&x, &prec), native.exp());
            assert_near(&exp2(&x, &prec), native.exp2());
            assert_near(&atan(&x, &prec), native.atan());
            assert_near(&sin(&x, &prec), native.sin());

            if native > 0.0 {
                assert_near(&ln(&x, &prec), native.ln());
                assert_near(&log2(&x, &prec), native.log2());
                assert_near(&sqrt(&x, &prec), native.sqrt());
            }
        }

        assert_near(&pi(&prec), std::f64::consts::PI);
        assert_near(&ln2(&prec), std::f64::consts::LN_2);
    }

    #[test]
    fn identities_at_high_precision() {
        let prec = Precision::new(100);
        let x = rat(5, 7);

        // ln(exp(x)) = x
        assert_agree(&ln(&exp(&x, &prec), &prec), &x, &prec);

        // sqrt(x)^2 = x
        let root = sqrt(&x, &prec);
        assert_agree(&prec.round(&root * &root), &x, &prec);

        // 4 atan(1) = pi
        assert_agree(&(atan(&Rational::ONE, &prec) << 2u32), &pi(&prec), &prec);

        // sin(pi / 6) = 1/2
        let sixth = prec.round(pi(&prec) / Rational::from(6));
        assert_agree(&sin(&sixth, &prec), &rat(1, 2), &prec);

        // 2^10 = 1024
        let power = exp2(&Rational::from(10), &prec);
        assert_agree(&power, &Rational::from(1024), &prec);
    }

    #[test]
    fn exact_cases() {
        let prec = Precision::new(20);

        assert_eq!(exp(&Rational::ZERO, &prec), Rational::ONE);
        assert_eq!(ln(&Rational::ONE, &prec), Rational::ZERO);
        assert_eq!(sqrt(&rat(9, 16), &prec), rat(3, 4));
        assert_eq!(sqrt(&Rational::ZERO, &prec), Rational::ZERO);
        assert_eq!(sin(&Rational::ZERO, &prec), Rational::ZERO);
        assert_eq!(atan(&Rational::ZERO, &prec), Rational::ZERO);
    }

    #[test]
    fn exact_float_conversion() {
        let large = Rational::from(5) * Rational::power_of_2(70i64);
        let small = Rational::from(-3) * Rational::power_of_2(-90i64);

        for x in [rat(-3, 8), large, small, Rational::ONE] {
            assert_eq!(from_big_float(&to_big_float(&x, 128)), Some(x));
        }

        // 1/3 is rounded to the requested number of bits.
        let third = from_big_float(&to_big_float(&rat(1, 3), 64)).unwrap();
        assert!((third - rat(1, 3)).abs() < Rational::power_of_2(-65i64));
    }

    #[test]
    fn symmetry() {
        let prec = Precision::new(40);
        let x = rat(13, 5);

        assert_agree(&atan(&-&x, &prec), &-atan(&x, &prec), &prec);
        assert_agree(&sin(&-&x, &prec), &-sin(&x, &prec), &prec);
    }

    #[test]
    #[should_panic]
    fn log_of_zero() {
        ln(&Rational::ZERO, &Precision::new(10));
    }
}

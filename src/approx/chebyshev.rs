//! Chebyshev polynomials of the first kind.

use malachite::num::basic::traits::{One, Zero};
use malachite::Rational;

use super::linalg::Matrix;
use crate::precision::Precision;

/// Evaluates T_`n`(`x`) by the three-term recurrence
/// T_{k+1}(x) = 2x T_k(x) - T_{k-1}(x).
///
/// Intended for `x` in [-1, 1], although any `x` is accepted.
pub fn chebyshev(n: usize, x: &Rational, prec: &Precision) -> Rational {
    match n {
        0 => Rational::ONE,
        1 => x.clone(),
        _ => {
            let two_x = x << 1u32;

            let mut prev = Rational::ONE;
            let mut curr = x.clone();

            for _ in 1..n {
                let next = prec.round(&two_x * &curr - prev);

                prev = curr;
                curr = next;
            }

            curr
        }
    }
}

/// Evaluates T_0(`x`) through T_`degree`(`x`).
pub fn chebyshev_row(
    degree: usize,
    x: &Rational,
    prec: &Precision,
) -> Vec<Rational> {
    let mut row = Vec::with_capacity(degree + 1);

    row.push(Rational::ONE);

    if degree >= 1 {
        row.push(x.clone());
    }

    let two_x = x << 1u32;

    for k in 2..=degree {
        let next = prec.round(&two_x * &row[k - 1] - &row[k - 2]);

        row.push(next);
    }

    row
}

/// Builds the matrix whose entry (i, j) is T_j(`points`\[i\]), for j up to and
/// including `degree`.
pub fn basis_matrix(
    points: &[Rational],
    degree: usize,
    prec: &Precision,
) -> Matrix {
    let mut matrix = Matrix::zeros(points.len(), degree + 1);

    for (i, x) in points.iter().enumerate() {
        for (j, value) in chebyshev_row(degree, x, prec).into_iter().enumerate()
        {
            matrix[(i, j)] = value;
        }
    }

    matrix
}

/// Evaluates the series sum_k `weights`\[k\] T_k(`x`) by Clenshaw's
/// recurrence.
pub fn evaluate_series(
    weights: &[Rational],
    x: &Rational,
    prec: &Precision,
) -> Rational {
    let Some((first, rest)) = weights.split_first() else {
        return Rational::ZERO;
    };

    let two_x = x << 1u32;

    let mut b1 = Rational::ZERO;
    let mut b2 = Rational::ZERO;

    for weight in rest.iter().rev() {
        let b0 = prec.round(&two_x * &b1 - &b2 + weight);

        b2 = b1;
        b1 = b0;
    }

    prec.round(first + x * b1 - b2)
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::from_signeds(n, d)
    }

    #[test]
    fn low_degrees() {
        let prec = Precision::new(30);
        let x = rat(3, 8);

        assert_eq!(chebyshev(0, &x, &prec), Rational::ONE);
        assert_eq!(chebyshev(1, &x, &prec), x);

        // T_2 = 2x^2 - 1, T_3 = 4x^3 - 3x
        assert_eq!(chebyshev(2, &x, &prec), rat(-23, 32));
        assert_eq!(chebyshev(3, &x, &prec), rat(-117, 128));
    }

    #[test]
    fn endpoint_values() {
        let prec = Precision::new(30);

        for n in 0..12 {
            assert_eq!(chebyshev(n, &Rational::ONE, &prec), Rational::ONE);

            let sign = if n % 2 == 0 { 1 } else { -1 };
            assert_eq!(
                chebyshev(n, &Rational::from(-1), &prec),
                Rational::from(sign)
            );
        }
    }

    #[test]
    fn cosine_identity_at_half() {
        // T_n(cos(pi/3)) = cos(n pi/3), which cycles with period 6.
        let prec = Precision::new(30);
        let cycle = [
            rat(1, 1),
            rat(1, 2),
            rat(-1, 2),
            rat(-1, 1),
            rat(-1, 2),
            rat(1, 2),
        ];

        for n in 0..18 {
            assert_eq!(chebyshev(n, &rat(1, 2), &prec), cycle[n % 6]);
        }
    }

    #[test]
    fn row_matches_single_evaluation() {
        let prec = Precision::new(40);
        let x = rat(-5, 7);
        let row = chebyshev_row(9, &x, &prec);

        assert_eq!(row.len(), 10);

        for (n, value) in row.iter().enumerate() {
            assert_eq!(value, &chebyshev(n, &x, &prec));
        }
    }

    #[test]
    fn basis_matrix_layout() {
        let prec = Precision::new(30);
        let points = [rat(-1, 1), rat(0, 1), rat(1, 2)];
        let matrix = basis_matrix(&points, 2, &prec);

        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 3);

        let expected = [
            [rat(1, 1), rat(-1, 1), rat(1, 1)],
            [rat(1, 1), rat(0, 1), rat(-1, 1)],
            [rat(1, 1), rat(1, 2), rat(-1, 2)],
        ];

        for (i, j) in (0..3).cartesian_product(0..3) {
            assert_eq!(matrix[(i, j)], expected[i][j]);
        }
    }

    #[test]
    fn clenshaw_matches_direct_sum() {
        let prec = Precision::new(40);
        let weights = [rat(1, 2), rat(-3, 4), rat(1, 8), rat(5, 16)];
        let x = rat(3, 4);

        // Dyadic inputs with few bits keep every step exact.
        let direct = weights
            .iter()
            .enumerate()
            .fold(Rational::ZERO, |acc, (k, w)| {
                acc + w * chebyshev(k, &x, &prec)
            });

        assert_eq!(evaluate_series(&weights, &x, &prec), direct);
        assert_eq!(evaluate_series(&[], &x, &prec), Rational::ZERO);
        assert_eq!(evaluate_series(&weights[..1], &x, &prec), rat(1, 2));
    }
}

//! Dense linear systems.

use std::fmt;
use std::ops::{Index, IndexMut};

use malachite::num::arithmetic::traits::Abs;
use malachite::num::basic::traits::{One, Zero};
use malachite::Rational;

use crate::precision::Precision;

/// A dense, row-major matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Rational>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![Rational::ZERO; rows * cols],
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![Rational::ONE; rows * cols],
        }
    }

    pub fn identity(size: usize) -> Matrix {
        let mut matrix = Matrix::zeros(size, size);

        for i in 0..size {
            matrix[(i, i)] = Rational::ONE;
        }

        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[Rational] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn mul_vec(&self, x: &[Rational]) -> Vec<Rational> {
        (0..self.rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(x)
                    .fold(Rational::ZERO, |acc, (a, b)| acc + a * b)
            })
            .collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Rational;

    fn index(&self, (i, j): (usize, usize)) -> &Rational {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Rational {
        &mut self.data[i * self.cols + j]
    }
}

/// An LU factorization with partial pivoting, P A = L U.
///
/// L (unit diagonal) and U share storage; `perm[i]` is the row of A that ended
/// up in row `i`.
pub struct LuDecomposition {
    lu: Matrix,
    perm: Vec<usize>,
}

impl LuDecomposition {
    /// Factors a square matrix.
    ///
    /// Fails if some pivot is no larger than epsilon times the largest entry
    /// of `a`, i.e., if `a` is singular at the working precision.
    pub fn new(
        a: &Matrix,
        prec: &Precision,
    ) -> Result<LuDecomposition, SingularSystemError> {
        let n = a.rows();

        if a.cols() != n {
            return Err(SingularSystemError::NotSquare {
                rows: a.rows(),
                cols: a.cols(),
            });
        }

        let scale = a
            .data
            .iter()
            .map(|x| x.abs())
            .max()
            .unwrap_or(Rational::ZERO);

        let tolerance = prec.epsilon() * scale;

        let mut lu = a.clone();
        let mut perm: Vec<usize> = (0..n).collect();

        for col in 0..n {
            let Some((pivot_row, pivot)) = (col..n)
                .map(|row| (row, (&lu[(row, col)]).abs()))
                .max_by(|(_, x), (_, y)| x.cmp(y))
            else {
                break;
            };

            if pivot <= tolerance {
                return Err(SingularSystemError::Singular { size: n, col });
            }

            if pivot_row != col {
                for j in 0..n {
                    lu.data.swap(col * n + j, pivot_row * n + j);
                }

                perm.swap(col, pivot_row);
            }

            for row in col + 1..n {
                let factor = prec.round(&lu[(row, col)] / &lu[(col, col)]);

                for j in col + 1..n {
                    let update = &factor * &lu[(col, j)];
                    let value = prec.round(&lu[(row, j)] - update);

                    lu[(row, j)] = value;
                }

                lu[(row, col)] = factor;
            }
        }

        Ok(LuDecomposition { lu, perm })
    }

    /// Solves A x = `b` using the stored factorization.
    pub fn solve(
        &self,
        b: &[Rational],
        prec: &Precision,
    ) -> Result<Vec<Rational>, SingularSystemError> {
        let n = self.perm.len();

        if b.len() != n {
            return Err(SingularSystemError::NotSquare {
                rows: b.len(),
                cols: n,
            });
        }

        // Forward substitution with the unit lower triangle.
        let mut y: Vec<Rational> = Vec::with_capacity(n);

        for i in 0..n {
            let sum = (0..i).fold(b[self.perm[i]].clone(), |acc, j| {
                acc - &self.lu[(i, j)] * &y[j]
            });

            y.push(prec.round(sum));
        }

        // Back substitution with the upper triangle.
        let mut x = vec![Rational::ZERO; n];

        for i in (0..n).rev() {
            let sum = (i + 1..n)
                .fold(y[i].clone(), |acc, j| acc - &self.lu[(i, j)] * &x[j]);

            x[i] = prec.round(sum / &self.lu[(i, i)]);
        }

        Ok(x)
    }
}

/// Solves the square system `a` x = `b`.
pub fn solve(
    a: &Matrix,
    b: &[Rational],
    prec: &Precision,
) -> Result<Vec<Rational>, SingularSystemError> {
    LuDecomposition::new(a, prec)?.solve(b, prec)
}

/// A linear system without a unique solution at the working precision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SingularSystemError {
    /// A pivot in column `col` of a `size`-by-`size` matrix vanished.
    Singular { size: usize, col: usize },
    NotSquare { rows: usize, cols: usize },
}

impl fmt::Display for SingularSystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SingularSystemError::Singular { size, col } => write!(
                f,
                "{size}x{size} system is singular \
                 (vanishing pivot in column {col})"
            ),
            SingularSystemError::NotSquare { rows, cols } => {
                write!(f, "{rows}x{cols} system is not square")
            }
        }
    }
}

impl std::error::Error for SingularSystemError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64, d: i64) -> Rational {
        Rational::from_signeds(n, d)
    }

    fn assert_close(got: &Rational, want: &Rational, prec: &Precision) {
        assert!((got - want).abs() < *prec.epsilon(), "{got} != {want}");
    }

    fn matrix(rows: &[&[i64]]) -> Matrix {
        let mut m = Matrix::zeros(rows.len(), rows[0].len());

        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                m[(i, j)] = Rational::from(value);
            }
        }

        m
    }

    #[test]
    fn solves_with_pivoting() {
        let prec = Precision::new(40);

        // The leading zero forces a row exchange.
        let a = matrix(&[&[0, 2, 1], &[1, -1, 0], &[3, 0, -2]]);
        let x = [rat(1, 2), rat(-1, 4), rat(2, 1)];
        let b = a.mul_vec(&x);

        let solved = solve(&a, &b, &prec).unwrap();

        for (got, want) in solved.iter().zip(&x) {
            assert_close(got, want, &prec);
        }
    }

    #[test]
    fn nonsymmetric_system() {
        let prec = Precision::new(60);
        let a = matrix(&[
            &[1, -1, 1, -1],
            &[1, 0, -1, 1],
            &[1, 1, 1, 0],
            &[2, 3, 5, 7],
        ]);
        let x = [rat(3, 1), rat(-2, 1), rat(5, 8), rat(1, 16)];
        let b = a.mul_vec(&x);

        let solved = solve(&a, &b, &prec).unwrap();

        for (got, want) in solved.iter().zip(&x) {
            assert_close(got, want, &prec);
        }
    }

    #[test]
    fn identity_solve() {
        let prec = Precision::new(20);
        let b = vec![rat(1, 3), rat(-7, 2)];

        let x = solve(&Matrix::identity(2), &b, &prec).unwrap();

        assert_eq!(x[1], rat(-7, 2));
        assert_close(&x[0], &rat(1, 3), &prec);
    }

    #[test]
    fn singular_systems() {
        let prec = Precision::new(30);

        let rank_deficient = matrix(&[&[1, 2], &[2, 4]]);
        assert_eq!(
            solve(&rank_deficient, &[rat(1, 1), rat(2, 1)], &prec),
            Err(SingularSystemError::Singular { size: 2, col: 1 })
        );

        assert!(matches!(
            solve(&Matrix::ones(3, 3), &prec.ones(3), &prec),
            Err(SingularSystemError::Singular { .. })
        ));

        assert!(matches!(
            solve(&Matrix::zeros(2, 3), &prec.zeros(2), &prec),
            Err(SingularSystemError::NotSquare { .. })
        ));

        assert_eq!(
            solve(&Matrix::zeros(0, 0), &[], &prec),
            Ok(Vec::new())
        );
    }

    #[test]
    fn mismatched_right_hand_side() {
        let prec = Precision::new(20);
        let lu = LuDecomposition::new(&Matrix::identity(3), &prec).unwrap();

        assert_eq!(
            lu.solve(&prec.ones(2), &prec),
            Err(SingularSystemError::NotSquare { rows: 2, cols: 3 })
        );
        assert_eq!(lu.solve(&prec.ones(3), &prec), Ok(prec.ones(3)));

        assert!(matches!(
            solve(&Matrix::identity(2), &prec.ones(3), &prec),
            Err(SingularSystemError::NotSquare { .. })
        ));
    }

    #[test]
    fn nearly_singular_within_epsilon() {
        let prec = Precision::new(20);

        // A perturbation below epsilon is indistinguishable from singular.
        let mut a = matrix(&[&[1, 1], &[1, 1]]);
        a[(1, 1)] = Rational::ONE + prec.epsilon() / Rational::from(10);

        assert!(solve(&a, &prec.ones(2), &prec).is_err());

        // One well above epsilon is not.
        a[(1, 1)] = Rational::ONE + prec.epsilon() * Rational::from(1000);

        assert!(solve(&a, &prec.ones(2), &prec).is_ok());
    }
}

//! Minimax polynomial approximation.

pub mod chebyshev;
pub mod domain;
pub mod linalg;
pub mod polynomial;
pub mod problem;
pub mod random;
pub mod remez;
pub mod search;
pub mod segmented;

pub use domain::{Domain, DomainError};
pub use linalg::SingularSystemError;
pub use polynomial::Polynomial;
pub use problem::{FunctionPair, Problem, ProblemError};
pub use random::{forked, seeded};
pub use remez::{fit, fit_with, FitStatus, RemezError, RemezState};
pub use search::NumericalInstabilityError;
pub use segmented::{fit_segmented, SegmentError, SegmentResult, SegmentedFit};

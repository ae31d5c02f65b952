//! Piecewise approximations over equal-width segments.

use std::fmt;

use malachite::num::basic::traits::Zero;
use malachite::Rational;
use rayon::prelude::*;

use super::domain::{Domain, DomainError};
use super::problem::Problem;
use super::random::forked;
use super::remez::{fit_with, RemezError, RemezState};
use crate::utils::rational::error_bits;

/// The fit for one segment.
#[derive(Clone, Debug)]
pub struct SegmentResult {
    pub index: usize,
    pub domain: Domain,
    pub state: RemezState,
    pub max_error: Rational,
}

/// A segment whose fit was aborted.
#[derive(Clone, Debug)]
pub struct SegmentError {
    pub index: usize,
    pub domain: Domain,
    pub error: RemezError,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "segment {} over {}: {}", self.index, self.domain, self.error)
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Per-segment outcomes, in segment order.
#[derive(Clone, Debug)]
pub struct SegmentedFit {
    segments: Vec<Result<SegmentResult, SegmentError>>,
}

impl SegmentedFit {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Result<SegmentResult, SegmentError>] {
        &self.segments
    }

    pub fn failures(&self) -> impl Iterator<Item = &SegmentError> {
        self.segments.iter().filter_map(|s| s.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The largest maximum error over all segments, or the first failure.
    pub fn max_error(&self) -> Result<Rational, &SegmentError> {
        let mut worst = Rational::ZERO;

        for segment in &self.segments {
            let error = &segment.as_ref()?.max_error;

            if *error > worst {
                worst = error.clone();
            }
        }

        Ok(worst)
    }

    /// Extracts the successful fits, or the first failure.
    pub fn into_results(self) -> Result<Vec<SegmentResult>, SegmentError> {
        self.segments.into_iter().collect()
    }
}

/// Splits the problem's domain into `segments` pieces of equal width and fits
/// each independently.
///
/// Segments are fitted in parallel. Each draws its search starting points from
/// a generator derived from the problem's seed and its own index, so the
/// result does not depend on scheduling. A failed segment is reported in place
/// and does not affect the others.
pub fn fit_segmented(
    problem: &Problem,
    segments: usize,
) -> Result<SegmentedFit, DomainError> {
    let domains = problem.domain().split(segments)?;

    let segments = domains
        .into_par_iter()
        .enumerate()
        .map(|(index, domain)| fit_segment(problem, index, domain))
        .collect();

    Ok(SegmentedFit { segments })
}

fn fit_segment(
    problem: &Problem,
    index: usize,
    domain: Domain,
) -> Result<SegmentResult, SegmentError> {
    let mut rng = forked(problem.seed(), index as u64);
    let segment = problem.clone().with_domain(domain.clone());

    match fit_with(segment, &mut rng) {
        Ok(state) => {
            let max_error =
                state.max_error().cloned().unwrap_or(Rational::ZERO);

            log::debug!(
                "segment {index} over {domain}: {:.2} bits ({})",
                error_bits(&max_error),
                state.status(),
            );

            Ok(SegmentResult {
                index,
                domain,
                state,
                max_error,
            })
        }
        Err(error) => {
            log::warn!("segment {index} over {domain} failed: {error}");

            Err(SegmentError {
                index,
                domain,
                error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use malachite::num::basic::traits::One;

    use crate::approx::problem::FunctionPair;
    use crate::approx::remez::fit;
    use crate::functions::elementary;

    fn exp_problem(order: usize, digits: u32) -> Problem {
        let domain = Domain::new(Rational::ZERO, Rational::ONE).unwrap();

        Problem::new(FunctionPair::relative(elementary::exp), domain, order)
            .unwrap()
            .with_digits(digits)
    }

    #[test]
    fn more_segments_never_hurt() {
        let problem = exp_problem(2, 30);

        let errors: Vec<Rational> = [1, 2, 4, 8]
            .into_iter()
            .map(|n| {
                let result = fit_segmented(&problem, n).unwrap();

                assert_eq!(result.len(), n);
                assert!(result.is_complete());

                result.max_error().unwrap()
            })
            .collect();

        for (coarse, fine) in errors.iter().zip(&errors[1..]) {
            assert!(fine <= coarse, "{fine} > {coarse}");
        }
    }

    #[test]
    fn segments_are_ordered_and_cover_domain() {
        let problem = exp_problem(2, 20);
        let result =
            fit_segmented(&problem, 4).unwrap().into_results().unwrap();

        for (i, segment) in result.iter().enumerate() {
            assert_eq!(segment.index, i);
            assert_eq!(segment.state.problem().domain(), &segment.domain);
        }

        assert_eq!(result[0].domain.low(), &Rational::ZERO);
        assert_eq!(result[3].domain.high(), &Rational::ONE);
    }

    #[test]
    fn single_segment_matches_forked_fit() {
        let problem = exp_problem(3, 25).with_seed(5);

        let segmented =
            fit_segmented(&problem, 1).unwrap().into_results().unwrap();
        let direct =
            fit_with(problem.clone(), &mut forked(5, 0)).unwrap();

        assert_eq!(segmented[0].state.weights(), direct.weights());

        // A plain fit seeds its generator differently but lands on the same
        // approximation.
        let plain = fit(problem).unwrap();
        let error = segmented[0].max_error.clone();
        let tolerance = &error / Rational::from(1000);
        let difference = plain.max_error().unwrap() - &error;

        assert!(difference < tolerance && -difference < tolerance);
    }

    #[test]
    fn failures_are_reported_in_place() {
        // The weight vanishes on the lower half of the domain only, which
        // leaves those segments' exchange systems singular.
        let functions = FunctionPair::new(
            |x, _| x.clone(),
            |x, _| {
                if *x < Rational::from_signeds(1, 2) {
                    Rational::ZERO
                } else {
                    Rational::ONE
                }
            },
        );
        let domain = Domain::new(Rational::ZERO, Rational::ONE).unwrap();
        let problem =
            Problem::new(functions, domain, 1).unwrap().with_digits(20);

        let result = fit_segmented(&problem, 4).unwrap();

        assert!(!result.is_complete());
        assert!(result.segments()[0].is_err());
        assert!(result.segments()[1].is_err());
        assert!(result.segments()[2].is_ok());
        assert!(result.segments()[3].is_ok());
        assert_eq!(result.max_error().unwrap_err().index, 0);
        assert_eq!(result.failures().count(), 2);
    }

    #[test]
    fn zero_segments_rejected() {
        assert!(fit_segmented(&exp_problem(2, 20), 0).is_err());
    }
}

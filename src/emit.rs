//! Coefficient tables.
//!
//! A table lists, one row per segment, the coefficients of each polynomial
//! quantized to a fixed-point format and ordered from the highest degree down,
//! the order in which Horner's scheme consumes them.

use std::fmt;
use std::io;

use itertools::Itertools;
use malachite::num::basic::traits::Zero;
use malachite::{Integer, Rational};

use crate::approx::{Polynomial, RemezState, SegmentResult};
use crate::format::Format;
use crate::utils::rational::{error_bits, FixedPoint, QuantizeError};

/// The coefficients of one or more polynomials approximating a function.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    order: usize,
    rows: Vec<Polynomial>,
    max_error: Rational,
}

impl Table {
    /// A table holding a single polynomial in the fraction of the way through
    /// the fitted domain.
    pub fn single(name: &str, state: &RemezState) -> Table {
        Table {
            name: name.to_string(),
            order: state.problem().order(),
            rows: vec![Polynomial::on_unit_interval(state)],
            max_error: state.max_error().cloned().unwrap_or(Rational::ZERO),
        }
    }

    /// A table holding one polynomial per segment, each in the original
    /// variable.
    pub fn segmented(
        name: &str,
        order: usize,
        segments: &[SegmentResult],
    ) -> Table {
        let max_error = segments
            .iter()
            .map(|segment| &segment.max_error)
            .max()
            .cloned()
            .unwrap_or(Rational::ZERO);

        Table {
            name: name.to_string(),
            order,
            rows: segments
                .iter()
                .map(|segment| Polynomial::on_domain(&segment.state))
                .collect(),
            max_error,
        }
    }

    /// Quantizes every coefficient, highest degree first.
    pub fn quantize(
        &self,
        format: &Format,
    ) -> Result<Vec<Vec<Integer>>, QuantizeError> {
        self.rows
            .iter()
            .map(|row| {
                row.coefficients()
                    .iter()
                    .rev()
                    .map(|c| c.to_fixed_point(format))
                    .collect()
            })
            .collect()
    }

    /// Writes the table, preceded by a comment summarizing the fit.
    pub fn write<W: io::Write>(
        &self,
        format: &Format,
        out: &mut W,
    ) -> Result<(), EmitError> {
        let rows = self.quantize(format)?;
        let segments = self.rows.len();

        writeln!(
            out,
            "// {}: order {}, {} segment{}, {:.2} bits, {}",
            self.name,
            self.order,
            segments,
            if segments == 1 { "" } else { "s" },
            error_bits(&self.max_error),
            format,
        )?;

        if segments == 1 {
            writeln!(out, "{}_{} = [", self.name, self.order)?;
        } else {
            writeln!(out, "{}_{}_{} = [", self.name, self.order, segments)?;
        }

        for (polynomial, row) in self.rows.iter().zip(rows) {
            log::debug!("{}: {polynomial}", self.name);

            writeln!(out, "    {},", row.iter().join(", "))?;
        }

        writeln!(out, "]")?;

        Ok(())
    }
}

#[derive(Debug)]
pub enum EmitError {
    Io(io::Error),
    Quantize(QuantizeError),
}

impl From<io::Error> for EmitError {
    fn from(err: io::Error) -> Self {
        EmitError::Io(err)
    }
}

impl From<QuantizeError> for EmitError {
    fn from(err: QuantizeError) -> Self {
        EmitError::Quantize(err)
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmitError::Io(err) => write!(f, "{err}"),
            EmitError::Quantize(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::Io(err) => Some(err),
            EmitError::Quantize(err) => Some(err),
        }
    }
}

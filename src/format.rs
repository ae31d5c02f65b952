//! Numeric formats.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use itertools::PeekingNext;

/// A fixed-point number format with `width` total bits and a scaling factor of
/// 2^`scale`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Format {
    pub scale: i32,
    pub width: u32,
    pub is_signed: bool,
}

impl Format {
    /// Computes the widths of the integer and fractional parts of the format,
    /// returning `None` if either part contains implicit zero bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use polyfit::format::Format;
    /// #
    /// let format = Format { scale: -1, width: 4, is_signed: false };
    ///
    /// assert_eq!(format.parts(), Some((3, 1)));
    /// assert_eq!(Format { scale: 1, ..format }.parts(), None);
    /// assert_eq!(Format { scale: -5, ..format }.parts(), None);
    /// ```
    pub fn parts(&self) -> Option<(u32, u32)> {
        let frac_width = self.scale.unsigned_abs();
        let int_width = self.width.checked_sub(frac_width)?;

        (self.scale <= 0).then_some((int_width, frac_width))
    }
}

impl Default for Format {
    /// Signed Q2.30, the layout expected by 32-bit fixed-point Horner
    /// evaluation of coefficients in (-2, 2).
    fn default() -> Self {
        Format {
            scale: -30,
            width: 32,
            is_signed: true,
        }
    }
}

impl FromStr for Format {
    type Err = ParseFormatError;

    /// Parses a fixed-point format in ARM-style Q notation.
    #[allow(clippy::from_str_radix_10)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut iter = s.chars();
        let is_signed = iter.peeking_next(|&x| x == 'U').is_none();

        if !matches!(iter.next(), Some('Q')) {
            return Err(ParseFormatError);
        }

        let rest = iter.as_str();
        let split = rest.find('.').ok_or(ParseFormatError)?;

        let int_width = u16::from_str_radix(&rest[..split], 10)?;
        let frac_width = u16::from_str_radix(&rest[split + 1..], 10)?;

        let width = u32::from(int_width) + u32::from(frac_width);

        if width == 0 {
            return Err(ParseFormatError);
        }

        Ok(Format {
            scale: -i32::from(frac_width),
            width,
            is_signed,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = if self.is_signed { "" } else { "U" };

        match self.parts() {
            Some((int_width, frac_width)) => {
                write!(f, "{prefix}Q{int_width}.{frac_width}")
            }
            None => write!(f, "{prefix}{}b*2^{}", self.width, self.scale),
        }
    }
}

#[derive(Debug)]
pub struct ParseFormatError;

impl From<ParseIntError> for ParseFormatError {
    fn from(_: ParseIntError) -> Self {
        ParseFormatError
    }
}

impl fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid format")
    }
}

impl std::error::Error for ParseFormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_notation() {
        let signed: Format = "Q2.30".parse().unwrap();

        assert_eq!(signed, Format::default());
        assert_eq!(signed.to_string(), "Q2.30");

        let unsigned: Format = "UQ1.15".parse().unwrap();

        assert_eq!(
            unsigned,
            Format {
                scale: -15,
                width: 16,
                is_signed: false
            }
        );
        assert_eq!(unsigned.to_string(), "UQ1.15");
    }

    #[test]
    fn malformed() {
        for s in ["", "Q", "Q2", "Q2.", "X2.30", "QQ2.30", "Q0.0", "Q-1.3"] {
            assert!(s.parse::<Format>().is_err(), "{s}");
        }
    }
}

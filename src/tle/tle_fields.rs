//! # Fixed-column field descriptors of the NORAD two-line format
//!
//! Every numeric value of a TLE lives at a fixed column range. Instead of scattering magic
//! indices through the parser, each range is declared once as a [`TleField`] constant carrying
//! its name (used in error messages), its line and its **0-indexed, inclusive** columns.
//!
//! ```text
//! 1 NNNNNU YYLLLPPP YYDDD.DDDDDDDD  .NNNNNNNN  NNNNN-N  NNNNN-N N NNNNC
//! 2 NNNNN III.IIII RRR.RRRR EEEEEEE PPP.PPPP MMM.MMMM NN.NNNNNNNNRRRRRC
//! ```
//!
//! Blanks inside a field are not significant: the payload is stripped of spaces before the
//! numeric parse, so ` 66816` and `66816` decode identically.
//!
//! ## Packed exponential notation
//!
//! BSTAR and the second derivative of the mean motion are printed as a signed five-digit
//! mantissa with an implied leading decimal point followed by a signed one-digit power of ten:
//! `-11606-4` is `-0.11606e-4`. The mantissa and the exponent are declared as two separate
//! descriptors and recombined by [`parse_packed_exponential`].
use crate::predict_errors::ParseTleError;

/// Last column read by the parser; the checksum column that follows it is optional.
pub const LAST_CONSUMED_COLUMN: usize = 67;

/// Minimum length of a line holding every field.
pub const MIN_LINE_LENGTH: usize = LAST_CONSUMED_COLUMN + 1;

/// One fixed-column field of a TLE line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TleField {
    /// Name reported in parse errors.
    pub name: &'static str,
    /// First column, 0-indexed.
    pub start: usize,
    /// Last column, 0-indexed and inclusive.
    pub end: usize,
}

// Line 1
pub const SATELLITE_NUMBER: TleField = TleField::new("satellite number", 2, 6);
pub const INTERNATIONAL_DESIGNATOR: TleField = TleField::new("international designator", 9, 16);
pub const EPOCH_YEAR: TleField = TleField::new("epoch year", 18, 19);
pub const EPOCH_DAY: TleField = TleField::new("epoch day", 20, 31);
/// First derivative of the mean motion divided by two, rev/day², with an explicit decimal point.
pub const MEAN_MOTION_DOT: TleField = TleField::new("mean motion first derivative", 33, 42);
/// Sign and five digits, implied leading decimal point.
pub const MEAN_MOTION_DDOT_MANTISSA: TleField =
    TleField::new("mean motion second derivative mantissa", 44, 49);
pub const MEAN_MOTION_DDOT_EXPONENT: TleField =
    TleField::new("mean motion second derivative exponent", 50, 51);
pub const BSTAR_MANTISSA: TleField = TleField::new("bstar mantissa", 53, 58);
pub const BSTAR_EXPONENT: TleField = TleField::new("bstar exponent", 59, 60);
pub const ELEMENT_NUMBER: TleField = TleField::new("element set number", 64, 67);

// Line 2
pub const INCLINATION: TleField = TleField::new("inclination", 8, 15);
pub const RIGHT_ASCENSION: TleField = TleField::new("right ascension of the ascending node", 17, 24);
/// Seven digits with an implied leading decimal point.
pub const ECCENTRICITY: TleField = TleField::new("eccentricity", 26, 32);
pub const ARGUMENT_OF_PERIGEE: TleField = TleField::new("argument of perigee", 34, 41);
pub const MEAN_ANOMALY: TleField = TleField::new("mean anomaly", 43, 50);
pub const MEAN_MOTION: TleField = TleField::new("mean motion", 52, 62);
pub const REVOLUTION_NUMBER: TleField = TleField::new("revolution number at epoch", 63, 67);

impl TleField {
    pub const fn new(name: &'static str, start: usize, end: usize) -> Self {
        TleField { name, start, end }
    }

    /// Raw columns of the field. The caller guarantees an ASCII line of at least
    /// [`MIN_LINE_LENGTH`] characters.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..=self.end]
    }

    /// Field payload with every blank removed; fails on an all-blank field.
    fn stripped(&self, line: &str) -> Result<String, ParseTleError> {
        let payload: String = self.slice(line).chars().filter(|c| *c != ' ').collect();
        if payload.is_empty() {
            return Err(ParseTleError::EmptyField { field: self.name });
        }
        Ok(payload)
    }

    pub fn parse_text(&self, line: &str) -> String {
        self.slice(line).trim().to_string()
    }

    pub fn parse_f64(&self, line: &str) -> Result<f64, ParseTleError> {
        let payload = self.stripped(line)?;
        match payload.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseTleError::InvalidNumber {
                field: self.name,
                value: payload,
            }),
        }
    }

    pub fn parse_i64(&self, line: &str) -> Result<i64, ParseTleError> {
        let payload = self.stripped(line)?;
        payload
            .parse::<i64>()
            .map_err(|_| ParseTleError::InvalidNumber {
                field: self.name,
                value: payload,
            })
    }

    /// Integer field that must fit in 32 bits.
    pub fn parse_i32(&self, line: &str) -> Result<i32, ParseTleError> {
        let value = self.parse_i64(line)?;
        i32::try_from(value).map_err(|_| ParseTleError::IntegerOverflow {
            field: self.name,
            value: value.to_string(),
        })
    }

    /// Integer with an implied leading decimal point over the whole field width.
    pub fn parse_implied_decimal(&self, line: &str) -> Result<f64, ParseTleError> {
        let digits = self.end - self.start + 1;
        let value = self.parse_i32(line)?;
        if value < 0 {
            return Err(ParseTleError::InvalidNumber {
                field: self.name,
                value: value.to_string(),
            });
        }
        Ok(value as f64 / 10f64.powi(digits as i32))
    }
}

/// Decode a value in NORAD packed exponential notation.
///
/// Arguments
/// -----------------
/// * `mantissa`: descriptor of the signed five-digit mantissa (implied `0.` prefix).
/// * `exponent`: descriptor of the signed single-digit power of ten.
/// * `line`: the TLE line holding both fields.
///
/// Return
/// ----------
/// * `mantissa × 1e-5 × 10^exponent`, the exponent sign being honoured.
pub fn parse_packed_exponential(
    mantissa: &TleField,
    exponent: &TleField,
    line: &str,
) -> Result<f64, ParseTleError> {
    let m = mantissa.parse_i32(line)?;

    let raw_exponent = exponent.stripped(line)?;
    let e = match raw_exponent.parse::<i32>() {
        Ok(e) if (-9..=9).contains(&e) => e,
        _ => {
            return Err(ParseTleError::InvalidExponent {
                field: exponent.name,
                value: raw_exponent,
            })
        }
    };

    Ok(m as f64 * 1.0e-5 * 10f64.powi(e))
}

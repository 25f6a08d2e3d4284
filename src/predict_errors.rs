use thiserror::Error;

use crate::ephemeris::EphemerisModel;

/// Field-level failures while decoding a NORAD two-line element set.
///
/// Variants
/// -----------------
/// * `LineTooShort` – The line does not reach the last consumed column.
/// * `NotAscii` – The line carries non-ASCII bytes, fixed columns are meaningless.
/// * `WrongLineNumber` – Column 0 is not the expected `1` / `2`.
/// * `EmptyField` – Nothing but blanks in a numeric field.
/// * `InvalidNumber` – The stripped payload is not a number.
/// * `IntegerOverflow` – An integer field does not fit in 32 bits.
/// * `InvalidExponent` – The packed exponent of BSTAR or n̈ is not a signed digit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseTleError {
    #[error("TLE line {line} is too short ({len} characters)")]
    LineTooShort { line: u8, len: usize },

    #[error("TLE line {line} contains non-ASCII characters")]
    NotAscii { line: u8 },

    #[error("TLE line {line} starts with {found:?}")]
    WrongLineNumber { line: u8, found: char },

    #[error("TLE field `{field}` is empty")]
    EmptyField { field: &'static str },

    #[error("TLE field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("TLE field `{field}` overflows 32 bits: {value}")]
    IntegerOverflow { field: &'static str, value: String },

    #[error("TLE field `{field}` has an invalid exponent: {value:?}")]
    InvalidExponent { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Error during the TLE parsing: {0}")]
    TleParsing(#[from] ParseTleError),

    #[error("Non-physical orbital elements: {0}")]
    InvalidElements(String),

    #[error("Ephemeris model mismatch: expected {expected:?}, found {found:?}")]
    ModelMismatch {
        expected: EphemerisModel,
        found: EphemerisModel,
    },

    #[error("Deep-space element set but no deep-space model was provided")]
    DeepSpaceModelUnavailable,

    #[error("Invalid propagator configuration: {0}")]
    InvalidConfig(String),

    #[error("NaN in observer coordinates: {0}")]
    InvalidFloatValue(#[from] ordered_float::FloatIsNan),
}

impl PartialEq for PredictError {
    fn eq(&self, other: &Self) -> bool {
        use PredictError::*;
        match (self, other) {
            (TleParsing(a), TleParsing(b)) => a == b,
            (InvalidElements(a), InvalidElements(b)) => a == b,
            (
                ModelMismatch {
                    expected: e1,
                    found: f1,
                },
                ModelMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            (InvalidFloatValue(_), InvalidFloatValue(_)) => true,
            (DeepSpaceModelUnavailable, DeepSpaceModelUnavailable) => true,

            _ => false,
        }
    }
}

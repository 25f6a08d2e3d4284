//! # Two-line element sets
//!
//! Decoding of NORAD two-line element sets (TLE) into [`OrbitalElements`], the immutable input of
//! every propagation model of the crate.
//!
//! ## Overview
//!
//! - [`parse_tle`] reads both lines through the named column descriptors of [`tle_fields`],
//!   then validates the physical ranges of the result. A failure anywhere rejects the whole
//!   element set: no partially filled value is ever returned.
//! - [`OrbitalElements::model`] classifies the set as near-Earth or deep-space from its
//!   Brouwer mean motion (period below or above 225 minutes). The tag is computed, never
//!   stored, so it always agrees with the elements.
//! - A handful of derived quantities (epoch as a Julian date, perigee/apogee altitudes,
//!   geosynchronous test, visibility from a given latitude) are exposed as methods.
//!
//! ## Units
//!
//! Angles are stored in **degrees** and the mean motion in **revolutions per day**, exactly as
//! printed in the TLE. Conversion to the normalized SGP4 units happens in
//! [`crate::ephemeris::sgp4::Sgp4::new`].
//!
//! ## Example
//!
//! ```rust
//! use obdh_predict::tle::parse_tle;
//! use obdh_predict::ephemeris::EphemerisModel;
//!
//! let elements = parse_tle(
//!     "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991",
//!     "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444",
//! )?;
//! assert_eq!(elements.satellite_number, 44885);
//! assert_eq!(elements.model(), EphemerisModel::NearEarth);
//! # Ok::<(), obdh_predict::predict_errors::PredictError>(())
//! ```
pub mod tle_fields;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{
    Degree, JulianDate, Kilometer, Radian, AE, CK2, DEEP_SPACE_PERIOD_THRESHOLD, DPI,
    EARTH_RADIUS_KM_WGS84, GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD,
    GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES, GEOSYNCHRONOUS_LOWER_MEAN_MOTION,
    GEOSYNCHRONOUS_UPPER_MEAN_MOTION, MINUTES_PER_DAY, TWO_THIRD, XKE,
};
use crate::ephemeris::EphemerisModel;
use crate::predict_errors::{ParseTleError, PredictError};
use crate::time::{full_epoch_year, julian_date_of_epoch};

use tle_fields::{
    parse_packed_exponential, TleField, ARGUMENT_OF_PERIGEE, BSTAR_EXPONENT, BSTAR_MANTISSA,
    ECCENTRICITY, ELEMENT_NUMBER, EPOCH_DAY, EPOCH_YEAR, INCLINATION, INTERNATIONAL_DESIGNATOR,
    MEAN_ANOMALY, MEAN_MOTION, MEAN_MOTION_DDOT_EXPONENT, MEAN_MOTION_DDOT_MANTISSA,
    MEAN_MOTION_DOT, MIN_LINE_LENGTH, REVOLUTION_NUMBER, RIGHT_ASCENSION, SATELLITE_NUMBER,
};

/// Mean orbital elements of one TLE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub satellite_number: i32,
    pub designator: String,
    /// Two-digit epoch year as printed, see [`OrbitalElements::full_epoch_year`].
    pub epoch_year: i32,
    /// Fractional day of year, 1.0 being January 1st 0h UTC.
    pub epoch_day: f64,
    pub inclination: Degree,
    pub right_ascension: Degree,
    pub eccentricity: f64,
    pub argument_of_perigee: Degree,
    pub mean_anomaly: Degree,
    /// Revolutions per day.
    pub mean_motion: f64,
    /// First derivative of the mean motion, as printed (rev/day²).
    pub mean_motion_dot: f64,
    /// Second derivative of the mean motion, as printed (rev/day³).
    pub mean_motion_ddot: f64,
    /// Drag term, inverse Earth radii.
    pub bstar: f64,
    pub element_number: i64,
    pub revolution_number: i32,
}

/// Brouwer mean semi-major axis (Earth radii) and mean motion (rad/min) recovered from the
/// Kozai mean motion of a TLE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BrouwerMean {
    pub aodp: f64,
    pub xnodp: f64,
}

impl OrbitalElements {
    /// Check the physical ranges of the elements.
    ///
    /// Return
    /// ----------
    /// * `Ok(())`, or [`PredictError::InvalidElements`] naming the first offending value.
    pub fn validate(&self) -> Result<(), PredictError> {
        let finite = [
            ("epoch day", self.epoch_day),
            ("inclination", self.inclination),
            ("right ascension", self.right_ascension),
            ("eccentricity", self.eccentricity),
            ("argument of perigee", self.argument_of_perigee),
            ("mean anomaly", self.mean_anomaly),
            ("mean motion", self.mean_motion),
            ("mean motion first derivative", self.mean_motion_dot),
            ("mean motion second derivative", self.mean_motion_ddot),
            ("bstar", self.bstar),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictError::InvalidElements(format!(
                "{name} is not finite ({value})"
            )));
        }

        if !(0..=99).contains(&self.epoch_year) {
            return Err(PredictError::InvalidElements(format!(
                "epoch year {} is not a two-digit year",
                self.epoch_year
            )));
        }
        if !(self.epoch_day >= 1.0 && self.epoch_day < 367.0) {
            return Err(PredictError::InvalidElements(format!(
                "epoch day {} is outside [1, 367)",
                self.epoch_day
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(PredictError::InvalidElements(format!(
                "eccentricity {} is outside [0, 1)",
                self.eccentricity
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination) {
            return Err(PredictError::InvalidElements(format!(
                "inclination {} is outside [0°, 180°]",
                self.inclination
            )));
        }
        for (name, angle) in [
            ("right ascension", self.right_ascension),
            ("argument of perigee", self.argument_of_perigee),
            ("mean anomaly", self.mean_anomaly),
        ] {
            if !(0.0..=360.0).contains(&angle) {
                return Err(PredictError::InvalidElements(format!(
                    "{name} {angle} is outside [0°, 360°]"
                )));
            }
        }
        if self.mean_motion <= 0.0 {
            return Err(PredictError::InvalidElements(format!(
                "mean motion must be positive, got {}",
                self.mean_motion
            )));
        }
        Ok(())
    }

    /// Recover the Brouwer mean elements with the single closed-form correction of SGP4.
    pub(crate) fn brouwer_mean(&self) -> BrouwerMean {
        let xno = self.mean_motion * DPI / MINUTES_PER_DAY;
        let a1 = (XKE / xno).powf(TWO_THIRD);
        let cosio = self.inclination.to_radians().cos();
        let x3thm1 = 3.0 * cosio * cosio - 1.0;
        let betao2 = 1.0 - self.eccentricity * self.eccentricity;
        let betao = betao2.sqrt();

        let del1 = 1.5 * CK2 * x3thm1 / (a1 * a1 * betao * betao2);
        let ao = a1 * (1.0 - del1 * (0.5 * TWO_THIRD + del1 * (1.0 + 134.0 / 81.0 * del1)));
        let delo = 1.5 * CK2 * x3thm1 / (ao * ao * betao * betao2);

        BrouwerMean {
            aodp: ao / (1.0 - delo),
            xnodp: xno / (1.0 + delo),
        }
    }

    /// Nodal period from the Brouwer mean motion, in minutes.
    pub fn period_minutes(&self) -> f64 {
        DPI / self.brouwer_mean().xnodp
    }

    /// Propagation model matching the element set: deep-space when the period reaches 225 minutes.
    pub fn model(&self) -> EphemerisModel {
        if self.period_minutes() / MINUTES_PER_DAY >= DEEP_SPACE_PERIOD_THRESHOLD {
            EphemerisModel::DeepSpace
        } else {
            EphemerisModel::NearEarth
        }
    }

    /// Four-digit epoch year (NORAD pivot: 57-99 → 19xx, 00-56 → 20xx).
    pub fn full_epoch_year(&self) -> i32 {
        full_epoch_year(self.epoch_year)
    }

    /// Epoch of the element set as a Julian date (UTC).
    pub fn epoch_julian(&self) -> JulianDate {
        julian_date_of_epoch(self.epoch_year, self.epoch_day)
    }

    /// Perigee altitude above the equatorial radius, from the Brouwer semi-major axis.
    pub fn perigee_km(&self) -> Kilometer {
        let aodp = self.brouwer_mean().aodp;
        (aodp * (1.0 - self.eccentricity) - AE) * EARTH_RADIUS_KM_WGS84
    }

    /// Apogee altitude above the equatorial radius, from the Kepler third-law semi-major axis.
    pub fn apogee_km(&self) -> Kilometer {
        let sma = 331.25 * ((MINUTES_PER_DAY / self.mean_motion).ln() * TWO_THIRD).exp();
        sma * (1.0 + self.eccentricity) - EARTH_RADIUS_KM_WGS84
    }

    pub fn is_geosynchronous(&self) -> bool {
        (GEOSYNCHRONOUS_LOWER_MEAN_MOTION..=GEOSYNCHRONOUS_UPPER_MEAN_MOTION)
            .contains(&self.mean_motion)
            && self.eccentricity.abs() <= GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD
            && self.inclination.abs() <= GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES
    }

    /// Whether the satellite can ever rise above the horizon of a site at `latitude`.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude of the site, radians.
    ///
    /// Return
    /// ----------
    /// * `true` when the highest latitude covered by the footprint at apogee reaches the site.
    pub fn aos_happens(&self, latitude: Radian) -> bool {
        if self.mean_motion == 0.0 {
            return false;
        }

        let inclination = if self.inclination >= 90.0 {
            180.0 - self.inclination
        } else {
            self.inclination
        };
        let apogee = self.apogee_km();

        (EARTH_RADIUS_KM_WGS84 / (apogee + EARTH_RADIUS_KM_WGS84)).acos()
            + inclination.to_radians()
            > latitude.abs()
    }
}

fn check_line(line: &str, number: u8) -> Result<(), ParseTleError> {
    if !line.is_ascii() {
        return Err(ParseTleError::NotAscii { line: number });
    }
    if line.len() < MIN_LINE_LENGTH {
        return Err(ParseTleError::LineTooShort {
            line: number,
            len: line.len(),
        });
    }
    let found = line.chars().next().unwrap_or(' ');
    if found != char::from(b'0' + number) {
        return Err(ParseTleError::WrongLineNumber {
            line: number,
            found,
        });
    }
    Ok(())
}

fn decode_lines(line1: &str, line2: &str) -> Result<OrbitalElements, ParseTleError> {
    check_line(line1, 1)?;
    check_line(line2, 2)?;

    let angle = |field: &TleField| field.parse_f64(line2);

    Ok(OrbitalElements {
        satellite_number: SATELLITE_NUMBER.parse_i32(line1)?,
        designator: INTERNATIONAL_DESIGNATOR.parse_text(line1),
        epoch_year: EPOCH_YEAR.parse_i32(line1)?,
        epoch_day: EPOCH_DAY.parse_f64(line1)?,
        mean_motion_dot: MEAN_MOTION_DOT.parse_f64(line1)?,
        mean_motion_ddot: parse_packed_exponential(
            &MEAN_MOTION_DDOT_MANTISSA,
            &MEAN_MOTION_DDOT_EXPONENT,
            line1,
        )?,
        bstar: parse_packed_exponential(&BSTAR_MANTISSA, &BSTAR_EXPONENT, line1)?,
        element_number: ELEMENT_NUMBER.parse_i64(line1)?,
        inclination: angle(&INCLINATION)?,
        right_ascension: angle(&RIGHT_ASCENSION)?,
        eccentricity: ECCENTRICITY.parse_implied_decimal(line2)?,
        argument_of_perigee: angle(&ARGUMENT_OF_PERIGEE)?,
        mean_anomaly: angle(&MEAN_ANOMALY)?,
        mean_motion: MEAN_MOTION.parse_f64(line2)?,
        revolution_number: REVOLUTION_NUMBER.parse_i32(line2)?,
    })
}

/// Parse and validate a two-line element set.
///
/// Arguments
/// -----------------
/// * `line1`, `line2`: the two element lines, at least 68 ASCII characters each (the checksum
///   column is optional). A trailing line terminator is ignored.
///
/// Return
/// ----------
/// * The decoded [`OrbitalElements`], or
///   - [`PredictError::TleParsing`] if a line or a field is malformed,
///   - [`PredictError::InvalidElements`] if the values are not physical.
pub fn parse_tle(line1: &str, line2: &str) -> Result<OrbitalElements, PredictError> {
    let line1 = line1.trim_end_matches(['\r', '\n']);
    let line2 = line2.trim_end_matches(['\r', '\n']);

    let parsed = decode_lines(line1, line2)
        .map_err(PredictError::from)
        .and_then(|elements| {
            elements.validate()?;
            Ok(elements)
        });

    match &parsed {
        Ok(elements) => debug!(
            satellite = elements.satellite_number,
            model = ?elements.model(),
            period_minutes = elements.period_minutes(),
            "TLE parsed"
        ),
        Err(err) => warn!(%err, "TLE rejected"),
    }
    parsed
}

#[cfg(test)]
mod tle_test {
    use approx::assert_relative_eq;

    use super::*;

    const LINE1: &str =
        "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991";
    const LINE2: &str =
        "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444";

    #[test]
    fn test_parse_default_tle() {
        let elements = parse_tle(LINE1, LINE2).unwrap();

        assert_eq!(elements.satellite_number, 44885);
        assert_eq!(elements.designator, "19093G");
        assert_eq!(elements.epoch_year, 24);
        assert_relative_eq!(elements.epoch_day, 55.4745069);
        assert_relative_eq!(elements.inclination, 97.8473);
        assert_relative_eq!(elements.right_ascension, 139.0522);
        assert_relative_eq!(elements.eccentricity, 0.0012434);
        assert_relative_eq!(elements.argument_of_perigee, 335.2519);
        assert_relative_eq!(elements.mean_anomaly, 24.81);
        assert_relative_eq!(elements.mean_motion, 14.88559378);
        assert_relative_eq!(elements.mean_motion_dot, 0.00005228);
        assert_eq!(elements.mean_motion_ddot, 0.0);
        assert_relative_eq!(elements.bstar, 0.56684e-3, max_relative = 1e-12);
        assert_eq!(elements.element_number, 999);
        assert_eq!(elements.revolution_number, 22644);

        assert_eq!(elements.model(), EphemerisModel::NearEarth);
        assert_relative_eq!(elements.period_minutes(), 96.7, epsilon = 0.1);
        assert_eq!(elements.full_epoch_year(), 2024);
        assert_relative_eq!(elements.epoch_julian(), 2460364.9745069, epsilon = 1e-8);
    }

    #[test]
    fn test_line_terminators() {
        let l1 = format!("{LINE1}\r\n");
        let l2 = format!("{LINE2}\n");
        assert_eq!(parse_tle(&l1, &l2), parse_tle(LINE1, LINE2));
    }

    #[test]
    fn test_reject_short_line() {
        let err = parse_tle(&LINE1[..40], LINE2).unwrap_err();
        assert_eq!(
            err,
            PredictError::TleParsing(ParseTleError::LineTooShort { line: 1, len: 40 })
        );
    }

    #[test]
    fn test_reject_swapped_lines() {
        let err = parse_tle(LINE2, LINE1).unwrap_err();
        assert_eq!(
            err,
            PredictError::TleParsing(ParseTleError::WrongLineNumber {
                line: 1,
                found: '2'
            })
        );
    }

    #[test]
    fn test_reject_non_ascii() {
        let line2 = LINE2.replacen("97.8473", "97.84é3", 1);
        assert_eq!(
            parse_tle(LINE1, &line2).unwrap_err(),
            PredictError::TleParsing(ParseTleError::NotAscii { line: 2 })
        );
    }

    #[test]
    fn test_reject_non_physical() {
        // mean motion 0
        let line2 = "2 44885  97.8473 139.0522 0012434 335.2519  24.8100  0.00000000226444";
        assert!(matches!(
            parse_tle(LINE1, line2),
            Err(PredictError::InvalidElements(_))
        ));

        // inclination above 180°
        let line2 = "2 44885 197.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444";
        assert!(matches!(
            parse_tle(LINE1, line2),
            Err(PredictError::InvalidElements(_))
        ));

        // epoch day 0
        let line1 = "1 44885U 19093G   24000.00000000  .00005228  00000-0  56684-3 0  9991";
        assert!(matches!(
            parse_tle(line1, LINE2),
            Err(PredictError::InvalidElements(_))
        ));
    }

    #[test]
    fn test_model_classification() {
        let mut elements = parse_tle(LINE1, LINE2).unwrap();
        for n in [0.5, 1.0027, 2.0, 6.0, 6.3, 6.5, 10.0, 16.0] {
            elements.mean_motion = n;
            let near_earth = elements.period_minutes() < 225.0;
            assert_eq!(
                near_earth,
                elements.model() == EphemerisModel::NearEarth,
                "n = {n}"
            );
        }
        elements.mean_motion = 1.0027;
        assert_eq!(elements.model(), EphemerisModel::DeepSpace);
    }

    #[test]
    fn test_derived_quantities() {
        let elements = parse_tle(LINE1, LINE2).unwrap();

        let perigee = elements.perigee_km();
        let apogee = elements.apogee_km();
        assert!(perigee > 550.0 && perigee < 620.0, "perigee = {perigee}");
        assert!(apogee > 580.0 && apogee < 640.0, "apogee = {apogee}");
        assert!(apogee > perigee);

        assert!(!elements.is_geosynchronous());
        // a sun-synchronous orbit is seen from everywhere
        assert!(elements.aos_happens(89.0_f64.to_radians()));

        let mut geo = elements.clone();
        geo.mean_motion = 1.0027;
        geo.inclination = 0.05;
        geo.eccentricity = 0.0002;
        assert!(geo.is_geosynchronous());
        assert!(geo.aos_happens(45.0_f64.to_radians()));
        assert!(!geo.aos_happens(85.0_f64.to_radians()));
    }
}

//! # Low-precision solar position
//!
//! Geocentric position of the Sun in the true equatorial frame, from the classical series in
//! the Astronomical Almanac (accuracy of about 0.01°, more than enough for eclipse tests and
//! twilight checks of a ground station).
use nalgebra::Vector3;

use crate::constants::{JulianDate, ASTRONOMICAL_UNIT_KM, DPI, JD1900, SECONDS_PER_DAY};

/// Difference between Ephemeris Time and Universal Time, in seconds, for a decimal year.
///
/// Polynomial fit valid for the second half of the twentieth century and used as a rough
/// extrapolation afterwards.
pub fn delta_et(year: f64) -> f64 {
    26.465 + 0.747622 * (year - 1950.0) + 1.886913 * (DPI * (year - 1975.0) / 33.0).sin()
}

/// Solar position vector (ECI, kilometres) at a Julian date (UTC).
///
/// Arguments
/// -----------------
/// * `jd`: Julian date, UTC.
///
/// Return
/// ----------
/// * The Earth → Sun vector in kilometres.
pub fn sun_position(jd: JulianDate) -> Vector3<f64> {
    let mjd = jd - JD1900;
    let year = 1900.0 + mjd / 365.25;
    let t = (mjd + delta_et(year) / SECONDS_PER_DAY) / 36525.0;

    let m = ((358.47583 + (35999.04975 * t) % 360.0 - (0.000150 + 0.0000033 * t) * t * t) % 360.0)
        .to_radians();
    let l = ((279.69668 + (36000.76892 * t) % 360.0 + 0.0003025 * t * t) % 360.0).to_radians();
    let e = 0.01675104 - (0.0000418 + 0.000000126 * t) * t;
    let c = ((1.919460 - (0.004789 + 0.000014 * t) * t) * m.sin()
        + (0.020094 - 0.0001 * t) * (2.0 * m).sin()
        + 0.000293 * (3.0 * m).sin())
    .to_radians();
    let o = ((259.18 - 1934.142 * t) % 360.0).to_radians();

    // true longitude, corrected for nutation and aberration
    let lsa = (l + c - (0.00569 - 0.00479 * o.sin()).to_radians()) % DPI;
    let nu = (m + c) % DPI;
    let r = 1.0000002 * (1.0 - e * e) / (1.0 + e * nu.cos()) * ASTRONOMICAL_UNIT_KM;
    let eps = (23.452294 - (0.0130125 + (0.00000164 - 0.000000503 * t) * t) * t
        + 0.00256 * o.cos())
    .to_radians();

    Vector3::new(
        r * lsa.cos(),
        r * lsa.sin() * eps.cos(),
        r * lsa.sin() * eps.sin(),
    )
}

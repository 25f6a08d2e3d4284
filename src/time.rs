//! # Julian dates and sidereal time
//!
//! All absolute times handled by the crate are **Julian dates in UTC** stored as `f64`
//! ([`JulianDate`]). This module converts to and from that representation:
//!
//! - NORAD epochs (two-digit year + fractional day of year) via [`julian_date_of_epoch`],
//! - Gregorian calendar dates and [`hifitime::Epoch`] values,
//! - Unix timestamps (seconds or milliseconds), the on-board clock format,
//! - the predict *day number* (days since 1979-12-31 00:00 UTC) used by the decay heuristic.
//!
//! It also provides the Greenwich mean sidereal angle [`theta_g_jd`] used by every
//! Earth-fixed ↔ inertial conversion.
use hifitime::Epoch;

use crate::constants::{
    JulianDate, Radian, DPI, EARTH_ROTATIONS_PER_SIDERIAL_DAY, JD2000, SECONDS_PER_DAY,
    UNIX_EPOCH_IN_JULIAN,
};

/// Expand a two-digit TLE epoch year with the NORAD pivot rule.
///
/// Years `00..=56` map to 2000–2056 and `57..=99` to 1957–1999.
pub fn full_epoch_year(two_digit_year: i32) -> i32 {
    if two_digit_year < 57 {
        2000 + two_digit_year
    } else {
        1900 + two_digit_year
    }
}

/// Julian date of day 0.0 of `year` (i.e. 0h UTC on the 31st of December of the previous year).
///
/// Astronomical Formulae for Calculators, Jean Meeus, pages 23-25.
pub fn julian_date_of_year(year: i32) -> JulianDate {
    let y = (year - 1) as f64;
    let a = (y / 100.0).trunc();
    let b = 2.0 - a + (a / 4.0).trunc();
    (365.25 * y).trunc() + (30.6001 * 14.0_f64).trunc() + 1_720_994.5 + b
}

/// Julian date of a NORAD epoch.
///
/// Arguments
/// ---------
/// * `two_digit_year`: epoch year as printed in the TLE (columns 18-19)
/// * `day_of_year`: fractional day of year, 1.0 being January 1st 0h UTC
///
/// Return
/// ------
/// * the Julian date (UTC) of the epoch. Valid for 1957 through 2056.
pub fn julian_date_of_epoch(two_digit_year: i32, day_of_year: f64) -> JulianDate {
    julian_date_of_year(full_epoch_year(two_digit_year)) + day_of_year
}

/// Greenwich mean sidereal angle at a Julian date (UT1 ≈ UTC), in radians within `[0, 2π)`.
///
/// Reference: The 1992 Astronomical Almanac, page B6.
pub fn theta_g_jd(jd: JulianDate) -> Radian {
    let ut = (jd + 0.5).fract();
    let tu = ((jd - ut) - JD2000) / 36525.0;
    let gmst = 24110.54841 + tu * (8640184.812866 + tu * (0.093104 - tu * 6.2e-6));
    let gmst =
        (gmst + SECONDS_PER_DAY * EARTH_ROTATIONS_PER_SIDERIAL_DAY * ut).rem_euclid(SECONDS_PER_DAY);

    DPI * gmst / SECONDS_PER_DAY
}

/// Day number from a month/day/two-digit-year triple, counted from 1979-12-31.
///
/// `day` may be 0, which designates the last day of the previous month: `day_number(1, 0, y)`
/// is day 0.0 of year `y`, the reference of the TLE day-of-year.
pub fn day_number(month: i32, day: i32, two_digit_year: i32) -> i64 {
    // pivot first, so that January 1957 shifts to month 13 of 1956 and not of 2056
    let mut year = if two_digit_year < 57 {
        two_digit_year + 100
    } else {
        two_digit_year
    };
    let mut month = month;
    if month < 3 {
        year -= 1;
        month += 12;
    }

    let yy = year as f64;
    let mm = month as f64;
    let dn = (365.25 * (yy - 80.0)).floor() - (19.0 + yy / 100.0).floor()
        + (4.75 + yy / 400.0).floor()
        - 16.0;

    dn as i64 + day as i64 + 30 * month as i64 + (0.6 * mm - 0.3).floor() as i64
}

/// Julian date of a Unix timestamp in seconds.
pub fn julian_from_timestamp(timestamp: u64) -> JulianDate {
    timestamp as f64 / SECONDS_PER_DAY + UNIX_EPOCH_IN_JULIAN
}

/// Julian date of a Unix timestamp in milliseconds.
pub fn julian_from_timestamp_ms(timestamp_ms: u64) -> JulianDate {
    timestamp_ms as f64 / (1000.0 * SECONDS_PER_DAY) + UNIX_EPOCH_IN_JULIAN
}

/// Unix timestamp in seconds of a Julian date, `0` for dates before 1970.
pub fn timestamp_from_julian(jd: JulianDate) -> u64 {
    if jd > UNIX_EPOCH_IN_JULIAN {
        ((jd - UNIX_EPOCH_IN_JULIAN) * SECONDS_PER_DAY) as u64
    } else {
        0
    }
}

/// Unix timestamp in milliseconds of a Julian date, `0` for dates before 1970.
pub fn timestamp_ms_from_julian(jd: JulianDate) -> u64 {
    if jd > UNIX_EPOCH_IN_JULIAN {
        ((jd - UNIX_EPOCH_IN_JULIAN) * 1000.0 * SECONDS_PER_DAY) as u64
    } else {
        0
    }
}

/// Julian date (UTC) of a hifitime [`Epoch`].
pub fn julian_from_epoch(epoch: &Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// hifitime [`Epoch`] of a Julian date (UTC).
pub fn epoch_from_julian(jd: JulianDate) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// Julian date of a Gregorian UTC calendar date.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: calendar date
/// * `hour`, `minute`, `second`: time of day, UTC
///
/// Return
/// ------
/// * the Julian date (UTC)
pub fn julian_from_calendar(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> JulianDate {
    Epoch::from_gregorian_utc(year, month, day, hour, minute, second, 0).to_jde_utc_days()
}

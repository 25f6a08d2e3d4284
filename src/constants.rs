//! # Constants and type definitions for obdh_predict
//!
//! This module centralizes the **physical constants**, **model constants**, and **unit type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - SGP4 gravity-model constants (WGS-72 zonal harmonics, normalized to Earth radii and minutes)
//! - Earth shape and rotation (WGS-84 radius and flattening)
//! - Sun and time-scale constants
//! - Unit type aliases used across the crate
//!
//! SGP4 works in *normalized* units: distances in Earth radii (`AE = 1`) and time in minutes.
//! Conversion to kilometres happens only at the [`crate::orbit`] boundary.

// -------------------------------------------------------------------------------------------------
// Angles and time
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// 2/3, used by the Kepler third-law recoveries
pub const TWO_THIRD: f64 = 2.0 / 3.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of the Unix epoch (1970-01-01 00:00:00 UTC)
pub const UNIX_EPOCH_IN_JULIAN: f64 = 2_440_587.5;

/// Julian date of 1979-12-31 00:00:00 UTC, origin of the predict day number
pub const JULIAN_TIME_DIFF: f64 = 2_444_238.5;

/// Julian date of the J2000.0 epoch (2000-01-01 12:00:00)
pub const JD2000: f64 = 2_451_545.0;

/// Julian date of 1900-01-00 12:00:00, origin of the solar theory time argument
pub const JD1900: f64 = 2_415_020.0;

/// Sidereal rotations of the Earth per solar day
pub const EARTH_ROTATIONS_PER_SIDERIAL_DAY: f64 = 1.00273790934;

/// Nominal orbital period that splits near-Earth from deep-space element sets, in days (225 min)
pub const DEEP_SPACE_PERIOD_THRESHOLD: f64 = 0.15625;

// -------------------------------------------------------------------------------------------------
// SGP4 model constants (WGS-72)
// -------------------------------------------------------------------------------------------------

/// sqrt(GM) in Earth radii^1.5 per minute
pub const XKE: f64 = 7.43669161e-2;

/// J2/2 in normalized units
pub const CK2: f64 = 5.413079e-4;

/// -3·J4/8 in normalized units
pub const CK4: f64 = 6.209887e-7;

/// Third zonal harmonic (WGS-72)
pub const J3_HARMONIC_WGS72: f64 = -2.53881e-6;

/// (q0 - s)^4 atmospheric density parameter, Earth radii^4
pub const QOMS2T: f64 = 1.880279e-9;

/// Atmospheric density parameter s, Earth radii
pub const S_DENSITY_PARAM: f64 = 1.012229;

/// Distance unit of the model: one Earth radius
pub const AE: f64 = 1.0;

/// Kepler solver default convergence threshold, radians
pub const E6A: f64 = 1.0e-6;

// -------------------------------------------------------------------------------------------------
// Earth and Sun
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in kilometers (WGS-84)
pub const EARTH_RADIUS_KM_WGS84: f64 = 6378.137;

/// Earth flattening factor (WGS-84)
pub const FLATTENING_FACTOR: f64 = 3.35281066474748e-3;

/// Earth angular velocity, rad/s
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292115e-5;

/// Solar radius in kilometers
pub const SOLAR_RADIUS_KM: f64 = 6.96000e5;

/// Astronomical unit in kilometers
pub const ASTRONOMICAL_UNIT_KM: f64 = 1.49597870691e8;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Sun elevation below which the sky is dark enough to see a sunlit satellite, degrees
pub const NAUTICAL_TWILIGHT_SUN_ELEVATION: f64 = -12.0;

// -------------------------------------------------------------------------------------------------
// Geosynchronous classification thresholds
// -------------------------------------------------------------------------------------------------

/// Lower mean motion bound for a geosynchronous orbit, rev/day
pub const GEOSYNCHRONOUS_LOWER_MEAN_MOTION: f64 = 0.9;

/// Upper mean motion bound for a geosynchronous orbit, rev/day
pub const GEOSYNCHRONOUS_UPPER_MEAN_MOTION: f64 = 1.1;

/// Eccentricity bound for a geosynchronous orbit
pub const GEOSYNCHRONOUS_ECCENTRICITY_THRESHOLD: f64 = 0.2;

/// Inclination bound for a geosynchronous orbit, degrees
pub const GEOSYNCHRONOUS_INCLINATION_THRESHOLD_DEGREES: f64 = 70.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian date (days, UTC)
pub type JulianDate = f64;
/// Elapsed time since the element-set epoch, in minutes
pub type Minutes = f64;

//! # Orbit facade
//!
//! [`Satellite`] pairs one element set with its initialised [`Ephemeris`] and turns an absolute
//! time into a complete [`OrbitState`]:
//!
//! - inertial position and velocity in km and km/s,
//! - geodetic sub-satellite point and altitude,
//! - eclipse state against the simultaneous solar position,
//! - ground footprint diameter,
//! - approximate revolution count and a heuristic decay flag.
//!
//! ## Updates
//!
//! The elements and the model coefficients live together behind an `Arc` and are never
//! mutated. A TLE update builds a new [`Satellite`]; clones of the old one stay valid for the
//! propagations still in flight, and a model can never be evaluated against elements it was not
//! derived from.
//!
//! ## Example
//!
//! ```rust
//! use obdh_predict::orbit::Satellite;
//!
//! let satellite = Satellite::from_tle(
//!     "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991",
//!     "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444",
//! )?;
//!
//! let state = satellite.predict(satellite.epoch_julian() + 0.5);
//! assert!(state.altitude > 500.0 && state.altitude < 700.0);
//! assert!(!state.decayed);
//! # Ok::<(), obdh_predict::predict_errors::PredictError>(())
//! ```
use std::sync::Arc;

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::Serialize;

use crate::config::PredictConfig;
use crate::constants::{
    JulianDate, Kilometer, Radian, DPI, EARTH_RADIUS_KM_WGS84, JULIAN_TIME_DIFF, MINUTES_PER_DAY,
    SECONDS_PER_DAY,
};
use crate::conversion::acos_clamped;
use crate::eclipse::is_eclipsed;
use crate::ephemeris::{DeepSpaceModel, Ephemeris, EphemerisModel};
use crate::observers::geodetic::eci_to_geodetic;
use crate::predict_errors::PredictError;
use crate::sun::sun_position;
use crate::time::{day_number, julian_from_epoch, julian_from_timestamp_ms};
use crate::tle::{parse_tle, OrbitalElements};

/// Mean motion derivative below which the decay heuristic is not evaluated, rev/day².
const NEGLIGIBLE_MEAN_MOTION_DOT: f64 = 1.0e-12;

/// Mean motion at which an orbit is considered decayed, rev/day.
const DECAY_MEAN_MOTION: f64 = 16.666666;

/// Complete state of a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitState {
    /// Julian date, UTC.
    pub time: JulianDate,
    /// ECI position, km.
    pub position: Vector3<f64>,
    /// ECI velocity, km/s.
    pub velocity: Vector3<f64>,
    pub phase: Radian,
    pub inclination: Radian,
    pub right_ascension: Radian,
    pub argument_of_perigee: Radian,
    /// Geodetic latitude of the sub-satellite point.
    pub latitude: Radian,
    /// Longitude of the sub-satellite point, `(-π, π]`.
    pub longitude: Radian,
    pub altitude: Kilometer,
    pub geodetic_converged: bool,
    pub kepler_converged: bool,
    pub eclipsed: bool,
    pub eclipse_depth: Radian,
    /// Diameter of the area from which the satellite is above the horizon, km.
    pub footprint: Kilometer,
    /// Revolutions since launch, from a mean motion / drag approximation.
    pub revolutions: i64,
    pub decayed: bool,
}

#[derive(Debug)]
struct Propagation {
    elements: OrbitalElements,
    ephemeris: Ephemeris,
}

/// One element set ready for propagation.
#[derive(Debug, Clone)]
pub struct Satellite {
    propagation: Arc<Propagation>,
    config: PredictConfig,
}

impl Satellite {
    /// Parse a near-Earth TLE and initialise SGP4.
    ///
    /// Return
    /// ----------
    /// * The [`Satellite`], or the parsing / validation error.
    ///   A deep-space element set fails with [`PredictError::DeepSpaceModelUnavailable`].
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, PredictError> {
        Self::from_elements(parse_tle(line1, line2)?, None)
    }

    /// Parse a TLE, using `deep_space` if the elements classify as deep-space.
    pub fn from_tle_with_deep_space(
        line1: &str,
        line2: &str,
        deep_space: &dyn DeepSpaceModel,
    ) -> Result<Self, PredictError> {
        Self::from_elements(parse_tle(line1, line2)?, Some(deep_space))
    }

    /// Initialise the model matching `elements`.
    ///
    /// Arguments
    /// -----------------
    /// * `elements`: mean elements, validated here.
    /// * `deep_space`: provider of the deep-space model, needed for periods of 225 min or more.
    ///
    /// Return
    /// ----------
    /// * The [`Satellite`] with the default [`PredictConfig`], or the error of
    ///   [`Ephemeris::init`].
    pub fn from_elements(
        elements: OrbitalElements,
        deep_space: Option<&dyn DeepSpaceModel>,
    ) -> Result<Self, PredictError> {
        let ephemeris = Ephemeris::init(&elements, deep_space)?;
        Ok(Satellite {
            propagation: Arc::new(Propagation {
                elements,
                ephemeris,
            }),
            config: PredictConfig::default(),
        })
    }

    /// Replace the solver settings, after validation.
    pub fn with_config(mut self, config: PredictConfig) -> Result<Self, PredictError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.propagation.elements
    }

    pub fn ephemeris(&self) -> &Ephemeris {
        &self.propagation.ephemeris
    }

    pub fn config(&self) -> &PredictConfig {
        &self.config
    }

    pub fn model(&self) -> EphemerisModel {
        self.propagation.ephemeris.model()
    }

    /// Epoch of the element set, Julian date (UTC).
    pub fn epoch_julian(&self) -> JulianDate {
        self.propagation.elements.epoch_julian()
    }

    /// State of the satellite at a Julian date (UTC).
    ///
    /// Arguments
    /// -----------------
    /// * `jd`: Julian date, UTC. Dates before the epoch propagate backwards.
    ///
    /// Return
    /// ----------
    /// * The [`OrbitState`]. Solver caps reached on the way are reported by
    ///   `kepler_converged` / `geodetic_converged`, never as an error.
    pub fn predict(&self, jd: JulianDate) -> OrbitState {
        let elements = &self.propagation.elements;
        let age = jd - elements.epoch_julian();
        let out = self
            .propagation
            .ephemeris
            .propagate(age * MINUTES_PER_DAY, &self.config);

        let position = out.position * EARTH_RADIUS_KM_WGS84;
        let velocity = out.velocity * EARTH_RADIUS_KM_WGS84 * MINUTES_PER_DAY / SECONDS_PER_DAY;

        let geodetic = eci_to_geodetic(jd, &position, &self.config);
        let eclipse = is_eclipsed(&position, &sun_position(jd));

        OrbitState {
            time: jd,
            position,
            velocity,
            phase: out.phase,
            inclination: out.inclination,
            right_ascension: out.right_ascension,
            argument_of_perigee: out.argument_of_perigee,
            latitude: geodetic.latitude,
            longitude: geodetic.longitude,
            altitude: geodetic.altitude,
            geodetic_converged: geodetic.converged,
            kepler_converged: out.kepler_converged,
            eclipsed: eclipse.eclipsed,
            eclipse_depth: eclipse.depth,
            footprint: footprint(geodetic.altitude),
            revolutions: revolutions(elements, age),
            decayed: has_decayed(elements, jd),
        }
    }

    /// State of the satellite at a hifitime [`Epoch`].
    pub fn predict_at(&self, epoch: &Epoch) -> OrbitState {
        self.predict(julian_from_epoch(epoch))
    }

    /// State of the satellite at a Unix timestamp in milliseconds, the on-board clock format.
    pub fn predict_timestamp_ms(&self, timestamp_ms: u64) -> OrbitState {
        self.predict(julian_from_timestamp_ms(timestamp_ms))
    }
}

/// Diameter of the ground footprint of a satellite at `altitude`.
pub fn footprint(altitude: Kilometer) -> Kilometer {
    2.0 * EARTH_RADIUS_KM_WGS84
        * acos_clamped(EARTH_RADIUS_KM_WGS84 / (EARTH_RADIUS_KM_WGS84 + altitude))
}

/// Revolution count `age` days after the epoch: linear mean motion drift driven by BSTAR,
/// plus the fraction of orbit already covered at epoch.
pub fn revolutions(elements: &OrbitalElements, age: f64) -> i64 {
    let xmo = elements.mean_anomaly.to_radians();
    let orbits = (elements.mean_motion + age * elements.bstar) * age + xmo / DPI;
    orbits.floor() as i64 + elements.revolution_number as i64
}

/// Whether the mean motion, extrapolated linearly with its first derivative, has reached the
/// re-entry value by `jd`.
pub fn has_decayed(elements: &OrbitalElements, jd: JulianDate) -> bool {
    let ndot = elements.mean_motion_dot.abs();
    if ndot <= NEGLIGIBLE_MEAN_MOTION_DOT {
        return false;
    }

    let epoch_day_number = day_number(1, 0, elements.epoch_year) as f64 + elements.epoch_day;
    let decay_day_number = epoch_day_number + (DECAY_MEAN_MOTION - elements.mean_motion) / (10.0 * ndot);
    decay_day_number < jd - JULIAN_TIME_DIFF
}

//! # Inertial ↔ geodetic conversions
//!
//! Conversions between ECI positions (kilometres) and geodetic coordinates on the WGS-84
//! ellipsoid, after The 1992 Astronomical Almanac, pages K11-K12.
//!
//! - [`eci_to_geodetic`] iterates on the geodetic latitude. The loop is bounded by
//!   [`PredictConfig::geodetic_max_iterations`] and reports whether
//!   [`PredictConfig::geodetic_tolerance`] was reached.
//! - [`geodetic_to_eci`] is the closed-form inverse, for a point fixed on the rotating Earth.
use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::Serialize;
use tracing::debug;

use crate::config::PredictConfig;
use crate::constants::{
    JulianDate, Kilometer, Radian, EARTH_ANGULAR_VELOCITY, EARTH_RADIUS_KM_WGS84,
    FLATTENING_FACTOR,
};
use crate::conversion::{fix_angle, fmod2p};
use crate::time::theta_g_jd;

/// Geodetic coordinates of a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geodetic {
    /// Geodetic latitude, radians, north positive.
    pub latitude: Radian,
    /// Longitude, radians in `(-π, π]`, east positive.
    pub longitude: Radian,
    /// Height above the ellipsoid, km.
    pub altitude: Kilometer,
    /// Right ascension of the point: ECI azimuth of a converted position, or local sidereal
    /// angle of a ground site.
    pub theta: Radian,
    /// `false` if the latitude iteration stopped on its cap.
    pub converged: bool,
}

impl Geodetic {
    pub fn new(latitude: Radian, longitude: Radian, altitude: Kilometer) -> Self {
        Geodetic {
            latitude,
            longitude,
            altitude,
            theta: 0.0,
            converged: true,
        }
    }
}

/// Square of the first eccentricity of the ellipsoid.
fn eccentricity_squared() -> f64 {
    FLATTENING_FACTOR * (2.0 - FLATTENING_FACTOR)
}

/// Local mean sidereal angle of a longitude, in `[0, 2π)`.
pub fn local_sidereal_angle(jd: JulianDate, longitude: Radian) -> Radian {
    fmod2p(theta_g_jd(jd) + longitude)
}

/// Geodetic coordinates of an ECI position.
///
/// Arguments
/// -----------------
/// * `jd`: Julian date (UTC) of the position.
/// * `position`: ECI position, km.
/// * `config`: cap and tolerance of the latitude iteration.
///
/// Return
/// ----------
/// * The [`Geodetic`] coordinates; `theta` holds the ECI right ascension of the position.
pub fn eci_to_geodetic(
    jd: JulianDate,
    position: &Vector3<f64>,
    config: &PredictConfig,
) -> Geodetic {
    let theta = position.y.atan2(position.x);
    let longitude = fix_angle(fmod2p(theta - theta_g_jd(jd)), PI);
    let r = position.x.hypot(position.y);
    let e2 = eccentricity_squared();

    let mut latitude = position.z.atan2(r);
    let mut c = 1.0;
    let mut converged = false;
    for _ in 0..config.geodetic_max_iterations.max(1) {
        let phi = latitude;
        let sin_phi = phi.sin();
        c = 1.0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        latitude = (position.z + EARTH_RADIUS_KM_WGS84 * c * e2 * sin_phi).atan2(r);
        if (latitude - phi).abs() < config.geodetic_tolerance {
            converged = true;
            break;
        }
    }
    if !converged {
        debug!(jd, latitude, "geodetic latitude iteration reached its cap");
    }

    // the polar form avoids dividing by cos(latitude) near the poles
    let altitude = if latitude.abs() < PI / 4.0 {
        r / latitude.cos() - EARTH_RADIUS_KM_WGS84 * c
    } else {
        position.z / latitude.sin() - EARTH_RADIUS_KM_WGS84 * c * (1.0 - e2)
    };

    Geodetic {
        latitude,
        longitude,
        altitude,
        theta,
        converged,
    }
}

/// ECI position and velocity of a point fixed on the rotating Earth.
///
/// Arguments
/// -----------------
/// * `jd`: Julian date (UTC).
/// * `site`: geodetic coordinates; `theta` is ignored and recomputed from `jd`.
///
/// Return
/// ----------
/// * `(position, velocity)` in km and km/s. The velocity is `ω⊕ × r`.
pub fn geodetic_to_eci(jd: JulianDate, site: &Geodetic) -> (Vector3<f64>, Vector3<f64>) {
    let theta = local_sidereal_angle(jd, site.longitude);
    let sin_lat = site.latitude.sin();
    let c = 1.0 / (1.0 + FLATTENING_FACTOR * (FLATTENING_FACTOR - 2.0) * sin_lat * sin_lat).sqrt();
    let sq = (1.0 - FLATTENING_FACTOR).powi(2) * c;
    let achcp = (EARTH_RADIUS_KM_WGS84 * c + site.altitude) * site.latitude.cos();

    let position = Vector3::new(
        achcp * theta.cos(),
        achcp * theta.sin(),
        (EARTH_RADIUS_KM_WGS84 * sq + site.altitude) * sin_lat,
    );
    let velocity = Vector3::new(
        -EARTH_ANGULAR_VELOCITY * position.y,
        EARTH_ANGULAR_VELOCITY * position.x,
        0.0,
    );

    (position, velocity)
}

use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{Radian, EARTH_RADIUS_KM_WGS84, SOLAR_RADIUS_KM};
use crate::conversion::{acos_clamped, asin_clamped};

/// Shadow state of a satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipseState {
    /// Inside the Earth's umbra or penumbra.
    pub eclipsed: bool,
    /// Earth semi-diameter minus Sun semi-diameter minus their separation, as seen from the
    /// satellite. Non-negative when eclipsed.
    pub depth: Radian,
}

/// Eclipse test from the apparent discs of the Earth and the Sun.
///
/// Arguments
/// -----------------
/// * `position`: satellite ECI position, km.
/// * `sun`: solar ECI position, km (see [`crate::sun::sun_position`]).
///
/// Return
/// ----------
/// * The [`EclipseState`]. A satellite from which the Sun looks larger than the Earth is never
///   eclipsed, whatever the depth.
pub fn is_eclipsed(position: &Vector3<f64>, sun: &Vector3<f64>) -> EclipseState {
    let sd_earth = asin_clamped(EARTH_RADIUS_KM_WGS84 / position.norm());
    let rho = sun - position;
    let sd_sun = asin_clamped(SOLAR_RADIUS_KM / rho.norm());
    let earth = -position;

    let delta = acos_clamped(sun.dot(&earth) / sun.norm() / earth.norm());
    let depth = sd_earth - sd_sun - delta;

    EclipseState {
        eclipsed: sd_earth >= sd_sun && depth >= 0.0,
        depth,
    }
}

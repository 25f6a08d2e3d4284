//! # Ground observer geometry
//!
//! This module gathers everything a ground station, or an on-board antenna pointing task, needs
//! to look at a propagated satellite:
//!
//! - An [`Observer`](crate::observers::Observer) type storing the **geodetic** site
//!   coordinates, guaranteed free of NaN.
//! - **Topocentric look angles** (azimuth, elevation, range, range rate) of a satellite
//!   ([`Observer::observe`](crate::observers::Observer::observe)) or of the Sun
//!   ([`Observer::observe_sun`](crate::observers::Observer::observe_sun)).
//! - **Topocentric equatorial coordinates** (right ascension, declination)
//!   ([`Observer::observe_equatorial`](crate::observers::Observer::observe_equatorial)).
//! - The **squint angle** of an antenna fixed in the orbital frame
//!   ([`Observer::squint_angle`](crate::observers::Observer::squint_angle)).
//! - The **Doppler shift** of a downlink ([`Observation::doppler_shift`]).
//!
//! ## Frames & conventions
//!
//! - Satellite states are ECI (true equator, mean equinox of the SGP4 TEME frame).
//! - The site is placed in the same frame with the Greenwich mean sidereal angle; its velocity
//!   is due to the Earth rotation only.
//! - Look angles are computed in the topocentric **South-East-Zenith** basis. Azimuth is
//!   measured from north through east.
//!
//! ```text
//! geodetic site --(GMST + longitude)--> ECI site (r, ω⊕ × r)
//! satellite ECI - ECI site --(SEZ rotation)--> azimuth / elevation / range / range rate
//! ```
//!
//! ## Units
//!
//! - Angles: **radians** (constructors take degrees, like site catalogues do).
//! - Distances: **kilometres**, velocities: **km/s**.
//!
//! ## Limitations
//!
//! Atmospheric refraction is not modelled: the elevation is geometric, with no correction or
//! clamping near the horizon or the zenith.
//!
//! ## Quick start
//!
//! ```rust
//! use obdh_predict::observers::Observer;
//! use obdh_predict::orbit::Satellite;
//!
//! let satellite = Satellite::from_tle(
//!     "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991",
//!     "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444",
//! )?;
//! let toulouse = Observer::new(1.4437, 43.6045, 0.146, Some("Toulouse".into()))?;
//!
//! let state = satellite.predict(2460365.0);
//! let obs = toulouse.observe(&state);
//! println!("az {:.1}° el {:.1}°", obs.azimuth.to_degrees(), obs.elevation.to_degrees());
//! # Ok::<(), obdh_predict::predict_errors::PredictError>(())
//! ```
pub mod geodetic;

use nalgebra::Vector3;
use ordered_float::NotNan;
use serde::Serialize;

use crate::constants::{
    Degree, JulianDate, Kilometer, Radian, DPI, NAUTICAL_TWILIGHT_SUN_ELEVATION, SPEED_OF_LIGHT,
};
use crate::conversion::{acos_clamped, asin_clamped, fmod2p};
use crate::orbit::OrbitState;
use crate::predict_errors::PredictError;
use crate::sun::sun_position;

use geodetic::{geodetic_to_eci, local_sidereal_angle, Geodetic};

/// Ground site, fixed on the rotating Earth.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Observer {
    /// Optional human-readable site name.
    pub name: Option<String>,

    /// Geodetic latitude in **radians**.
    pub latitude: NotNan<f64>,

    /// Longitude in **radians**, east positive.
    pub longitude: NotNan<f64>,

    /// Height above the WGS-84 ellipsoid in **kilometres**.
    pub altitude: NotNan<f64>,
}

/// Topocentric look angles of a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Julian date (UTC) of the observation.
    pub time: JulianDate,
    /// Azimuth from north through east, `[0, 2π)`.
    pub azimuth: Radian,
    pub elevation: Radian,
    /// Distance site → target, km.
    pub range: Kilometer,
    /// Site → target vector in ECI, km.
    pub range_vec: Vector3<f64>,
    /// Rate of change of the range, km/s, positive when receding.
    pub range_rate: f64,
    /// Satellite: sunlit, above the horizon and seen from a dark sky. Sun: above the horizon.
    pub visible: bool,
}

/// Topocentric equatorial coordinates of a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialObservation {
    pub time: JulianDate,
    /// Right ascension, `[0, 2π)`.
    pub right_ascension: Radian,
    pub declination: Radian,
}

impl Observation {
    /// Doppler shift of a carrier emitted by the target, in Hz.
    ///
    /// Arguments
    /// -----------------
    /// * `frequency`: emitted frequency, Hz.
    ///
    /// Return
    /// ----------
    /// * The received minus emitted frequency: negative when the target recedes.
    pub fn doppler_shift(&self, frequency: f64) -> f64 {
        -frequency * self.range_rate * 1000.0 / SPEED_OF_LIGHT
    }
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `longitude`: longitude in **degrees** (east positive).
    /// * `latitude`: geodetic latitude in **degrees**.
    /// * `altitude`: height above the ellipsoid in **kilometres**.
    /// * `name`: optional site name.
    ///
    /// Return
    /// ----------
    /// * The [`Observer`], or [`PredictError::InvalidFloatValue`] if a coordinate is NaN.
    pub fn new(
        longitude: Degree,
        latitude: Degree,
        altitude: Kilometer,
        name: Option<String>,
    ) -> Result<Observer, PredictError> {
        Ok(Observer {
            name,
            latitude: NotNan::new(latitude.to_radians())?,
            longitude: NotNan::new(longitude.to_radians())?,
            altitude: NotNan::new(altitude)?,
        })
    }

    /// Site coordinates at `jd`, `theta` being the local mean sidereal angle.
    pub fn geodetic(&self, jd: JulianDate) -> Geodetic {
        let mut site = Geodetic::new(
            self.latitude.into_inner(),
            self.longitude.into_inner(),
            self.altitude.into_inner(),
        );
        site.theta = local_sidereal_angle(jd, site.longitude);
        site
    }

    /// ECI position (km) and velocity (km/s) of the site at `jd`.
    pub fn position_velocity(&self, jd: JulianDate) -> (Vector3<f64>, Vector3<f64>) {
        geodetic_to_eci(jd, &self.geodetic(jd))
    }

    /// Look angles of an ECI target in the SEZ basis of the site.
    fn look_angles(
        &self,
        jd: JulianDate,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Observation {
        let site = self.geodetic(jd);
        let (site_pos, site_vel) = geodetic_to_eci(jd, &site);

        let range_vec = position - site_pos;
        let range_vel = velocity - site_vel;
        let range = range_vec.norm();

        let (sin_lat, cos_lat) = site.latitude.sin_cos();
        let (sin_theta, cos_theta) = site.theta.sin_cos();
        let top_s = sin_lat * cos_theta * range_vec.x + sin_lat * sin_theta * range_vec.y
            - cos_lat * range_vec.z;
        let top_e = -sin_theta * range_vec.x + cos_theta * range_vec.y;
        let top_z = cos_lat * cos_theta * range_vec.x
            + cos_lat * sin_theta * range_vec.y
            + sin_lat * range_vec.z;

        Observation {
            time: jd,
            azimuth: fmod2p(top_e.atan2(-top_s)),
            elevation: asin_clamped(top_z / range),
            range,
            range_vec,
            range_rate: range_vec.dot(&range_vel) / range,
            visible: false,
        }
    }

    /// Look angles of a propagated satellite.
    ///
    /// `visible` is set when the satellite is sunlit, above the horizon, and the Sun is below
    /// the nautical twilight elevation at the site.
    pub fn observe(&self, state: &OrbitState) -> Observation {
        let mut obs = self.look_angles(state.time, &state.position, &state.velocity);
        if !state.eclipsed && obs.elevation > 0.0 {
            let sun = self.observe_sun(state.time);
            obs.visible = sun.elevation < NAUTICAL_TWILIGHT_SUN_ELEVATION.to_radians();
        }
        obs
    }

    /// Look angles of the Sun. The solar velocity is neglected, the range rate only reflects the
    /// rotation of the site.
    pub fn observe_sun(&self, jd: JulianDate) -> Observation {
        let mut obs = self.look_angles(jd, &sun_position(jd), &Vector3::zeros());
        obs.visible = obs.elevation > 0.0;
        obs
    }

    /// Topocentric right ascension and declination of a propagated satellite.
    pub fn observe_equatorial(&self, state: &OrbitState) -> EquatorialObservation {
        let obs = self.look_angles(state.time, &state.position, &state.velocity);
        let site = self.geodetic(state.time);

        let (sin_theta, cos_theta) = site.theta.sin_cos();
        let (sin_phi, cos_phi) = site.latitude.sin_cos();
        let (sin_az, cos_az) = obs.azimuth.sin_cos();
        let (sin_el, cos_el) = obs.elevation.sin_cos();

        // line of sight in SEZ, then rotated to ECI
        let lxh = -cos_az * cos_el;
        let lyh = sin_az * cos_el;
        let lzh = sin_el;
        let south = Vector3::new(sin_phi * cos_theta, sin_phi * sin_theta, -cos_phi);
        let east = Vector3::new(-sin_theta, cos_theta, 0.0);
        let zenith = Vector3::new(cos_theta * cos_phi, sin_theta * cos_phi, sin_phi);
        let line_of_sight = south * lxh + east * lyh + zenith * lzh;

        let declination = asin_clamped(line_of_sight.z);
        let cos_delta = (1.0 - line_of_sight.z * line_of_sight.z).sqrt();
        let right_ascension =
            fmod2p((line_of_sight.y / cos_delta).atan2(line_of_sight.x / cos_delta));

        EquatorialObservation {
            time: state.time,
            right_ascension,
            declination,
        }
    }

    /// Angle between an antenna boresight and the direction of the site.
    ///
    /// Arguments
    /// -----------------
    /// * `state`: propagated satellite state.
    /// * `alon`, `alat`: boresight longitude/latitude in the orbital frame, radians, measured
    ///   from the perigee direction in the orbital plane.
    ///
    /// Return
    /// ----------
    /// * The squint angle in `[0, π]`, 0 when the antenna points straight at the site.
    pub fn squint_angle(&self, state: &OrbitState, alon: Radian, alat: Radian) -> Radian {
        let (sin_alat, cos_alat) = alat.sin_cos();
        let (sin_lon, cos_lon) = (alon + state.argument_of_perigee).sin_cos();
        let (sin_i, cos_i) = state.inclination.sin_cos();
        let (sin_node, cos_node) = state.right_ascension.sin_cos();

        // boresight in the orbital frame, then rotated by inclination and node
        let b = Vector3::new(cos_alat * cos_lon, cos_alat * sin_lon, sin_alat);
        let c = Vector3::new(b.x, b.y * cos_i - b.z * sin_i, b.y * sin_i + b.z * cos_i);
        let boresight = Vector3::new(
            c.x * cos_node - c.y * sin_node,
            c.x * sin_node + c.y * cos_node,
            c.z,
        );

        let obs = self.look_angles(state.time, &state.position, &state.velocity);
        acos_clamped(-boresight.dot(&obs.range_vec) / obs.range)
    }
}

#[cfg(test)]
mod observer_test {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::orbit::Satellite;

    const LINE1: &str = "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991";
    const LINE2: &str = "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444";

    fn toulouse() -> Observer {
        Observer::new(1.4437, 43.6045, 0.146, Some("Toulouse".into())).unwrap()
    }

    #[test]
    fn test_observer_constructor() {
        let observer = toulouse();
        assert_abs_diff_eq!(observer.latitude.into_inner(), 43.6045_f64.to_radians());
        assert_abs_diff_eq!(observer.longitude.into_inner(), 1.4437_f64.to_radians());
        assert_eq!(observer.altitude.into_inner(), 0.146);

        assert!(matches!(
            Observer::new(f64::NAN, 0.0, 0.0, None),
            Err(PredictError::InvalidFloatValue(_))
        ));
    }

    #[test]
    fn test_zenith_target() {
        let observer = toulouse();
        let jd = 2460364.9745069;
        let site = observer.geodetic(jd);
        let (site_pos, _) = observer.position_velocity(jd);

        // local vertical of the ellipsoid
        let up = Vector3::new(
            site.latitude.cos() * site.theta.cos(),
            site.latitude.cos() * site.theta.sin(),
            site.latitude.sin(),
        );
        let target = site_pos + up * 500.0;
        let obs = observer.look_angles(jd, &target, &Vector3::zeros());
        assert_abs_diff_eq!(obs.elevation, PI / 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(obs.range, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_azimuth_cardinal_points() {
        let observer = Observer::new(10.0, 30.0, 0.0, None).unwrap();
        let jd = 2460364.9745069;
        let site = observer.geodetic(jd);
        let (site_pos, _) = observer.position_velocity(jd);
        let (sin_t, cos_t) = site.theta.sin_cos();
        let (sin_p, cos_p) = site.latitude.sin_cos();

        let north = Vector3::new(-sin_p * cos_t, -sin_p * sin_t, cos_p);
        let east = Vector3::new(-sin_t, cos_t, 0.0);
        let up = Vector3::new(cos_p * cos_t, cos_p * sin_t, sin_p);

        let azimuth = |direction: Vector3<f64>| {
            observer
                .look_angles(jd, &(site_pos + direction * 100.0 + up), &Vector3::zeros())
                .azimuth
        };
        // angular distance, north sits on the 0 / 2π seam
        let gap = |a: f64, b: f64| ((a - b + PI).rem_euclid(DPI) - PI).abs();

        assert!(gap(azimuth(north), 0.0) < 1e-9);
        assert!(gap(azimuth(east), PI / 2.0) < 1e-9);
        assert!(gap(azimuth(-north), PI) < 1e-9);
        assert!(gap(azimuth(-east), 3.0 * PI / 2.0) < 1e-9);
        assert!(gap(azimuth(north + east), PI / 4.0) < 1e-9);
    }

    #[test]
    fn test_range_rate_and_doppler() {
        let observer = toulouse();
        let jd = 2460364.9745069;
        let (site_pos, site_vel) = observer.position_velocity(jd);
        let up = site_pos.normalize();

        // target moving away along the line of sight at 1 km/s
        let obs = observer.look_angles(jd, &(site_pos + up * 1000.0), &(site_vel + up));
        assert_abs_diff_eq!(obs.range_rate, 1.0, epsilon = 1e-12);

        let shift = obs.doppler_shift(437.0e6);
        assert_abs_diff_eq!(shift, -437.0e6 * 1000.0 / SPEED_OF_LIGHT, epsilon = 1e-6);
        assert!(shift < 0.0);
    }

    #[test]
    fn test_observe_satellite() {
        let satellite = Satellite::from_tle(LINE1, LINE2).unwrap();
        let observer = toulouse();

        for k in 0..96 {
            let state = satellite.predict(satellite.epoch_julian() + k as f64 / 96.0);
            let obs = observer.observe(&state);
            assert!((0.0..DPI).contains(&obs.azimuth));
            assert!(obs.elevation.abs() <= PI / 2.0);
            assert!(obs.range > 500.0);
            assert!(obs.range_rate.abs() < 8.0);
            if obs.visible {
                assert!(obs.elevation > 0.0 && !state.eclipsed);
            }

            let eq = observer.observe_equatorial(&state);
            assert!((0.0..DPI).contains(&eq.right_ascension));
            assert!(eq.declination.abs() <= PI / 2.0);

            // line of sight rebuilt from RA/Dec points along the range vector
            let los = Vector3::new(
                eq.declination.cos() * eq.right_ascension.cos(),
                eq.declination.cos() * eq.right_ascension.sin(),
                eq.declination.sin(),
            );
            assert_abs_diff_eq!(los, obs.range_vec / obs.range, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_observe_sun() {
        let observer = toulouse();
        // 2024-06-20 12:00 UTC, local noon near the solstice
        let noon = observer.observe_sun(2460482.0);
        assert!(noon.visible);
        assert_abs_diff_eq!(
            noon.elevation.to_degrees(),
            90.0 - 43.6045 + 23.43,
            epsilon = 1.0
        );

        // midnight
        let midnight = observer.observe_sun(2460482.5);
        assert!(!midnight.visible);
        assert!(midnight.elevation < 0.0);
    }

    #[test]
    fn test_squint_angle() {
        let satellite = Satellite::from_tle(LINE1, LINE2).unwrap();
        let observer = toulouse();
        let state = satellite.predict(satellite.epoch_julian() + 0.3);
        let obs = observer.observe(&state);

        let squint = observer.squint_angle(&state, 0.0, -PI / 2.0);
        assert!((0.0..=PI).contains(&squint));
        assert!(obs.range > 0.0);

        // opposite boresights give supplementary squint angles
        let a = observer.squint_angle(&state, 0.3, 0.2);
        let b = observer.squint_angle(&state, 0.3 + PI, -0.2);
        assert_abs_diff_eq!(a + b, PI, epsilon = 1e-9);
    }
}

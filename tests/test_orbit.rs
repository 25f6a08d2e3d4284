use std::thread;

use approx::assert_abs_diff_eq;
use obdh_predict::constants::{EARTH_RADIUS_KM_WGS84, SECONDS_PER_DAY};
use obdh_predict::ephemeris::{DeepSpaceModel, EphemerisModel};
use obdh_predict::orbit::Satellite;
use obdh_predict::predict_errors::PredictError;
use obdh_predict::tle::parse_tle;

mod common;
use common::*;

#[test]
fn test_velocity_matches_position_rate() {
    let satellite = leo();
    let dt = 5.0 / SECONDS_PER_DAY;

    for offset in [-0.3, 0.0, 0.07, 1.5] {
        let jd = satellite.epoch_julian() + offset;
        let before = satellite.predict(jd - dt);
        let now = satellite.predict(jd);
        let after = satellite.predict(jd + dt);

        let rate = (after.position - before.position) / 10.0;
        assert_abs_diff_eq!(rate, now.velocity, epsilon = 1e-3);
    }
}

#[test]
fn test_continuous_across_epoch() {
    let satellite = leo();
    let dt = 1.0 / SECONDS_PER_DAY;
    let before = satellite.predict(satellite.epoch_julian() - dt);
    let after = satellite.predict(satellite.epoch_julian() + dt);
    assert_abs_diff_eq!((after.position - before.position).norm(), 15.13, epsilon = 0.01);
}

#[test]
fn test_ground_track() {
    let satellite = leo();
    let epoch = satellite.epoch_julian();

    let mut max_latitude: f64 = 0.0;
    for minute in 0..100 {
        let state = satellite.predict(epoch + minute as f64 / 1440.0);
        assert!(state.altitude > 550.0 && state.altitude < 650.0);
        assert!(state.longitude > -std::f64::consts::PI && state.longitude <= std::f64::consts::PI);
        assert!(state.kepler_converged && state.geodetic_converged);
        assert_eq!(state.eclipsed, state.eclipse_depth >= 0.0);
        max_latitude = max_latitude.max(state.latitude.abs());
    }
    // 97.85° inclination reaches about 82° geodetic latitude within one orbit
    assert!(max_latitude.to_degrees() > 80.0 && max_latitude.to_degrees() < 83.0);
}

#[test]
fn test_eclipse_every_orbit() {
    let satellite = leo();
    let epoch = satellite.epoch_julian();
    let states: Vec<_> = (0..97)
        .map(|minute| satellite.predict(epoch + minute as f64 / 1440.0))
        .collect();

    let eclipsed = states.iter().filter(|s| s.eclipsed).count();
    assert!(eclipsed > 0 && eclipsed < states.len());
}

#[test]
fn test_decay_of_drag_set() {
    let satellite = Satellite::from_tle(DRAG_LINE1, DRAG_LINE2).unwrap();
    let epoch = satellite.epoch_julian();

    // linear mean motion growth reaches 16.67 rev/day about 83 days after epoch
    assert!(!satellite.predict(epoch).decayed);
    assert!(!satellite.predict(epoch + 80.0).decayed);
    assert!(satellite.predict(epoch + 90.0).decayed);
}

#[test]
fn test_revolution_count() {
    let satellite = Satellite::from_tle(DRAG_LINE1, DRAG_LINE2).unwrap();
    let epoch = satellite.epoch_julian();

    // 110.57° mean anomaly at epoch: less than half an orbit already flown
    assert_eq!(satellite.predict(epoch).revolutions, 105);
    assert_eq!(satellite.predict(epoch + 1.0).revolutions, 105 + 16);
}

#[test]
fn test_deep_space_needs_provider() {
    assert_eq!(
        Satellite::from_tle(MEO_LINE1, MEO_LINE2).unwrap_err(),
        PredictError::DeepSpaceModelUnavailable
    );
}

#[test]
fn test_deep_space_dispatch() {
    let satellite = Satellite::from_tle_with_deep_space(MEO_LINE1, MEO_LINE2, &CircularProvider)
        .unwrap();
    assert_eq!(satellite.model(), EphemerisModel::DeepSpace);

    let state = satellite.predict(satellite.epoch_julian());
    assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-9);
    assert!(state.position.x > 26_400.0 && state.position.x < 26_700.0);
    assert_abs_diff_eq!(
        state.altitude,
        state.position.norm() - EARTH_RADIUS_KM_WGS84,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(state.velocity.norm(), 3.87, epsilon = 0.01);
}

#[test]
fn test_provider_ignored_for_near_earth() {
    let satellite =
        Satellite::from_tle_with_deep_space(LEO_LINE1, LEO_LINE2, &CircularProvider).unwrap();
    assert_eq!(satellite.model(), EphemerisModel::NearEarth);

    let elements = parse_tle(LEO_LINE1, LEO_LINE2).unwrap();
    assert_eq!(
        CircularProvider.init(&elements).unwrap_err(),
        PredictError::ModelMismatch {
            expected: EphemerisModel::DeepSpace,
            found: EphemerisModel::NearEarth
        }
    );
}

#[test]
fn test_update_while_propagating() {
    let old = leo();
    let epoch = old.epoch_julian();
    let reference: Vec<_> = (0..50)
        .map(|k| old.predict(epoch + k as f64 * 0.01).position)
        .collect();

    thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let satellite = old.clone();
                scope.spawn(move || {
                    (0..50)
                        .map(|k| satellite.predict(epoch + k as f64 * 0.01).position)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        // a new element set replaces the handle while the workers still hold the old one
        let new = Satellite::from_tle(DRAG_LINE1, DRAG_LINE2).unwrap();
        assert_ne!(new.elements(), old.elements());

        for worker in workers {
            assert_eq!(worker.join().unwrap(), reference);
        }
    });
}

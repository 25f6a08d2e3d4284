#![allow(dead_code)]

use std::sync::Arc;

use nalgebra::Vector3;
use obdh_predict::config::PredictConfig;
use obdh_predict::constants::{Minutes, DPI, MINUTES_PER_DAY, TWO_THIRD, XKE};
use obdh_predict::conversion::fmod2p;
use obdh_predict::ephemeris::deep_space::ensure_deep_space;
use obdh_predict::ephemeris::{DeepSpaceModel, EphemerisModel, ModelOutput, Propagator};
use obdh_predict::orbit::Satellite;
use obdh_predict::predict_errors::PredictError;
use obdh_predict::tle::OrbitalElements;

/// Sun-synchronous LEO, ~600 km.
pub const LEO_LINE1: &str = "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991";
pub const LEO_LINE2: &str = "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444";

/// Classic SGP4 verification set, fast decaying.
pub const DRAG_LINE1: &str = "1 88888U          80275.98708465  .00073094  13844-3  66816-4 0    8";
pub const DRAG_LINE2: &str = "2 88888  72.8435 115.9689 0086731  52.6988 110.5714 16.05824518  105";

/// Half-synchronous navigation orbit, deep-space.
pub const MEO_LINE1: &str = "1 28874U 05038A   24055.50000000 -.00000047  00000-0  00000+0 0  9993";
pub const MEO_LINE2: &str = "2 28874  55.2530 208.4170 0123456 260.1230  99.5000  2.00564030135609";

pub fn leo() -> Satellite {
    Satellite::from_tle(LEO_LINE1, LEO_LINE2).unwrap()
}

/// Equatorial circular two-body motion at the Kepler radius of the mean motion.
#[derive(Debug)]
pub struct CircularOrbit {
    pub radius: f64,
    pub rate: f64,
}

impl Propagator for CircularOrbit {
    fn propagate(&self, tsince: Minutes, _config: &PredictConfig) -> ModelOutput {
        let angle = self.rate * tsince;
        let (sin, cos) = angle.sin_cos();
        let speed = self.radius * self.rate;
        ModelOutput {
            position: Vector3::new(self.radius * cos, self.radius * sin, 0.0),
            velocity: Vector3::new(-speed * sin, speed * cos, 0.0),
            phase: fmod2p(angle),
            inclination: 0.0,
            argument_of_perigee: 0.0,
            right_ascension: 0.0,
            kepler_converged: true,
            kepler_iterations: 0,
        }
    }

    fn model(&self) -> EphemerisModel {
        EphemerisModel::DeepSpace
    }
}

/// Deep-space stand-in returning a [`CircularOrbit`].
pub struct CircularProvider;

impl DeepSpaceModel for CircularProvider {
    fn init(&self, elements: &OrbitalElements) -> Result<Arc<dyn Propagator>, PredictError> {
        ensure_deep_space(elements)?;
        let rate = elements.mean_motion * DPI / MINUTES_PER_DAY;
        Ok(Arc::new(CircularOrbit {
            radius: (XKE / rate).powf(TWO_THIRD),
            rate,
        }))
    }
}

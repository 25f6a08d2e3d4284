//! # Propagator configuration
//!
//! [`PredictConfig`] carries the iteration caps and tolerances of the two iterative solvers
//! of the crate:
//!
//! - the **Kepler solver** used by SGP4 ([`crate::kepler::solve_kepler_equation`]),
//! - the **geodetic latitude solver** ([`crate::observers::geodetic::eci_to_geodetic`]).
//!
//! Both loops are bounded by construction; when a cap is reached the last estimate is kept and
//! the result carries a `converged: false` flag instead of an error.
//!
//! The defaults reproduce the flight software behaviour (10 Kepler iterations at 1e-6 rad,
//! geodetic convergence at 1e-10 rad). The struct is `serde`-(de)serializable so that a ground
//! tool can ship an override alongside a TLE upload.
//!
//! ## Usage
//!
//! ```rust
//! use obdh_predict::config::PredictConfig;
//!
//! let config = PredictConfig::default()
//!     .with_kepler_max_iterations(20)
//!     .with_geodetic_tolerance(1e-12);
//! assert!(config.validate().is_ok());
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::E6A;
use crate::predict_errors::PredictError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Upper bound on Kepler solver updates per propagation.
    pub kepler_max_iterations: usize,
    /// Absolute convergence threshold of the Kepler solver, radians.
    pub kepler_tolerance: f64,
    /// Upper bound on geodetic latitude updates.
    pub geodetic_max_iterations: usize,
    /// Absolute convergence threshold of the geodetic latitude, radians.
    pub geodetic_tolerance: f64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        PredictConfig {
            kepler_max_iterations: 10,
            kepler_tolerance: E6A,
            geodetic_max_iterations: 10,
            geodetic_tolerance: 1e-10,
        }
    }
}

impl PredictConfig {
    pub fn with_kepler_max_iterations(mut self, iterations: usize) -> Self {
        self.kepler_max_iterations = iterations;
        self
    }

    pub fn with_kepler_tolerance(mut self, tolerance: f64) -> Self {
        self.kepler_tolerance = tolerance;
        self
    }

    pub fn with_geodetic_max_iterations(mut self, iterations: usize) -> Self {
        self.geodetic_max_iterations = iterations;
        self
    }

    pub fn with_geodetic_tolerance(mut self, tolerance: f64) -> Self {
        self.geodetic_tolerance = tolerance;
        self
    }

    /// Check that every cap is non-zero and every tolerance is a positive finite number.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` or [`PredictError::InvalidConfig`] naming the offending setting.
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.kepler_max_iterations == 0 {
            return Err(PredictError::InvalidConfig(
                "kepler_max_iterations must be at least 1".into(),
            ));
        }
        if self.geodetic_max_iterations == 0 {
            return Err(PredictError::InvalidConfig(
                "geodetic_max_iterations must be at least 1".into(),
            ));
        }
        let positive = |x: f64| x.is_finite() && x > 0.0;
        if !positive(self.kepler_tolerance) {
            return Err(PredictError::InvalidConfig(format!(
                "kepler_tolerance must be positive, got {}",
                self.kepler_tolerance
            )));
        }
        if !positive(self.geodetic_tolerance) {
            return Err(PredictError::InvalidConfig(format!(
                "geodetic_tolerance must be positive, got {}",
                self.geodetic_tolerance
            )));
        }
        Ok(())
    }
}

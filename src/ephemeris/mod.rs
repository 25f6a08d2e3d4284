//! # Ephemeris models
//!
//! An element set is propagated either by the near-Earth **SGP4** model implemented in
//! [`sgp4`], or by a deep-space model supplied by the caller through the
//! [`DeepSpaceModel`](deep_space::DeepSpaceModel) capability. Both sides expose the same
//! shape:
//!
//! ```text
//! init(&OrbitalElements) -> model            (once per TLE update)
//! propagate(&model, minutes since epoch)     (many times, immutable)
//! ```
//!
//! [`Ephemeris`] is the tagged variant holding the initialised model. It is built once from
//! validated elements, never mutated, and shared freely between threads.
//!
//! ## Units
//!
//! [`ModelOutput`] is expressed in the normalized units of the models: **Earth radii** and
//! **Earth radii per minute**. [`crate::orbit`] rescales to kilometres.
pub mod deep_space;
pub mod sgp4;

use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PredictConfig;
use crate::constants::{Minutes, Radian};
use crate::predict_errors::PredictError;
use crate::tle::OrbitalElements;

pub use deep_space::DeepSpaceModel;
pub use sgp4::Sgp4;

/// Which family of perturbation theory an element set needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EphemerisModel {
    /// Period below 225 minutes, SGP4.
    NearEarth,
    /// Period of 225 minutes or more, SDP4 class models.
    DeepSpace,
}

/// Raw state produced by a propagation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelOutput {
    /// Inertial (TEME) position, Earth radii.
    pub position: Vector3<f64>,
    /// Inertial velocity, Earth radii per minute.
    pub velocity: Vector3<f64>,
    /// Mean argument of latitude measured from perigee, in `[0, 2π)`.
    pub phase: Radian,
    pub inclination: Radian,
    pub argument_of_perigee: Radian,
    pub right_ascension: Radian,
    pub kepler_converged: bool,
    pub kepler_iterations: usize,
}

/// A fully initialised propagation model.
///
/// Implementors hold their coefficients by value and never mutate them: `propagate` takes
/// `&self`, so one model can serve concurrent callers.
pub trait Propagator: Send + Sync + std::fmt::Debug {
    /// Propagate to `tsince` minutes after the element-set epoch (negative values go backwards).
    fn propagate(&self, tsince: Minutes, config: &PredictConfig) -> ModelOutput;

    fn model(&self) -> EphemerisModel;
}

/// Initialised model of one element set.
#[derive(Debug, Clone)]
pub enum Ephemeris {
    NearEarth(Sgp4),
    DeepSpace(Arc<dyn Propagator>),
}

impl Ephemeris {
    /// Select and initialise the model matching `elements`.
    ///
    /// Arguments
    /// -----------------
    /// * `elements`: the element set, validated here.
    /// * `deep_space`: provider used when the elements classify as deep-space.
    ///
    /// Return
    /// ----------
    /// * The initialised [`Ephemeris`], or
    ///   - [`PredictError::InvalidElements`] for non-physical elements,
    ///   - [`PredictError::DeepSpaceModelUnavailable`] for a deep-space set without provider,
    ///   - [`PredictError::ModelMismatch`] if the provider returns a near-Earth model,
    ///   - any error reported by the provider itself.
    pub fn init(
        elements: &OrbitalElements,
        deep_space: Option<&dyn DeepSpaceModel>,
    ) -> Result<Self, PredictError> {
        elements.validate()?;

        let ephemeris = match elements.model() {
            EphemerisModel::NearEarth => Ephemeris::NearEarth(Sgp4::new(elements)?),
            EphemerisModel::DeepSpace => {
                let provider = deep_space.ok_or(PredictError::DeepSpaceModelUnavailable)?;
                let propagator = provider.init(elements)?;
                if propagator.model() != EphemerisModel::DeepSpace {
                    return Err(PredictError::ModelMismatch {
                        expected: EphemerisModel::DeepSpace,
                        found: propagator.model(),
                    });
                }
                Ephemeris::DeepSpace(propagator)
            }
        };

        debug!(
            satellite = elements.satellite_number,
            model = ?ephemeris.model(),
            "ephemeris initialised"
        );
        Ok(ephemeris)
    }

    pub fn model(&self) -> EphemerisModel {
        match self {
            Ephemeris::NearEarth(_) => EphemerisModel::NearEarth,
            Ephemeris::DeepSpace(_) => EphemerisModel::DeepSpace,
        }
    }

    pub fn propagate(&self, tsince: Minutes, config: &PredictConfig) -> ModelOutput {
        match self {
            Ephemeris::NearEarth(sgp4) => sgp4.propagate(tsince, config),
            Ephemeris::DeepSpace(propagator) => propagator.propagate(tsince, config),
        }
    }
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::tle::parse_tle;

    const LINE1: &str = "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991";
    const LINE2: &str = "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444";

    #[derive(Debug)]
    struct Frozen(ModelOutput);

    impl Propagator for Frozen {
        fn propagate(&self, _tsince: Minutes, _config: &PredictConfig) -> ModelOutput {
            self.0
        }

        fn model(&self) -> EphemerisModel {
            EphemerisModel::DeepSpace
        }
    }

    struct FrozenProvider;

    impl DeepSpaceModel for FrozenProvider {
        fn init(&self, elements: &OrbitalElements) -> Result<Arc<dyn Propagator>, PredictError> {
            deep_space::ensure_deep_space(elements)?;
            Ok(Arc::new(Frozen(ModelOutput {
                position: Vector3::new(6.6, 0.0, 0.0),
                velocity: Vector3::new(0.0, 0.06, 0.0),
                phase: 0.0,
                inclination: 0.0,
                argument_of_perigee: 0.0,
                right_ascension: 0.0,
                kepler_converged: true,
                kepler_iterations: 1,
            })))
        }
    }

    #[test]
    fn test_near_earth_dispatch() {
        let elements = parse_tle(LINE1, LINE2).unwrap();
        let ephemeris = Ephemeris::init(&elements, None).unwrap();
        assert_eq!(ephemeris.model(), EphemerisModel::NearEarth);

        let out = ephemeris.propagate(0.0, &PredictConfig::default());
        assert!(out.kepler_converged);
        assert!(out.position.norm() > 1.0);
    }

    #[test]
    fn test_deep_space_dispatch() {
        let mut elements = parse_tle(LINE1, LINE2).unwrap();
        elements.mean_motion = 1.0027;

        assert_eq!(
            Ephemeris::init(&elements, None).unwrap_err(),
            PredictError::DeepSpaceModelUnavailable
        );

        let ephemeris = Ephemeris::init(&elements, Some(&FrozenProvider)).unwrap();
        assert_eq!(ephemeris.model(), EphemerisModel::DeepSpace);
        let out = ephemeris.propagate(120.0, &PredictConfig::default());
        assert_eq!(out.position, Vector3::new(6.6, 0.0, 0.0));
    }

    #[test]
    fn test_provider_checks_model() {
        let elements = parse_tle(LINE1, LINE2).unwrap();
        assert_eq!(
            FrozenProvider.init(&elements).unwrap_err(),
            PredictError::ModelMismatch {
                expected: EphemerisModel::DeepSpace,
                found: EphemerisModel::NearEarth,
            }
        );
    }
}

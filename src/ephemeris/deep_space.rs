//! # Deep-space capability
//!
//! Element sets with a period of 225 minutes or more need lunar-solar and resonance terms
//! (SDP4). The crate does not ship that model: the owner of the deep-space mathematics plugs it
//! in by implementing [`DeepSpaceModel`], and [`crate::ephemeris::Ephemeris::init`] calls it
//! whenever the elements classify as deep-space.
//!
//! The provider returns its initialised coefficients behind an `Arc<dyn Propagator>`, so a
//! [`crate::orbit::Satellite`] stays cheap to clone and the coefficients are shared read-only
//! by every propagation in flight.
use std::sync::Arc;

use crate::ephemeris::{EphemerisModel, Propagator};
use crate::predict_errors::PredictError;
use crate::tle::OrbitalElements;

/// Factory of deep-space propagators.
pub trait DeepSpaceModel: Send + Sync {
    /// Derive the model coefficients from a deep-space element set.
    fn init(&self, elements: &OrbitalElements) -> Result<Arc<dyn Propagator>, PredictError>;
}

/// Reject element sets that do not classify as deep-space.
///
/// Providers call this first so that a near-Earth set is never fed to deep-space theory.
pub fn ensure_deep_space(elements: &OrbitalElements) -> Result<(), PredictError> {
    match elements.model() {
        EphemerisModel::DeepSpace => Ok(()),
        found => Err(PredictError::ModelMismatch {
            expected: EphemerisModel::DeepSpace,
            found,
        }),
    }
}

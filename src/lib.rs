//! Orbit prediction for on-board data handling: TLE parsing, SGP4 propagation, geodetic and
//! ground-station geometry, eclipse state.
//!
//! ```rust
//! use obdh_predict::{Observer, Satellite};
//!
//! let satellite = Satellite::from_tle(
//!     "1 44885U 19093G   24055.47450690  .00005228  00000-0  56684-3 0  9991",
//!     "2 44885  97.8473 139.0522 0012434 335.2519  24.8100 14.88559378226444",
//! )?;
//! let station = Observer::new(1.44, 43.6, 0.15, Some("Toulouse".into()))?;
//!
//! let state = satellite.predict(satellite.epoch_julian() + 0.1);
//! let look = station.observe(&state);
//! assert!(look.elevation.abs() <= std::f64::consts::FRAC_PI_2);
//! # Ok::<(), obdh_predict::PredictError>(())
//! ```
pub mod config;
pub mod constants;
pub mod conversion;
pub mod eclipse;
pub mod ephemeris;
pub mod kepler;
pub mod observers;
pub mod orbit;
pub mod predict_errors;
pub mod sun;
pub mod time;
pub mod tle;

pub use config::PredictConfig;
pub use ephemeris::{DeepSpaceModel, Ephemeris, EphemerisModel, ModelOutput, Propagator};
pub use observers::{Observation, Observer};
pub use orbit::{OrbitState, Satellite};
pub use predict_errors::{ParseTleError, PredictError};
pub use tle::{parse_tle, OrbitalElements};

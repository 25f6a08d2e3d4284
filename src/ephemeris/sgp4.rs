//! # SGP4 near-Earth propagator
//!
//! Simplified General Perturbations model of Spacetrack Report #3 (Hoots & Roehrich, 1980), for
//! element sets with a period below 225 minutes.
//!
//! ## Overview
//!
//! [`Sgp4::new`] performs the one-time initialisation: Brouwer mean elements, atmospheric
//! density parameters, drag coefficients C1…C5, D2…D4, secular rates of the mean anomaly,
//! argument of perigee and node, and the time-polynomial cofactors. The result is an immutable
//! coefficient block, so stale coefficients can never be paired with new elements: a TLE update
//! builds a new [`Sgp4`].
//!
//! [`Propagator::propagate`] then evaluates, for a time `t` in minutes since epoch:
//!
//! 1. secular gravity and drag on M, ω and Ω (cubic/quartic terms unless the orbit is *simple*),
//! 2. long-period periodics on the eccentricity vector,
//! 3. Kepler's equation, through [`crate::kepler::solve_kepler_equation`],
//! 4. short-period periodics on radius, argument of latitude, inclination and node,
//! 5. the orientation vectors and the inertial position/velocity,
//! 6. the orbital phase.
//!
//! ## Low perigee
//!
//! - perigee below 220 km: the orbit is flagged *simple*, the drag terms are truncated to
//!   linear/quadratic variation,
//! - perigee below 156 km: the density parameter `s` is lowered (floored at 20 km altitude when
//!   the perigee is below 98 km).
//!
//! ## Units
//!
//! Internal quantities are in Earth radii and minutes. Output position is in Earth radii,
//! velocity in Earth radii per minute.
use tracing::{debug, trace};

use crate::config::PredictConfig;
use crate::constants::{
    Kilometer, Minutes, AE, CK2, CK4, DPI, EARTH_RADIUS_KM_WGS84, J3_HARMONIC_WGS72, QOMS2T, S_DENSITY_PARAM,
    TWO_THIRD, XKE,
};
use crate::conversion::fmod2p;
use crate::ephemeris::{EphemerisModel, ModelOutput, Propagator};
use crate::kepler::solve_kepler_equation;
use crate::predict_errors::PredictError;
use crate::tle::OrbitalElements;

use nalgebra::Vector3;

/// Below this eccentricity the terms divided by `e` are dropped.
const ECCENTRICITY_GUARD: f64 = 1.0e-4;

/// Initialised SGP4 coefficients of one element set.
#[derive(Debug, Clone, PartialEq)]
pub struct Sgp4 {
    // mean elements at epoch
    xincl: f64,
    xnodeo: f64,
    eo: f64,
    omegao: f64,
    xmo: f64,
    bstar: f64,
    aodp: f64,
    xnodp: f64,

    // inclination functions
    cosio: f64,
    sinio: f64,
    x3thm1: f64,
    x1mth2: f64,
    x7thm1: f64,

    // drag
    eta: f64,
    c1: f64,
    c4: f64,
    c5: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    t2cof: f64,
    t3cof: f64,
    t4cof: f64,
    t5cof: f64,

    // secular rates and cofactors
    xmdot: f64,
    omgdot: f64,
    xnodot: f64,
    omgcof: f64,
    xmcof: f64,
    xnodcf: f64,
    xlcof: f64,
    aycof: f64,
    delmo: f64,
    sinmo: f64,

    simple: bool,
}

impl Sgp4 {
    /// Initialise the model from a near-Earth element set.
    ///
    /// Arguments
    /// -----------------
    /// * `elements`: mean elements of the TLE.
    ///
    /// Return
    /// ----------
    /// * The coefficient block, or
    ///   - [`PredictError::InvalidElements`] if the elements are not physical,
    ///   - [`PredictError::ModelMismatch`] if they need the deep-space model.
    pub fn new(elements: &OrbitalElements) -> Result<Self, PredictError> {
        elements.validate()?;
        let model = elements.model();
        if model != EphemerisModel::NearEarth {
            return Err(PredictError::ModelMismatch {
                expected: EphemerisModel::NearEarth,
                found: model,
            });
        }

        let xincl = elements.inclination.to_radians();
        let xnodeo = elements.right_ascension.to_radians();
        let eo = elements.eccentricity;
        let omegao = elements.argument_of_perigee.to_radians();
        let xmo = elements.mean_anomaly.to_radians();
        let bstar = elements.bstar / AE;

        // recover original mean motion (xnodp) and semi-major axis (aodp)
        let brouwer = elements.brouwer_mean();
        let (aodp, xnodp) = (brouwer.aodp, brouwer.xnodp);

        let cosio = xincl.cos();
        let theta2 = cosio * cosio;
        let x3thm1 = 3.0 * theta2 - 1.0;
        let eosq = eo * eo;
        let betao2 = 1.0 - eosq;
        let betao = betao2.sqrt();

        let simple = aodp * (1.0 - eo) / AE < 220.0 / EARTH_RADIUS_KM_WGS84 + AE;

        let perigee = (aodp * (1.0 - eo) - AE) * EARTH_RADIUS_KM_WGS84;
        let (s4, qoms24) = density_parameters(perigee);

        let pinvsq = 1.0 / (aodp * aodp * betao2 * betao2);
        let tsi = 1.0 / (aodp - s4);
        let eta = aodp * eo * tsi;
        let etasq = eta * eta;
        let eeta = eo * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qoms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        let c2 = coef1
            * xnodp
            * (aodp * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.75 * CK2 * tsi / psisq * x3thm1 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let c1 = bstar * c2;
        let sinio = xincl.sin();
        let a3ovk2 = -J3_HARMONIC_WGS72 / CK2 * AE.powi(3);
        let c3 = if eo > ECCENTRICITY_GUARD {
            coef * tsi * a3ovk2 * xnodp * AE * sinio / eo
        } else {
            0.0
        };
        let x1mth2 = 1.0 - theta2;

        let c4 = 2.0
            * xnodp
            * coef1
            * aodp
            * betao2
            * (eta * (2.0 + 0.5 * etasq) + eo * (0.5 + 2.0 * etasq)
                - 2.0 * CK2 * tsi / (aodp * psisq)
                    * (-3.0 * x3thm1 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * omegao).cos()));
        let c5 = 2.0 * coef1 * aodp * betao2 * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // secular rates
        let theta4 = theta2 * theta2;
        let temp1 = 3.0 * CK2 * pinvsq * xnodp;
        let temp2 = temp1 * CK2 * pinvsq;
        let temp3 = 1.25 * CK4 * pinvsq * pinvsq * xnodp;
        let xmdot = xnodp
            + 0.5 * temp1 * betao * x3thm1
            + 0.0625 * temp2 * betao * (13.0 - 78.0 * theta2 + 137.0 * theta4);
        let x1m5th = 1.0 - 5.0 * theta2;
        let omgdot = -0.5 * temp1 * x1m5th
            + 0.0625 * temp2 * (7.0 - 114.0 * theta2 + 395.0 * theta4)
            + temp3 * (3.0 - 36.0 * theta2 + 49.0 * theta4);
        let xhdot1 = -temp1 * cosio;
        let xnodot =
            xhdot1 + (0.5 * temp2 * (4.0 - 19.0 * theta2) + 2.0 * temp3 * (3.0 - 7.0 * theta2)) * cosio;

        let omgcof = bstar * c3 * omegao.cos();
        let xmcof = if eo > ECCENTRICITY_GUARD {
            -TWO_THIRD * coef * bstar * AE / eeta
        } else {
            0.0
        };
        let xnodcf = 3.5 * betao2 * xhdot1 * c1;
        let t2cof = 1.5 * c1;
        // retrograde equatorial orbits: 1 + cos(i) vanishes
        let one_plus_cosio = (1.0 + cosio).max(1.5e-12);
        let xlcof = 0.125 * a3ovk2 * sinio * (3.0 + 5.0 * cosio) / one_plus_cosio;
        let aycof = 0.25 * a3ovk2 * sinio;
        let delmo = (1.0 + eta * xmo.cos()).powi(3);
        let sinmo = xmo.sin();
        let x7thm1 = 7.0 * theta2 - 1.0;

        let (mut d2, mut d3, mut d4) = (0.0, 0.0, 0.0);
        let (mut t3cof, mut t4cof, mut t5cof) = (0.0, 0.0, 0.0);
        if !simple {
            let c1sq = c1 * c1;
            d2 = 4.0 * aodp * tsi * c1sq;
            let temp = d2 * tsi * c1 / 3.0;
            d3 = (17.0 * aodp + s4) * temp;
            d4 = 0.5 * temp * aodp * tsi * (221.0 * aodp + 31.0 * s4) * c1;
            t3cof = d2 + 2.0 * c1sq;
            t4cof = 0.25 * (3.0 * d3 + c1 * (12.0 * d2 + 10.0 * c1sq));
            t5cof = 0.2 * (3.0 * d4 + 12.0 * c1 * d3 + 6.0 * d2 * d2 + 15.0 * c1sq * (2.0 * d2 + c1sq));
        }

        debug!(
            satellite = elements.satellite_number,
            perigee_km = perigee,
            simple,
            "SGP4 initialised"
        );

        Ok(Sgp4 {
            xincl,
            xnodeo,
            eo,
            omegao,
            xmo,
            bstar,
            aodp,
            xnodp,
            cosio,
            sinio,
            x3thm1,
            x1mth2,
            x7thm1,
            eta,
            c1,
            c4,
            c5,
            d2,
            d3,
            d4,
            t2cof,
            t3cof,
            t4cof,
            t5cof,
            xmdot,
            omgdot,
            xnodot,
            omgcof,
            xmcof,
            xnodcf,
            xlcof,
            aycof,
            delmo,
            sinmo,
            simple,
        })
    }

    /// Perigee below 220 km: higher order drag terms are dropped.
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Brouwer mean motion, radians per minute.
    pub fn mean_motion(&self) -> f64 {
        self.xnodp
    }

    /// Brouwer semi-major axis, Earth radii.
    pub fn semi_major_axis(&self) -> f64 {
        self.aodp
    }
}

/// Atmospheric density parameters `(s4, qoms24)` for a perigee altitude in km.
///
/// Above 156 km the standard values apply. Below, `s4` follows the perigee (`perigee - 78`
/// km), floored at 20 km once the perigee drops to 98 km.
fn density_parameters(perigee: Kilometer) -> (f64, f64) {
    if perigee >= 156.0 {
        return (S_DENSITY_PARAM, QOMS2T);
    }
    let s4 = if perigee <= 98.0 { 20.0 } else { perigee - 78.0 };
    let qoms24 = ((120.0 - s4) * AE / EARTH_RADIUS_KM_WGS84).powi(4);
    (s4 / EARTH_RADIUS_KM_WGS84 + AE, qoms24)
}

impl Propagator for Sgp4 {
    fn propagate(&self, tsince: Minutes, config: &PredictConfig) -> ModelOutput {
        trace!(tsince, "SGP4 propagation");

        // secular gravity and atmospheric drag
        let xmdf = self.xmo + self.xmdot * tsince;
        let omgadf = self.omegao + self.omgdot * tsince;
        let xnoddf = self.xnodeo + self.xnodot * tsince;
        let mut omega = omgadf;
        let mut xmp = xmdf;
        let tsq = tsince * tsince;
        let xnode = xnoddf + self.xnodcf * tsq;
        let mut tempa = 1.0 - self.c1 * tsince;
        let mut tempe = self.bstar * self.c4 * tsince;
        let mut templ = self.t2cof * tsq;

        if !self.simple {
            let delomg = self.omgcof * tsince;
            let delm = self.xmcof * ((1.0 + self.eta * xmdf.cos()).powi(3) - self.delmo);
            let temp = delomg + delm;
            xmp = xmdf + temp;
            omega = omgadf - temp;
            let tcube = tsq * tsince;
            let tfour = tsince * tcube;
            tempa = tempa - self.d2 * tsq - self.d3 * tcube - self.d4 * tfour;
            tempe += self.bstar * self.c5 * (xmp.sin() - self.sinmo);
            templ += self.t3cof * tcube + tfour * (self.t4cof + tsince * self.t5cof);
        }

        let a = self.aodp * tempa * tempa;
        let e = self.eo - tempe;
        let xl = xmp + omega + xnode + self.xnodp * templ;
        let beta = (1.0 - e * e).sqrt();
        let xn = XKE / a.powf(1.5);

        // long period periodics
        let axn = e * omega.cos();
        let temp = 1.0 / (a * beta * beta);
        let xll = temp * self.xlcof * axn;
        let aynl = temp * self.aycof;
        let xlt = xl + xll;
        let ayn = e * omega.sin() + aynl;

        let capu = fmod2p(xlt - xnode);
        let kepler = solve_kepler_equation(
            capu,
            axn,
            ayn,
            config.kepler_max_iterations,
            config.kepler_tolerance,
        );
        let sinepw = kepler.sin_eccentric_longitude;
        let cosepw = kepler.cos_eccentric_longitude;
        let ecose = kepler.ecose;
        let esine = kepler.esine;

        // short period preliminary quantities
        let elsq = axn * axn + ayn * ayn;
        let temp = 1.0 - elsq;
        let pl = a * temp;
        let r = a * (1.0 - ecose);
        let temp1 = 1.0 / r;
        let rdot = XKE * a.sqrt() * esine * temp1;
        let rfdot = XKE * pl.sqrt() * temp1;
        let temp2 = a * temp1;
        let betal = temp.sqrt();
        let temp3 = 1.0 / (1.0 + betal);
        let cosu = temp2 * (cosepw - axn + ayn * esine * temp3);
        let sinu = temp2 * (sinepw - ayn - axn * esine * temp3);
        let u = sinu.atan2(cosu);
        let sin2u = 2.0 * sinu * cosu;
        let cos2u = 2.0 * cosu * cosu - 1.0;
        let temp = 1.0 / pl;
        let temp1 = CK2 * temp;
        let temp2 = temp1 * temp;

        // short period periodics
        let rk = r * (1.0 - 1.5 * temp2 * betal * self.x3thm1) + 0.5 * temp1 * self.x1mth2 * cos2u;
        let uk = u - 0.25 * temp2 * self.x7thm1 * sin2u;
        let xnodek = xnode + 1.5 * temp2 * self.cosio * sin2u;
        let xinck = self.xincl + 1.5 * temp2 * self.cosio * self.sinio * cos2u;
        let rdotk = rdot - xn * temp1 * self.x1mth2 * sin2u;
        let rfdotk = rfdot + xn * temp1 * (self.x1mth2 * cos2u + 1.5 * self.x3thm1);

        // orientation vectors
        let (sinuk, cosuk) = uk.sin_cos();
        let (sinik, cosik) = xinck.sin_cos();
        let (sinnok, cosnok) = xnodek.sin_cos();
        let xmx = -sinnok * cosik;
        let xmy = cosnok * cosik;
        let u_vec = Vector3::new(
            xmx * sinuk + cosnok * cosuk,
            xmy * sinuk + sinnok * cosuk,
            sinik * sinuk,
        );
        let v_vec = Vector3::new(
            xmx * cosuk - cosnok * sinuk,
            xmy * cosuk - sinnok * sinuk,
            sinik * cosuk,
        );

        let position = rk * u_vec;
        let velocity = rdotk * u_vec + rfdotk * v_vec;

        let mut phase = xlt - xnode - omgadf + DPI;
        if phase < 0.0 {
            phase += DPI;
        }

        ModelOutput {
            position,
            velocity,
            phase: fmod2p(phase),
            inclination: xinck,
            argument_of_perigee: omgadf,
            right_ascension: xnodek,
            kepler_converged: kepler.converged,
            kepler_iterations: kepler.iterations,
        }
    }

    fn model(&self) -> EphemerisModel {
        EphemerisModel::NearEarth
    }
}

/// Outcome of the bounded Kepler solver.
///
/// The trigonometric terms are those of `eccentric_longitude`, the estimate the solver stopped on,
/// so the short-period corrections can be computed without re-evaluating `sin`/`cos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric longitude E + ω (radians).
    pub eccentric_longitude: f64,
    pub sin_eccentric_longitude: f64,
    pub cos_eccentric_longitude: f64,
    /// e·cos(E), from the eccentricity vector components.
    pub ecose: f64,
    /// e·sin(E), from the eccentricity vector components.
    pub esine: f64,
    /// Number of update steps evaluated.
    pub iterations: usize,
    /// `false` when the iteration cap was reached before the tolerance.
    pub converged: bool,
}

/// Solve Kepler's equation in its eccentricity-vector form
///
/// ```text
/// U = E - axn·sin(E) + ayn·cos(E)
/// ```
///
/// where `U` is the mean longitude measured from the node, `axn = e·cos ω` and `ayn = e·sin ω`.
/// The Newton update is seeded at `U` and stops once two successive estimates differ by at most
/// `tolerance`. When `max_iterations` updates have been evaluated without reaching the tolerance,
/// the last estimate is kept and the solution is flagged as not converged.
///
/// Arguments
/// -----------------
/// * `capu`: mean longitude from the ascending node, reduced to `[0, 2π)`.
/// * `axn`, `ayn`: components of the eccentricity vector.
/// * `max_iterations`: cap on update steps, at least one step is always evaluated.
/// * `tolerance`: absolute convergence threshold in radians.
///
/// Return
/// ----------
/// * A [`KeplerSolution`].
pub fn solve_kepler_equation(
    capu: f64,
    axn: f64,
    ayn: f64,
    max_iterations: usize,
    tolerance: f64,
) -> KeplerSolution {
    let max_iterations = max_iterations.max(1);
    let mut estimate = capu;
    let mut iterations = 0;

    loop {
        iterations += 1;
        let (sin_epw, cos_epw) = estimate.sin_cos();
        let temp3 = axn * sin_epw;
        let temp4 = ayn * cos_epw;
        let temp5 = axn * cos_epw;
        let temp6 = ayn * sin_epw;
        let next = (capu - temp4 + temp3 - estimate) / (1.0 - temp5 - temp6) + estimate;

        let converged = (next - estimate).abs() <= tolerance;
        if converged || iterations >= max_iterations {
            if !converged {
                tracing::debug!(
                    capu,
                    axn,
                    ayn,
                    residual = (next - estimate).abs(),
                    "Kepler solver reached its iteration cap"
                );
            }
            return KeplerSolution {
                eccentric_longitude: estimate,
                sin_eccentric_longitude: sin_epw,
                cos_eccentric_longitude: cos_epw,
                ecose: temp5 + temp6,
                esine: temp3 - temp4,
                iterations,
                converged,
            };
        }

        estimate = next;
    }
}

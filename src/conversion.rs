use crate::constants::DPI;

/// Reduce an angle in radians to `[0, 2π)`.
pub fn fmod2p(x: f64) -> f64 {
    let r = x % DPI;
    if r >= 0.0 {
        return r;
    }
    // a tiny negative remainder rounds up to 2π
    let wrapped = r + DPI;
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Bring an angle in `[0, 2π)` back into `(limit - 2π, limit]`.
///
/// Used to express longitudes in `(-π, π]` and latitudes in `(-3π/2, π/2]`.
pub fn fix_angle(angle: f64, limit: f64) -> f64 {
    if angle > limit {
        angle - DPI
    } else {
        angle
    }
}

/// `acos` with the argument clamped to `[-1, 1]`, guarding against rounding just outside the domain.
pub fn acos_clamped(arg: f64) -> f64 {
    arg.clamp(-1.0, 1.0).acos()
}

/// `asin` with the argument clamped to `[-1, 1]`.
pub fn asin_clamped(arg: f64) -> f64 {
    arg.clamp(-1.0, 1.0).asin()
}

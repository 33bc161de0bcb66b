use std::f64::consts::TAU;

/// Wraps an angle into `[0, 2π)`.
///
/// `rem_euclid` can round up to exactly `TAU` for tiny negative inputs,
/// so that case is folded back to zero to keep the half-open range.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

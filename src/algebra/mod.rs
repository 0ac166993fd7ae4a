//! Dense matrix and vector primitives.
//!
//! Everything in the solver stack is built on these two types. They are
//! deliberately simple: row-major storage, shape checks on every binary
//! operation, and no in-place arithmetic on caller data.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

pub(crate) use vector::{dot, norm_inf};

use std::f64::consts::PI;

/// Step used by [`central_difference`].
pub const DIFF_STEP: f64 = 1e-5;

/// Convert radians to degrees.
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// Convert degrees to radians.
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// First derivative of `f` at `x` by centered finite differences.
///
/// `(f(x + h) - f(x - h)) / 2h` with `h = DIFF_STEP`.
pub fn central_difference<F>(f: F, x: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + DIFF_STEP) - f(x - DIFF_STEP)) / (2.0 * DIFF_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angle_conversion() {
        assert_abs_diff_eq!(rad_to_deg(PI), 180.0);
        assert_abs_diff_eq!(deg_to_rad(90.0), PI / 2.0);
        assert_abs_diff_eq!(deg_to_rad(rad_to_deg(0.3)), 0.3, epsilon = 1e-15);
    }

    #[test]
    fn test_central_difference() {
        let d = central_difference(|x| x.sin(), 0.5);
        assert_abs_diff_eq!(d, 0.5f64.cos(), epsilon = 1e-9);

        let d = central_difference(|x| x * x * x, 2.0);
        assert_abs_diff_eq!(d, 12.0, epsilon = 1e-8);
    }
}

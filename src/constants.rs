//! Baseline physical constants and simulation tolerances.
//!
//! ## Accuracy
//!
//! Constants marked "exact" have zero uncertainty by SI definition (2019
//! revision). Measured constants (particle masses) are provided with the
//! CODATA 2018 significant figures, suitable for beam-dynamics work. For
//! higher precision or latest values, consult NIST directly.
//!
//! ## References
//!
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)

use std::f64::consts::PI;

/// Speed of light in vacuum _c_ in meters per second (m/s).
/// Exact value by SI definition (2019): 299,792,458 m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Elementary charge _e_ in coulombs (C).
/// Exact value by 2019 SI definition: 1.602176634 × 10⁻¹⁹ C.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Proton rest mass in kilograms (kg), CODATA 2018.
pub const PROTON_MASS: f64 = 1.672_621_923_69e-27;
/// Electron rest mass in kilograms (kg), CODATA 2018.
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;
/// One gigaelectronvolt expressed in joules (J). Exact, derived from _e_.
pub const GEV: f64 = 1.602_176_634e-10;

/// Time increments below this threshold are treated as degenerate sub-steps
/// and apply no impulsive force.
pub const ZERO_TIME: f64 = 1.0e-30;
/// Distances and curvatures below this threshold are treated as zero.
pub const ZERO_DISTANCE: f64 = 1.0e-10;
/// Squared vector norms below this threshold cannot be normalized.
pub const ZERO_NORM_SQUARED: f64 = 1.0e-50;
/// Spacing in meters between consecutive entry-face sample points.
pub const ENTRY_FACE_SAMPLE_SPACING: f64 = 1.0e-3;

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn angular_frequency_matches_reference() {
        assert_relative_eq!(angular_frequency(1.0), 2.0 * PI, epsilon = 1.0e-15);
    }

    #[test]
    fn one_gev_matches_elementary_charge() {
        assert_relative_eq!(GEV, ELEMENTARY_CHARGE * 1.0e9, max_relative = 1.0e-12);
    }
}

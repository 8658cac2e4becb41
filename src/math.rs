//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::Vector3;
use thiserror::Error;

use crate::constants::ZERO_NORM_SQUARED;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors.
pub type R3 = Vector3<Scalar>;

/// Raised when a unit vector is requested from a (near-)zero vector.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("could not normalize a near-zero vector")]
pub struct NormalizationError;

/// Raised when a three-component value is indexed outside `0..=2`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("component index {0} is out of range for a three-component value")]
pub struct IndexError(
    /// The offending index.
    pub usize,
);

/// Returns the vertical axis of the laboratory frame (+z). Beamlines bend in
/// the horizontal plane orthogonal to this axis.
#[inline]
#[must_use]
pub fn vertical() -> R3 {
    R3::new(0.0, 0.0, 1.0)
}

/// Fallible and frame-building vector operations not covered by `nalgebra`.
pub trait VectorExt {
    /// Returns the unit vector along `self`, failing on a (near-)zero vector.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError`] when the squared norm is at or below
    /// [`ZERO_NORM_SQUARED`].
    fn try_unitary(&self) -> Result<R3, NormalizationError>;

    /// Returns component `index`, failing outside `0..=2`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] for any index above 2.
    fn component(&self, index: usize) -> Result<Scalar, IndexError>;

    /// Returns an arbitrary vector orthogonal to `self`, used to build a
    /// local transverse frame. The result is the zero vector only when
    /// `self` is.
    fn orthogonal(&self) -> R3;
}

impl VectorExt for R3 {
    fn try_unitary(&self) -> Result<R3, NormalizationError> {
        let norm_squared = self.norm_squared();
        if norm_squared <= ZERO_NORM_SQUARED {
            return Err(NormalizationError);
        }
        Ok(self / norm_squared.sqrt())
    }

    fn component(&self, index: usize) -> Result<Scalar, IndexError> {
        if index < 3 {
            Ok(self[index])
        } else {
            Err(IndexError(index))
        }
    }

    fn orthogonal(&self) -> R3 {
        // Zeroing the smallest component and swapping the other two keeps
        // the result well away from zero for any nonzero input.
        let (x, y, z) = (self.x.abs(), self.y.abs(), self.z.abs());
        if x <= y && x <= z {
            R3::new(0.0, -self.z, self.y)
        } else if y <= z {
            R3::new(-self.z, 0.0, self.x)
        } else {
            R3::new(-self.y, self.x, 0.0)
        }
    }
}

/// Mixed (triple) product `a · (b × c)`.
#[inline]
#[must_use]
pub fn mixed_product(a: &R3, b: &R3, c: &R3) -> Scalar {
    a.dot(&b.cross(c))
}

/// Formats a vector as `(x, y, z)` for one-line reports.
#[must_use]
pub fn format_vector(v: &R3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

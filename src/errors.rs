//! Shared error types used across submodules.
//!
//! Every violation is raised at the operation that detects it and propagates
//! to the caller untouched; the core has no retry or fallback path.

use thiserror::Error;

use crate::math::{IndexError, NormalizationError, Scalar};
use crate::particle::KinematicsError;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum BeamlineError {
    /// Wraps unit-vector normalization failures.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    /// Wraps out-of-range component access.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Wraps beamline geometry violations.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Wraps invalid construction parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Wraps relativistic kinematics domain failures.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

/// Violations of the beamline's analytic geometry.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Raised when linking two elements whose exit/entry points differ.
    #[error("could not link elements with non-matching exit/entry points")]
    MismatchedLinkPoints,
    /// Raised when the arc center of a zero-curvature element is requested.
    #[error("center of an element with zero curvature is undefined")]
    ZeroCurvatureCenter,
    /// Raised when an arc-length query leaves an open chain.
    #[error("arc length {requested} lies outside the open beamline of length {total}")]
    ArcLengthOutOfRange {
        /// Requested distance along the chain.
        requested: Scalar,
        /// Total length of the chain.
        total: Scalar,
    },
    /// Raised when an element handle does not belong to the accelerator.
    #[error("element handle {0} is out of range for this accelerator")]
    UnknownElementHandle(usize),
}

/// Invalid parameters supplied at construction time.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    /// Raised when a dipole is built with (near-)zero curvature; its purpose
    /// is to bend the path matching the configured curvature.
    #[error("dipole requires nonzero curvature")]
    StraightDipole,
    /// Raised when an element's chamber radius is not positive.
    #[error("chamber radius must be positive, got {0}")]
    NonPositiveChamberRadius(Scalar),
    /// Raised when an element's entry and exit points coincide.
    #[error("entry and exit points of an element must be distinct")]
    CoincidentEndpoints,
    /// Raised when a chord is longer than the diameter of the configured arc.
    #[error("chord of length {chord} cannot be spanned by an arc of radius {radius}")]
    ChordExceedsDiameter {
        /// Straight-line distance between entry and exit.
        chord: Scalar,
        /// Bending radius 1/|curvature|.
        radius: Scalar,
    },
    /// Raised when a beam is built with a non-positive macro-particle weight.
    #[error("macro-particle weight must be positive, got {0}")]
    NonPositiveWeight(Scalar),
    /// Raised when a particle is built with a non-positive mass.
    #[error("particle mass must be positive, got {0}")]
    NonPositiveMass(Scalar),
}

//! Convenience re-exports for assembling beamline simulations.

pub use crate::accelerator::Accelerator;
pub use crate::beam::Beam;
pub use crate::constants::{
    angular_frequency, ELECTRON_MASS, ELEMENTARY_CHARGE, GEV, PROTON_MASS, SPEED_OF_LIGHT,
};
pub use crate::elements::{Element, ElementId, ElementKind, EntryFaceCircle};
pub use crate::emittance::{PlaneMoments, TransversePlane};
pub use crate::errors::{BeamlineError, ConfigurationError, GeometryError};
pub use crate::math::{
    format_vector, mixed_product, vertical, IndexError, NormalizationError, R3, Scalar, VectorExt,
};
pub use crate::particle::{KinematicsError, Particle, Rgb};
pub use crate::render::Canvas;

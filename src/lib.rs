#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants and simulation tolerances.
pub mod constants;
/// Shared mathematical utilities (vectors, frames, mixed products).
pub mod math;
/// Charged point particles and their leapfrog integration.
pub mod particle;
/// Beamline elements: geometry, fields, and chain bookkeeping.
pub mod elements;
/// Ordered element chains and the global physics step.
pub mod accelerator;
/// Macro-particle beams and ensemble statistics.
pub mod beam;
/// R.m.s. phase-space statistics for the transverse planes.
pub mod emittance;
/// Draw-trigger contract for external views.
pub mod render;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;

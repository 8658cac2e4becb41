//! Field-producing capabilities of the element variants.
//!
//! Each variant contributes a Lorentz-force law through a single dispatch
//! point; capability predicates replace the electric/magnetic subclass split
//! of a class hierarchy. Time-dependent fields receive the simulation time
//! as a value parameter, so every element observes the same global instant.

use std::fmt;

use crate::math::{vertical, R3, Scalar};
use crate::particle::Particle;

use super::Element;

/// Closed set of field-producing element variants.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// Field-free straight section.
    Straight,
    /// Bending dipole with a uniform vertical magnetic field.
    Dipole {
        /// Field amplitude B₀ in T.
        field: Scalar,
    },
    /// Quadrupole whose magnetic field grows linearly with the transverse
    /// offset from the design axis.
    Quadrupole {
        /// Field gradient b in T/m; the sign selects focusing or defocusing.
        gradient: Scalar,
    },
    /// Radiofrequency cavity with an oscillating longitudinal electric
    /// field.
    RfCavity {
        /// Field amplitude E₀ in V/m.
        amplitude: Scalar,
        /// Angular frequency ω in rad/s.
        angular_frequency: Scalar,
        /// Wave number κ in rad/m.
        wave_number: Scalar,
        /// Phase offset φ in rad.
        phase: Scalar,
    },
}

impl ElementKind {
    /// Human-readable variant name used by the textual report.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Straight => "Straight section",
            Self::Dipole { .. } => "Dipole",
            Self::Quadrupole { .. } => "Quadrupole",
            Self::RfCavity { .. } => "Radiofrequency cavity",
        }
    }

    pub(crate) fn print_parameters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight => Ok(()),
            Self::Dipole { field } => write!(f, "\n   Magnetic amplitude: B_0 = {field}"),
            Self::Quadrupole { gradient } => {
                write!(f, "\n   Quadrupole gradient: b = {gradient}")
            }
            Self::RfCavity {
                amplitude,
                angular_frequency,
                wave_number,
                phase,
            } => write!(
                f,
                "\n   Electric amplitude: E_0 = {amplitude}\
                 \n   Angular frequency: omega = {angular_frequency}\
                 \n   Wave number: kappa = {wave_number}\
                 \n   Phase: phi = {phase}"
            ),
        }
    }
}

impl Element {
    /// True iff this element sources a magnetic field.
    #[must_use]
    pub const fn has_magnetic_field(&self) -> bool {
        matches!(
            self.kind(),
            ElementKind::Dipole { .. } | ElementKind::Quadrupole { .. }
        )
    }

    /// True iff this element sources an electric field.
    #[must_use]
    pub const fn has_electric_field(&self) -> bool {
        matches!(self.kind(), ElementKind::RfCavity { .. })
    }

    /// Magnetic field at `position`, when this element sources one.
    ///
    /// Dipole: a uniform vertical field of fixed amplitude. Quadrupole:
    /// `b · (z·u + (r·u)·e_z)` with `u` the horizontal transverse axis and
    /// `r` the offset from the entry point, linear in the transverse
    /// displacement from the design axis.
    #[must_use]
    pub fn magnetic_field(&self, position: &R3) -> Option<R3> {
        match *self.kind() {
            ElementKind::Dipole { field } => Some(field * vertical()),
            ElementKind::Quadrupole { gradient } => {
                let u = vertical().cross(&self.unit_direction());
                let r = self.relative_coords(position);
                Some(gradient * (r.z * u + r.dot(&u) * vertical()))
            }
            ElementKind::Straight | ElementKind::RfCavity { .. } => None,
        }
    }

    /// Electric field at `position` and simulation time `time`, when this
    /// element sources one.
    ///
    /// RF cavity: `E₀ · sin(ωt − κs + φ)` directed along the local design
    /// trajectory at the particle's curvilinear position `s`.
    #[must_use]
    pub fn electric_field(&self, position: &R3, time: Scalar) -> Option<R3> {
        match *self.kind() {
            ElementKind::RfCavity {
                amplitude,
                angular_frequency,
                wave_number,
                phase,
            } => {
                let s = self.curvilinear_coord(position);
                let oscillation = (angular_frequency * time - wave_number * s + phase).sin();
                Some(amplitude * oscillation * self.trajectory_direction(s))
            }
            ElementKind::Straight
            | ElementKind::Dipole { .. }
            | ElementKind::Quadrupole { .. } => None,
        }
    }

    /// Accumulates this element's Lorentz-force contribution onto a resident
    /// particle. A no-op for field-free sections.
    pub fn add_lorentz_force(&self, particle: &mut Particle, time: Scalar, dt: Scalar) {
        let position = particle.position();
        if let Some(b) = self.magnetic_field(&position) {
            particle.add_magnetic_force(&b, dt);
        }
        if let Some(e) = self.electric_field(&position, time) {
            particle.add_electric_force(&e);
        }
    }
}

//! Beamline elements: chamber geometry, field sources, and chain bookkeeping.
//!
//! An [`Element`] is one geometric segment of the beamline with an entry and
//! an exit face, a vacuum-chamber radius, a signed curvature (zero for a
//! straight chord), and a tagged [`ElementKind`] that contributes the
//! segment's Lorentz-force law. Elements exclusively own the particles
//! currently inside them; neighbor relations are navigational
//! [`ElementId`] handles resolved by the owning
//! [`Accelerator`](crate::accelerator::Accelerator).

mod field;
mod geometry;

use std::fmt;

pub use field::ElementKind;
pub use geometry::EntryFaceCircle;

use crate::constants::ZERO_DISTANCE;
use crate::errors::{ConfigurationError, GeometryError};
use crate::math::{format_vector, R3, Scalar};
use crate::particle::Particle;

/// Handle addressing an element inside an accelerator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Position of the element in beam-travel order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One segment of the beamline.
#[derive(Debug, Clone)]
pub struct Element {
    entry: R3,
    exit: R3,
    chamber_radius: Scalar,
    curvature: Scalar,
    kind: ElementKind,
    pub(crate) successor: Option<ElementId>,
    pub(crate) predecessor: Option<ElementId>,
    pub(crate) particles: Vec<Particle>,
}

impl Element {
    fn validated(
        entry: R3,
        exit: R3,
        chamber_radius: Scalar,
        curvature: Scalar,
        kind: ElementKind,
    ) -> Result<Self, ConfigurationError> {
        if chamber_radius <= 0.0 {
            return Err(ConfigurationError::NonPositiveChamberRadius(chamber_radius));
        }
        let chord = (exit - entry).norm();
        if chord <= ZERO_DISTANCE {
            return Err(ConfigurationError::CoincidentEndpoints);
        }
        if curvature.abs() > ZERO_DISTANCE && curvature * curvature * chord * chord / 4.0 > 1.0 {
            return Err(ConfigurationError::ChordExceedsDiameter {
                chord,
                radius: 1.0 / curvature.abs(),
            });
        }
        Ok(Self {
            entry,
            exit,
            chamber_radius,
            curvature,
            kind,
            successor: None,
            predecessor: None,
            particles: Vec::new(),
        })
    }

    /// Creates a field-free straight section.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a non-positive chamber radius or
    /// coincident endpoints.
    pub fn straight(entry: R3, exit: R3, chamber_radius: Scalar) -> Result<Self, ConfigurationError> {
        Self::validated(entry, exit, chamber_radius, 0.0, ElementKind::Straight)
    }

    /// Creates a bending dipole with a uniform vertical magnetic field of
    /// amplitude `field` (T).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::StraightDipole`] on (near-)zero
    /// curvature, or the shared shape validation errors.
    pub fn dipole(
        entry: R3,
        exit: R3,
        chamber_radius: Scalar,
        curvature: Scalar,
        field: Scalar,
    ) -> Result<Self, ConfigurationError> {
        if curvature.abs() <= ZERO_DISTANCE {
            return Err(ConfigurationError::StraightDipole);
        }
        Self::validated(entry, exit, chamber_radius, curvature, ElementKind::Dipole { field })
    }

    /// Creates a focusing/defocusing quadrupole with the given field
    /// gradient (T/m). Quadrupoles are always straight.
    ///
    /// # Errors
    ///
    /// Returns the shared shape validation errors.
    pub fn quadrupole(
        entry: R3,
        exit: R3,
        chamber_radius: Scalar,
        gradient: Scalar,
    ) -> Result<Self, ConfigurationError> {
        Self::validated(entry, exit, chamber_radius, 0.0, ElementKind::Quadrupole { gradient })
    }

    /// Creates a radiofrequency cavity with an oscillating longitudinal
    /// electric field `amplitude · sin(ωt − κs + φ)`, usable on a straight
    /// or curved chord.
    ///
    /// # Errors
    ///
    /// Returns the shared shape validation errors.
    #[allow(clippy::too_many_arguments)]
    pub fn rf_cavity(
        entry: R3,
        exit: R3,
        chamber_radius: Scalar,
        curvature: Scalar,
        amplitude: Scalar,
        angular_frequency: Scalar,
        wave_number: Scalar,
        phase: Scalar,
    ) -> Result<Self, ConfigurationError> {
        Self::validated(
            entry,
            exit,
            chamber_radius,
            curvature,
            ElementKind::RfCavity {
                amplitude,
                angular_frequency,
                wave_number,
                phase,
            },
        )
    }

    /// Entry point of the segment.
    #[must_use]
    pub const fn entry_point(&self) -> R3 {
        self.entry
    }

    /// Exit point of the segment.
    #[must_use]
    pub const fn exit_point(&self) -> R3 {
        self.exit
    }

    /// Vacuum-chamber radius in m.
    #[must_use]
    pub const fn chamber_radius(&self) -> Scalar {
        self.chamber_radius
    }

    /// Signed curvature of the design path in 1/m; zero means straight.
    #[must_use]
    pub const fn curvature(&self) -> Scalar {
        self.curvature
    }

    /// Field-producing variant of this element.
    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Handle of the next element in beam-travel order, when linked.
    #[must_use]
    pub const fn successor(&self) -> Option<ElementId> {
        self.successor
    }

    /// Handle of the previous element in beam-travel order, when linked.
    #[must_use]
    pub const fn predecessor(&self) -> Option<ElementId> {
        self.predecessor
    }

    /// Particles currently resident in this segment.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of resident particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Moves a particle into this element's container.
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Checks the structural link precondition against a candidate
    /// successor: this element's exit point must equal the next element's
    /// entry point exactly.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MismatchedLinkPoints`] on any difference.
    pub fn check_link(&self, next: &Self) -> Result<(), GeometryError> {
        if self.exit != next.entry {
            return Err(GeometryError::MismatchedLinkPoints);
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.kind.label())?;
        writeln!(f, "   Entry point: {}", format_vector(&self.entry))?;
        writeln!(f, "   Exit point: {}", format_vector(&self.exit))?;
        writeln!(f, "   Chamber radius: {}", self.chamber_radius)?;
        write!(f, "   Curvature: {}", self.curvature)?;
        if let Ok(center) = self.center() {
            write!(f, "\n   Center of curvature: {}", format_vector(&center))?;
        }
        self.kind.print_parameters(f)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn straight_section_validates_shape() {
        let entry = R3::new(3.0, 2.0, 0.0);
        let exit = R3::new(3.0, -2.0, 0.0);
        assert_eq!(
            Element::straight(entry, exit, 0.0).unwrap_err(),
            ConfigurationError::NonPositiveChamberRadius(0.0)
        );
        assert_eq!(
            Element::straight(entry, entry, 0.2).unwrap_err(),
            ConfigurationError::CoincidentEndpoints
        );
        let e = Element::straight(entry, exit, 0.2).expect("valid section");
        assert!(e.is_straight());
        assert_relative_eq!(e.length(), 4.0);
    }

    #[test]
    fn dipole_requires_nonzero_curvature() {
        let entry = R3::new(3.0, -2.0, 0.0);
        let exit = R3::new(2.0, -3.0, 0.0);
        assert_eq!(
            Element::dipole(entry, exit, 0.2, 0.0, 5.0).unwrap_err(),
            ConfigurationError::StraightDipole
        );
        let d = Element::dipole(entry, exit, 0.2, 1.0, 5.0).expect("valid dipole");
        assert!(!d.is_straight());
    }

    #[test]
    fn arc_must_span_its_chord() {
        let entry = R3::new(0.0, 1.0, 0.0);
        let exit = R3::new(4.0, 1.0, 0.0);
        // chord 4 m, bending radius 1 m: impossible arc
        assert!(matches!(
            Element::dipole(entry, exit, 0.2, 1.0, 5.0),
            Err(ConfigurationError::ChordExceedsDiameter { .. })
        ));
    }

    #[test]
    fn link_check_requires_exact_point_match() {
        let a = Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, 0.0, 0.0), 0.2)
            .expect("valid section");
        let b = Element::straight(R3::new(3.0, 0.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
            .expect("valid section");
        let c = Element::straight(R3::new(3.0, 1.0e-9, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
            .expect("valid section");
        assert!(a.check_link(&b).is_ok());
        assert_eq!(a.check_link(&c), Err(GeometryError::MismatchedLinkPoints));
    }

    #[test]
    fn report_mentions_variant_and_geometry() {
        let d = Element::dipole(
            R3::new(3.0, -2.0, 0.0),
            R3::new(2.0, -3.0, 0.0),
            0.2,
            1.0,
            5.0,
        )
        .expect("valid dipole");
        let report = d.to_string();
        assert!(report.starts_with("Dipole:"));
        assert!(report.contains("Entry point: (3, -2, 0)"));
        assert!(report.contains("Center of curvature:"));
        assert!(report.contains("Magnetic amplitude: B_0 = 5"));
    }
}

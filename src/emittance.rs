//! R.m.s. phase-space statistics for the transverse beam planes.
//!
//! Kept separate from the aggregate means in [`crate::beam`]: these
//! statistics characterize the spread of the ensemble in position-slope
//! phase space per transverse plane. The definitions are purely statistical
//! second moments; no lattice transport model is assumed.
//!
//! For a plane with offsets x and slopes x' = v_transverse / v_longitudinal,
//! the r.m.s. emittance is ε = √(⟨x²⟩⟨x'²⟩ − ⟨xx'⟩²) over central moments,
//! and the matched ellipse γ̂x² + 2α̂xx' + β̂x'² = ε satisfies β̂γ̂ − α̂² = 1.

use crate::accelerator::Accelerator;
use crate::beam::Beam;
use crate::math::Scalar;

/// Transverse planes of the local curvilinear frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransversePlane {
    /// Horizontal offsets along the local transverse axis.
    Radial,
    /// Vertical offsets along the laboratory vertical axis.
    Vertical,
}

/// Central second moments of one transverse phase-space plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMoments {
    /// Mean offset ⟨x⟩ in m.
    pub mean_offset: Scalar,
    /// Mean slope ⟨x'⟩ (dimensionless).
    pub mean_slope: Scalar,
    /// Central moment ⟨(x − ⟨x⟩)²⟩.
    pub offset_variance: Scalar,
    /// Central moment ⟨(x' − ⟨x'⟩)²⟩.
    pub slope_variance: Scalar,
    /// Central moment ⟨(x − ⟨x⟩)(x' − ⟨x'⟩)⟩.
    pub covariance: Scalar,
    /// Number of live particles with a well-defined slope.
    pub count: usize,
}

impl PlaneMoments {
    /// Accumulates the plane's moments over every live particle in the
    /// habitat. Particles moving transversely to the design path (no
    /// longitudinal velocity component) carry no slope and are skipped.
    #[must_use]
    pub fn collect(habitat: &Accelerator, plane: TransversePlane) -> Self {
        let mut samples: Vec<(Scalar, Scalar)> = Vec::new();
        for element in habitat.elements() {
            for particle in element.particles() {
                let position = particle.position();
                let local = element.local_coords(&position);
                let (u, v, t) = element.local_frame(&position);
                let longitudinal = particle.velocity().dot(&t);
                if longitudinal.abs() <= Scalar::EPSILON {
                    continue;
                }
                let (offset, transverse) = match plane {
                    TransversePlane::Radial => (local.x, particle.velocity().dot(&u)),
                    TransversePlane::Vertical => (local.y, particle.velocity().dot(&v)),
                };
                samples.push((offset, transverse / longitudinal));
            }
        }

        let count = samples.len();
        if count == 0 {
            return Self {
                mean_offset: 0.0,
                mean_slope: 0.0,
                offset_variance: 0.0,
                slope_variance: 0.0,
                covariance: 0.0,
                count: 0,
            };
        }
        let n = count as Scalar;
        let mean_offset = samples.iter().map(|(x, _)| x).sum::<Scalar>() / n;
        let mean_slope = samples.iter().map(|(_, xp)| xp).sum::<Scalar>() / n;
        let mut offset_variance = 0.0;
        let mut slope_variance = 0.0;
        let mut covariance = 0.0;
        for (x, xp) in samples {
            let dx = x - mean_offset;
            let dxp = xp - mean_slope;
            offset_variance += dx * dx;
            slope_variance += dxp * dxp;
            covariance += dx * dxp;
        }
        Self {
            mean_offset,
            mean_slope,
            offset_variance: offset_variance / n,
            slope_variance: slope_variance / n,
            covariance: covariance / n,
            count,
        }
    }

    /// R.m.s. emittance ε = √(⟨x²⟩⟨x'²⟩ − ⟨xx'⟩²) of the plane, in m·rad.
    #[must_use]
    pub fn emittance(&self) -> Scalar {
        (self.offset_variance * self.slope_variance - self.covariance * self.covariance)
            .max(0.0)
            .sqrt()
    }

    /// Ellipse coefficients `(gamma, alpha, beta)` of the matched phase-space
    /// ellipse γ̂x² + 2α̂xx' + β̂x'² = ε, or `None` when the emittance
    /// vanishes and the ellipse degenerates.
    #[must_use]
    pub fn ellipse_coefficients(&self) -> Option<[Scalar; 3]> {
        let emittance = self.emittance();
        if emittance <= 0.0 {
            return None;
        }
        Some([
            self.slope_variance / emittance,
            -self.covariance / emittance,
            self.offset_variance / emittance,
        ])
    }
}

impl Beam {
    /// R.m.s. emittance of the radial (horizontal transverse) plane.
    #[must_use]
    pub fn radial_emittance(&self, habitat: &Accelerator) -> Scalar {
        PlaneMoments::collect(habitat, TransversePlane::Radial).emittance()
    }

    /// R.m.s. emittance of the vertical plane.
    #[must_use]
    pub fn vertical_emittance(&self, habitat: &Accelerator) -> Scalar {
        PlaneMoments::collect(habitat, TransversePlane::Vertical).emittance()
    }

    /// Matched-ellipse coefficients of the radial plane, when defined.
    #[must_use]
    pub fn radial_ellipse_coefficients(&self, habitat: &Accelerator) -> Option<[Scalar; 3]> {
        PlaneMoments::collect(habitat, TransversePlane::Radial).ellipse_coefficients()
    }

    /// Matched-ellipse coefficients of the vertical plane, when defined.
    #[must_use]
    pub fn vertical_ellipse_coefficients(&self, habitat: &Accelerator) -> Option<[Scalar; 3]> {
        PlaneMoments::collect(habitat, TransversePlane::Vertical).ellipse_coefficients()
    }
}

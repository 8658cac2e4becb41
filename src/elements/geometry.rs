//! Analytic geometry of beamline segments: arc frames, curvilinear
//! coordinates, boundary planes, and chamber-wall collision tests.
//!
//! Curved elements are circular arcs in the horizontal plane, bending about
//! the vertical axis. Boundary-plane orientation follows beamlines that
//! travel clockwise when viewed from +z, matching the reference ring layout.

use std::f64::consts::TAU;

use nalgebra::Rotation3;

use crate::constants::{ENTRY_FACE_SAMPLE_SPACING, ZERO_DISTANCE};
use crate::errors::GeometryError;
use crate::math::{mixed_product, vertical, R3, Scalar, VectorExt};

use super::Element;

fn horizontal(v: R3) -> R3 {
    R3::new(v.x, v.y, 0.0)
}

impl Element {
    /// True iff the design path is a straight chord (|curvature| below the
    /// zero-distance tolerance).
    #[must_use]
    pub fn is_straight(&self) -> bool {
        self.curvature().abs() <= ZERO_DISTANCE
    }

    /// Chord vector from entry to exit.
    #[must_use]
    pub fn direction(&self) -> R3 {
        self.exit_point() - self.entry_point()
    }

    /// Unit vector along the chord. Well-defined because construction
    /// rejects coincident endpoints.
    #[must_use]
    pub fn unit_direction(&self) -> R3 {
        let d = self.direction();
        d / d.norm()
    }

    /// Straight-line chord length between entry and exit. For curved
    /// elements this is the chord, not the arc length; see
    /// [`Element::arc_length`].
    #[must_use]
    pub fn length(&self) -> Scalar {
        self.direction().norm()
    }

    /// True path length of the design trajectory: the chord for straight
    /// elements, the minor-arc length otherwise.
    #[must_use]
    pub fn arc_length(&self) -> Scalar {
        if self.is_straight() {
            return self.length();
        }
        let half_chord = 0.5 * self.curvature().abs() * self.length();
        2.0 / self.curvature().abs() * half_chord.asin()
    }

    /// Bending radius 1/|curvature| of a curved element.
    fn bend_radius(&self) -> Scalar {
        1.0 / self.curvature().abs()
    }

    /// Center of the circular arc, derived from the chord midpoint offset
    /// perpendicular to the chord by the sagitta complement.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroCurvatureCenter`] on a straight element.
    pub fn center(&self) -> Result<R3, GeometryError> {
        if self.is_straight() {
            return Err(GeometryError::ZeroCurvatureCenter);
        }
        let k = self.curvature();
        let chord2 = self.direction().norm_squared();
        let offset = (1.0 / k) * (1.0 - k * k * chord2 / 4.0).max(0.0).sqrt();
        Ok(0.5 * (self.entry_point() + self.exit_point())
            + offset * self.unit_direction().cross(&vertical()))
    }

    /// Rotation sense of travel about the arc center: +1 counterclockwise
    /// (about +z), -1 clockwise. Arcs span at most a half turn, so the sense
    /// follows from the entry and exit rays.
    fn bend_orientation(&self, center: &R3) -> Scalar {
        let e = horizontal(self.entry_point() - center);
        let x = horizontal(self.exit_point() - center);
        if mixed_product(&vertical(), &e, &x) >= 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// World coordinates of `x` relative to the entry point.
    #[must_use]
    pub fn relative_coords(&self, x: &R3) -> R3 {
        x - self.entry_point()
    }

    /// Arc-length-like coordinate of `x` along the design trajectory,
    /// measured from the entry face. Negative before the entry.
    #[must_use]
    pub fn curvilinear_coord(&self, x: &R3) -> Scalar {
        match self.center() {
            Err(_) => self.relative_coords(x).dot(&self.unit_direction()),
            Ok(center) => {
                let e = horizontal(self.entry_point() - center);
                let h = horizontal(x - center);
                let angle = mixed_product(&vertical(), &e, &h).atan2(e.dot(&h));
                self.bend_radius() * self.bend_orientation(&center) * angle
            }
        }
    }

    /// World position on the design trajectory at arc-length `s` from the
    /// entry face.
    #[must_use]
    pub fn inverse_curvilinear_coord(&self, s: Scalar) -> R3 {
        match self.center() {
            Err(_) => self.entry_point() + s * self.unit_direction(),
            Ok(center) => {
                let e = horizontal(self.entry_point() - center);
                let angle = self.bend_orientation(&center) * s / self.bend_radius();
                let rotation = Rotation3::from_axis_angle(&R3::z_axis(), angle);
                center + rotation * e + R3::new(0.0, 0.0, self.entry_point().z - center.z)
            }
        }
    }

    /// Unit tangent of the design trajectory at arc-length `s`.
    #[must_use]
    pub fn trajectory_direction(&self, s: Scalar) -> R3 {
        match self.center() {
            Err(_) => self.unit_direction(),
            Ok(center) => {
                let sense = self.bend_orientation(&center);
                let radial = horizontal(self.inverse_curvilinear_coord(s) - center);
                match radial.try_unitary() {
                    Ok(radial) => sense * vertical().cross(&radial),
                    Err(_) => self.unit_direction(),
                }
            }
        }
    }

    /// Right-handed local frame `(transverse, vertical, longitudinal)` at
    /// the curvilinear location of `x`. The transverse axis is `e_z × t`,
    /// pointing outward for clockwise rings.
    #[must_use]
    pub fn local_frame(&self, x: &R3) -> (R3, R3, R3) {
        let tangent = if self.is_straight() {
            self.unit_direction()
        } else {
            self.trajectory_direction(self.curvilinear_coord(x))
        };
        (vertical().cross(&tangent), vertical(), tangent)
    }

    /// Coordinates of `x` in the element's local curvilinear frame:
    /// `(transverse offset, vertical offset, arc length)`.
    #[must_use]
    pub fn local_coords(&self, x: &R3) -> R3 {
        let s = self.curvilinear_coord(x);
        let vertical_offset = x.z - self.entry_point().z;
        let transverse = match self.center() {
            Err(_) => {
                let (u, _, _) = self.local_frame(x);
                self.relative_coords(x).dot(&u)
            }
            Ok(center) => {
                let h = horizontal(x - center);
                let (u, _, _) = self.local_frame(x);
                match h.try_unitary() {
                    Ok(outward) => (h - self.bend_radius() * outward).dot(&u),
                    Err(_) => -self.bend_radius(),
                }
            }
        };
        R3::new(transverse, vertical_offset, s)
    }

    /// Wall-loss detector: true iff `x` has left the vacuum chamber.
    ///
    /// Straight elements test the transverse distance from the chord axis
    /// against the chamber radius (a cylinder); curved elements test the
    /// distance from the design circle (a torus).
    #[must_use]
    pub fn has_collided(&self, x: &R3) -> bool {
        let radius2 = self.chamber_radius() * self.chamber_radius();
        match self.center() {
            Err(_) => {
                let r = self.relative_coords(x);
                let d = self.unit_direction();
                (r - r.dot(&d) * d).norm_squared() >= radius2
            }
            Ok(center) => {
                let h = horizontal(x - center);
                let ring_offset = h.norm() - self.bend_radius();
                let vertical_offset = x.z - center.z;
                ring_offset * ring_offset + vertical_offset * vertical_offset >= radius2
            }
        }
    }

    /// True iff `x` lies past the exit boundary plane, spanned by the
    /// vertical axis and the exit point.
    #[must_use]
    pub fn is_after(&self, x: &R3) -> bool {
        mixed_product(&vertical(), x, &self.exit_point()) >= 0.0
    }

    /// True iff `x` has not yet reached the entry boundary plane, spanned by
    /// the vertical axis and the entry point.
    #[must_use]
    pub fn is_before(&self, x: &R3) -> bool {
        mixed_product(&vertical(), x, &self.entry_point()) < 0.0
    }

    /// True iff `x` lies between the entry and exit boundary planes.
    #[must_use]
    pub fn contains(&self, x: &R3) -> bool {
        !self.is_before(x) && !self.is_after(x)
    }

    /// Lazy, finite, restartable sequence of points evenly distributed on
    /// the entry-face circle of the vacuum chamber. Visualization support;
    /// not used by the physics step.
    #[must_use]
    pub fn sample_points(&self) -> EntryFaceCircle {
        let direction = self.unit_direction();
        let v = self.entry_face_axis(&direction);
        let u = direction.cross(&v);
        let count = (TAU * self.chamber_radius() / ENTRY_FACE_SAMPLE_SPACING).ceil() as usize;
        EntryFaceCircle {
            entry: self.entry_point(),
            u,
            v,
            radius: self.chamber_radius(),
            count: count.max(1),
            index: 0,
        }
    }

    fn entry_face_axis(&self, direction: &R3) -> R3 {
        let v = direction.orthogonal();
        v / v.norm()
    }
}

/// Iterator over evenly spaced points on an element's entry-face circle.
///
/// Cloning restarts the sequence from the first point.
#[derive(Debug, Clone)]
pub struct EntryFaceCircle {
    entry: R3,
    u: R3,
    v: R3,
    radius: Scalar,
    count: usize,
    index: usize,
}

impl Iterator for EntryFaceCircle {
    type Item = R3;

    fn next(&mut self) -> Option<R3> {
        if self.index >= self.count {
            return None;
        }
        let theta = TAU * self.index as Scalar / self.count as Scalar;
        self.index += 1;
        Some(self.entry + self.radius * (theta.sin() * self.u + theta.cos() * self.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntryFaceCircle {}

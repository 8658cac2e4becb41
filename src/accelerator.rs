//! Ordered element chains and the global physics step.
//!
//! The accelerator owns an arena of [`Element`]s addressed by [`ElementId`]
//! handles, in beam-travel order. One [`Accelerator::evolve`] call drives a
//! single left-to-right sweep: every element integrates its residents, drops
//! wall losses, and stages boundary crossings. Staged hand-offs merge after
//! the sweep, so a transferred particle is integrated on the next tick,
//! never twice within one.

use std::fmt;
use std::mem;

use crate::elements::{Element, ElementId};
use crate::errors::GeometryError;
use crate::math::{R3, Scalar};
use crate::particle::Particle;

/// An ordered composition of beamline elements.
#[derive(Debug, Clone, Default)]
pub struct Accelerator {
    elements: Vec<Element>,
    pending: Vec<Particle>,
    time: Scalar,
    lost: usize,
    escaped: usize,
}

impl Accelerator {
    /// Creates an empty beamline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element without linking it; returns its handle.
    pub fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Appends an element and links it to the previous one, when any.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MismatchedLinkPoints`] when the previous
    /// element's exit point differs from this element's entry point; the
    /// element is not inserted.
    pub fn append(&mut self, element: Element) -> Result<ElementId, GeometryError> {
        if let Some(last) = self.elements.last() {
            last.check_link(&element)?;
        }
        let id = self.push(element);
        if id.0 > 0 {
            let previous = ElementId(id.0 - 1);
            self.elements[previous.0].successor = Some(id);
            self.elements[id.0].predecessor = Some(previous);
        }
        Ok(id)
    }

    /// Links `from` to `to` as successor/predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownElementHandle`] for a foreign handle
    /// and [`GeometryError::MismatchedLinkPoints`] unless `from`'s exit
    /// point exactly equals `to`'s entry point; on failure both elements
    /// keep their previous links.
    pub fn link(&mut self, from: ElementId, to: ElementId) -> Result<(), GeometryError> {
        for id in [from, to] {
            if id.0 >= self.elements.len() {
                return Err(GeometryError::UnknownElementHandle(id.0));
            }
        }
        self.elements[from.0].check_link(&self.elements[to.0])?;
        self.elements[from.0].successor = Some(to);
        self.elements[to.0].predecessor = Some(from);
        Ok(())
    }

    /// Closes the chain into a ring by linking the last element back to the
    /// first.
    ///
    /// # Errors
    ///
    /// Propagates the [`Accelerator::link`] failures; a no-op on an empty
    /// beamline.
    pub fn close_ring(&mut self) -> Result<(), GeometryError> {
        if self.elements.is_empty() {
            return Ok(());
        }
        self.link(ElementId(self.elements.len() - 1), ElementId(0))
    }

    /// Elements in beam-travel order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Resolves an element handle.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// True iff the chain is closed into a ring.
    #[must_use]
    pub fn is_ring(&self) -> bool {
        match (self.elements.first(), self.elements.last()) {
            (Some(_), Some(last)) => last.successor == Some(ElementId(0)),
            _ => false,
        }
    }

    /// Simulation time in s, advanced once per [`Accelerator::evolve`].
    #[must_use]
    pub const fn time(&self) -> Scalar {
        self.time
    }

    /// Total design-path length of the chain in m.
    #[must_use]
    pub fn total_length(&self) -> Scalar {
        self.elements.iter().map(Element::arc_length).sum()
    }

    /// Particles currently resident in some element.
    #[must_use]
    pub fn live_particle_count(&self) -> usize {
        self.elements.iter().map(Element::particle_count).sum()
    }

    /// Particles lost to a chamber wall so far.
    #[must_use]
    pub const fn lost_count(&self) -> usize {
        self.lost
    }

    /// Particles that left an open chain through its last exit face.
    #[must_use]
    pub const fn escaped_count(&self) -> usize {
        self.escaped
    }

    /// Places a particle into the element containing it, or onto the
    /// pending list when no element claims it yet. Pending particles are
    /// retried at the start of every tick.
    pub fn inject(&mut self, particle: Particle) {
        let position = particle.position();
        match self
            .elements
            .iter_mut()
            .find(|element| element.contains(&position))
        {
            Some(element) => element.add_particle(particle),
            None => self.pending.push(particle),
        }
    }

    /// Advances the whole beamline by one step of `dt` seconds.
    ///
    /// Per resident particle, in order: clear the force accumulator, apply
    /// the element's Lorentz contribution at the current global time,
    /// integrate, drop on wall collision, and stage the hand-off when the
    /// particle crossed the exit boundary. A crossing with no successor
    /// drops the particle as escaped.
    pub fn evolve(&mut self, dt: Scalar) {
        let pending = mem::take(&mut self.pending);
        for particle in pending {
            self.inject(particle);
        }

        let time = self.time;
        let mut transfers: Vec<(ElementId, Particle)> = Vec::new();
        for index in 0..self.elements.len() {
            let mut residents = mem::take(&mut self.elements[index].particles);
            let successor = self.elements[index].successor;
            for mut particle in residents.drain(..) {
                particle.clear_force();
                self.elements[index].add_lorentz_force(&mut particle, time, dt);
                particle.evolve(dt);

                let position = particle.position();
                if self.elements[index].has_collided(&position) {
                    self.lost += 1;
                    continue;
                }
                if self.elements[index].is_after(&position) {
                    match successor {
                        Some(next) => transfers.push((next, particle)),
                        None => self.escaped += 1,
                    }
                    continue;
                }
                self.elements[index].particles.push(particle);
            }
        }
        for (target, particle) in transfers {
            self.elements[target.0].particles.push(particle);
        }
        self.time += dt;
    }

    /// World position and local trajectory direction at `arc_length` meters
    /// along the chain. Closed rings wrap the distance around; open chains
    /// reject distances outside `[0, total_length]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ArcLengthOutOfRange`] for an out-of-range
    /// distance on an open chain, or for an empty beamline.
    pub fn position_and_trajectory(&self, arc_length: Scalar) -> Result<(R3, R3), GeometryError> {
        let total = self.total_length();
        let out_of_range = GeometryError::ArcLengthOutOfRange {
            requested: arc_length,
            total,
        };
        if total <= 0.0 {
            return Err(out_of_range);
        }
        let mut s = if self.is_ring() {
            arc_length.rem_euclid(total)
        } else if (0.0..=total).contains(&arc_length) {
            arc_length
        } else {
            return Err(out_of_range);
        };

        for element in &self.elements {
            let length = element.arc_length();
            if s <= length {
                return Ok((
                    element.inverse_curvilinear_coord(s),
                    element.trajectory_direction(s),
                ));
            }
            s -= length;
        }
        // numerically spilled past the last face
        match self.elements.last() {
            Some(last) => {
                let length = last.arc_length();
                Ok((
                    last.inverse_curvilinear_coord(length),
                    last.trajectory_direction(length),
                ))
            }
            None => Err(out_of_range),
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accelerator with {} element(s):", self.elements.len())?;
        for (index, element) in self.elements.iter().enumerate() {
            writeln!(f, "Element {index}:")?;
            writeln!(f, "{element}")?;
        }
        write!(
            f,
            "Live particles: {} (lost {}, escaped {})",
            self.live_particle_count(),
            self.lost,
            self.escaped
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    use crate::particle::Rgb;

    use super::*;

    /// Unit-circle ring of four quarter-arc dipoles, traversed clockwise.
    fn unit_ring() -> Accelerator {
        let corners = [
            R3::new(0.0, 1.0, 0.0),
            R3::new(1.0, 0.0, 0.0),
            R3::new(0.0, -1.0, 0.0),
            R3::new(-1.0, 0.0, 0.0),
        ];
        let mut ring = Accelerator::new();
        for i in 0..4 {
            let entry = corners[i];
            let exit = corners[(i + 1) % 4];
            ring.append(Element::dipole(entry, exit, 0.2, 1.0, 5.0).expect("valid dipole"))
                .expect("matching corners");
        }
        ring.close_ring().expect("closed ring");
        ring
    }

    fn drifting(position: R3, velocity: R3) -> Particle {
        Particle::new(position, velocity, 1.0, 0.0, 0.05, Rgb::WHITE).expect("positive mass")
    }

    #[test]
    fn append_rejects_mismatched_points_and_links_matches() {
        let mut line = Accelerator::new();
        let a = line
            .append(
                Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, 0.0, 0.0), 0.2)
                    .expect("valid section"),
            )
            .expect("first element");
        let mismatch = Element::straight(R3::new(3.0, 0.5, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
            .expect("valid section");
        assert_eq!(
            line.append(mismatch),
            Err(GeometryError::MismatchedLinkPoints)
        );
        assert_eq!(line.elements().len(), 1);

        let b = line
            .append(
                Element::straight(R3::new(3.0, 0.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                    .expect("valid section"),
            )
            .expect("second element");
        assert_eq!(line.element(a).and_then(Element::successor), Some(b));
        assert_eq!(line.element(b).and_then(Element::predecessor), Some(a));
    }

    #[test]
    fn explicit_link_leaves_elements_unlinked_on_failure() {
        let mut line = Accelerator::new();
        let a = line.push(
            Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, 0.0, 0.0), 0.2)
                .expect("valid section"),
        );
        let c = line.push(
            Element::straight(R3::new(3.0, -0.5, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                .expect("valid section"),
        );
        assert_eq!(line.link(a, c), Err(GeometryError::MismatchedLinkPoints));
        assert_eq!(line.element(a).and_then(Element::successor), None);
        assert_eq!(line.element(c).and_then(Element::predecessor), None);
        assert_eq!(
            line.link(a, ElementId(7)),
            Err(GeometryError::UnknownElementHandle(7))
        );
    }

    #[test]
    fn ring_closes_and_measures_its_circumference() {
        let ring = unit_ring();
        assert!(ring.is_ring());
        assert_relative_eq!(ring.total_length(), TAU, epsilon = 1.0e-12);
    }

    #[test]
    fn position_and_trajectory_walks_and_wraps_the_ring() {
        let ring = unit_ring();
        let (pos, dir) = ring.position_and_trajectory(0.0).expect("on the ring");
        assert_relative_eq!((pos - R3::new(0.0, 1.0, 0.0)).norm(), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(dir.x, 1.0, epsilon = 1.0e-12);

        // one quarter turn lands on the second corner
        let (pos, dir) = ring.position_and_trajectory(FRAC_PI_2).expect("on the ring");
        assert_relative_eq!((pos - R3::new(1.0, 0.0, 0.0)).norm(), 0.0, epsilon = 1.0e-10);
        assert_relative_eq!(dir.y, -1.0, epsilon = 1.0e-10);

        // a full turn wraps back to the start
        let (wrapped, _) = ring.position_and_trajectory(TAU + 0.25).expect("wraps");
        let (quarter, _) = ring.position_and_trajectory(0.25).expect("on the ring");
        assert_relative_eq!((wrapped - quarter).norm(), 0.0, epsilon = 1.0e-10);
    }

    #[test]
    fn open_chain_rejects_out_of_range_arc_lengths() {
        let mut line = Accelerator::new();
        line.append(
            Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                .expect("valid section"),
        )
        .expect("first element");
        assert!(line.position_and_trajectory(3.9).is_ok());
        assert!(matches!(
            line.position_and_trajectory(4.1),
            Err(GeometryError::ArcLengthOutOfRange { .. })
        ));
        assert!(matches!(
            Accelerator::new().position_and_trajectory(0.0),
            Err(GeometryError::ArcLengthOutOfRange { .. })
        ));
    }

    #[test]
    fn evolve_moves_a_free_particle_and_advances_the_clock() {
        let mut line = Accelerator::new();
        line.append(
            Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                .expect("valid section"),
        )
        .expect("first element");
        line.inject(drifting(R3::new(3.0, 1.0, 0.0), R3::new(0.0, -1.0, 0.0)));
        assert_eq!(line.live_particle_count(), 1);

        line.evolve(0.5);
        let p = &line.elements()[0].particles()[0];
        assert_relative_eq!(p.position().y, 0.5, epsilon = 1.0e-12);
        assert_relative_eq!(line.time(), 0.5);
    }

    #[test]
    fn transition_lands_in_the_successor_on_the_next_tick() {
        let mut line = Accelerator::new();
        let first = line
            .append(
                Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, 0.0, 0.0), 0.2)
                    .expect("valid section"),
            )
            .expect("first element");
        let second = line
            .append(
                Element::straight(R3::new(3.0, 0.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                    .expect("valid section"),
            )
            .expect("second element");

        line.inject(drifting(R3::new(3.0, 0.05, 0.0), R3::new(0.0, -1.0, 0.0)));
        assert_eq!(line.elements()[first.index()].particle_count(), 1);

        // tick k: the particle crosses the shared boundary plane
        line.evolve(0.1);
        assert_eq!(line.elements()[first.index()].particle_count(), 0);
        assert_eq!(line.elements()[second.index()].particle_count(), 1);
        let handed_off = &line.elements()[second.index()].particles()[0];
        assert_relative_eq!(handed_off.position().y, -0.05, epsilon = 1.0e-12);

        // tick k+1: integrated inside the successor only
        line.evolve(0.1);
        assert_eq!(line.elements()[first.index()].particle_count(), 0);
        assert_eq!(line.elements()[second.index()].particle_count(), 1);
        let p = &line.elements()[second.index()].particles()[0];
        assert_relative_eq!(p.position().y, -0.15, epsilon = 1.0e-12);
    }

    #[test]
    fn wall_collision_drops_the_particle() {
        let mut line = Accelerator::new();
        line.append(
            Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, -2.0, 0.0), 0.2)
                .expect("valid section"),
        )
        .expect("first element");
        line.inject(drifting(R3::new(3.0, 1.0, 0.0), R3::new(1.0, 0.0, 0.0)));

        line.evolve(0.5);
        assert_eq!(line.live_particle_count(), 0);
        assert_eq!(line.lost_count(), 1);
    }

    #[test]
    fn escaping_an_open_chain_is_counted() {
        let mut line = Accelerator::new();
        line.append(
            Element::straight(R3::new(3.0, 2.0, 0.0), R3::new(3.0, 0.0, 0.0), 0.2)
                .expect("valid section"),
        )
        .expect("first element");
        line.inject(drifting(R3::new(3.0, 0.05, 0.0), R3::new(0.0, -1.0, 0.0)));

        line.evolve(0.1);
        assert_eq!(line.live_particle_count(), 0);
        assert_eq!(line.escaped_count(), 1);
        assert_eq!(line.lost_count(), 0);
    }

    #[test]
    fn dipole_bends_a_matched_particle_around_the_ring() {
        use crate::constants::SPEED_OF_LIGHT;
        // non-relativistic speed; field matched so the bending radius is 1 m:
        // B = m v / (q rho)
        let speed = 1.0e-3 * SPEED_OF_LIGHT;
        let mass = 1.0;
        let charge = 1.0;
        let field = mass * speed / charge;

        let corners = [
            R3::new(0.0, 1.0, 0.0),
            R3::new(1.0, 0.0, 0.0),
            R3::new(0.0, -1.0, 0.0),
            R3::new(-1.0, 0.0, 0.0),
        ];
        let mut ring = Accelerator::new();
        for i in 0..4 {
            ring.append(
                Element::dipole(corners[i], corners[(i + 1) % 4], 0.1, 1.0, field)
                    .expect("valid dipole"),
            )
            .expect("matching corners");
        }
        ring.close_ring().expect("closed ring");

        let p = Particle::new(
            R3::new(0.0, 1.0, 0.0),
            speed * R3::new(1.0, 0.0, 0.0),
            mass,
            charge,
            0.05,
            Rgb::WHITE,
        )
        .expect("positive mass");
        ring.inject(p);

        // resolve one revolution in ten thousand steps
        let revolution = TAU / speed;
        let dt = revolution / 1.0e4;
        for _ in 0..10_000 {
            ring.evolve(dt);
        }
        assert_eq!(ring.live_particle_count(), 1);
        let survivor = ring
            .elements()
            .iter()
            .flat_map(Element::particles)
            .next()
            .expect("one live particle");
        // still riding the unit circle
        assert_relative_eq!(survivor.position().norm(), 1.0, max_relative = 5.0e-3);
        assert_relative_eq!(survivor.speed(), speed, max_relative = 1.0e-2);
    }
}

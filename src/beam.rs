//! Macro-particle beams: ensemble seeding and aggregate statistics.
//!
//! A [`Beam`] represents a large particle ensemble through N macro-particles,
//! each standing in for λ real particles. Seeding and every statistic operate
//! against a habitat [`Accelerator`] passed by reference, so the beam never
//! aliases the machine it populates.

use std::fmt;

use crate::accelerator::Accelerator;
use crate::errors::{ConfigurationError, GeometryError};
use crate::math::{R3, Scalar};
use crate::particle::{KinematicsError, Particle};

/// A macro-particle ensemble generator and statistics aggregator.
#[derive(Debug, Clone)]
pub struct Beam {
    model: Particle,
    lambda: Scalar,
    macro_count: usize,
}

impl Beam {
    /// Creates a beam of `real_count` physical particles represented by
    /// `real_count / lambda` macro-particles copied from `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonPositiveWeight`] unless `lambda > 0`.
    pub fn new(
        model: Particle,
        real_count: usize,
        lambda: Scalar,
    ) -> Result<Self, ConfigurationError> {
        if lambda <= 0.0 {
            return Err(ConfigurationError::NonPositiveWeight(lambda));
        }
        let macro_count = (real_count as Scalar / lambda) as usize;
        Ok(Self {
            model,
            lambda,
            macro_count,
        })
    }

    /// The representative particle the ensemble is copied from.
    #[must_use]
    pub const fn model_particle(&self) -> &Particle {
        &self.model
    }

    /// Macro-particle weight λ: real particles per macro-particle.
    #[must_use]
    pub const fn lambda(&self) -> Scalar {
        self.lambda
    }

    /// Number N of macro-particles this beam seeds.
    #[must_use]
    pub const fn macro_count(&self) -> usize {
        self.macro_count
    }

    /// Seeds N macro-particles evenly along a closed-ring habitat.
    ///
    /// Each seed sits at arc-length spacing L/N, moves at the model's speed
    /// along the local trajectory (against it for negative charge), and
    /// carries mass and charge scaled by λ. N = 0 seeds nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`GeometryError`] from the habitat's arc-length lookup.
    pub fn activate(&self, habitat: &mut Accelerator) -> Result<(), GeometryError> {
        if self.macro_count == 0 {
            return Ok(());
        }
        let spacing = habitat.total_length() / self.macro_count as Scalar;
        let speed = self.model.speed();
        let heading = if self.model.charge() >= 0.0 { 1.0 } else { -1.0 };
        for i in 1..=self.macro_count {
            let (position, trajectory) =
                habitat.position_and_trajectory(i as Scalar * spacing)?;
            let mut seed = self.model.clone();
            seed.set_position(position);
            seed.set_velocity(heading * speed * trajectory);
            seed.scale(self.lambda);
            habitat.inject(seed);
        }
        Ok(())
    }

    /// Mean physical energy (λ/N)·Σ E over the habitat's live particles, or
    /// 0 when the beam seeds no macro-particles.
    ///
    /// # Errors
    ///
    /// Propagates [`KinematicsError::Superluminal`] from any live particle.
    pub fn mean_energy(&self, habitat: &Accelerator) -> Result<Scalar, KinematicsError> {
        if self.macro_count == 0 {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for element in habitat.elements() {
            for particle in element.particles() {
                sum += particle.energy()?;
            }
        }
        Ok(self.lambda / self.macro_count as Scalar * sum)
    }

    /// Mean live-particle position in local frame coordinates
    /// `(transverse, vertical, 0)`, averaged over the live count; the zero
    /// vector when no particle is live.
    #[must_use]
    pub fn mean_position(&self, habitat: &Accelerator) -> R3 {
        let mut transverse = 0.0;
        let mut vertical = 0.0;
        let mut live = 0usize;
        for element in habitat.elements() {
            for particle in element.particles() {
                let local = element.local_coords(&particle.position());
                transverse += local.x;
                vertical += local.y;
                live += 1;
            }
        }
        if live == 0 {
            return R3::zeros();
        }
        R3::new(transverse, vertical, 0.0) / live as Scalar
    }

    /// Mean live-particle velocity projected on the local frames,
    /// `(transverse, vertical, 0)`; the zero vector when no particle is
    /// live.
    #[must_use]
    pub fn mean_velocity(&self, habitat: &Accelerator) -> R3 {
        let mut transverse = 0.0;
        let mut vertical = 0.0;
        let mut live = 0usize;
        for element in habitat.elements() {
            for particle in element.particles() {
                let (u, v, _) = element.local_frame(&particle.position());
                transverse += particle.velocity().dot(&u);
                vertical += particle.velocity().dot(&v);
                live += 1;
            }
        }
        if live == 0 {
            return R3::zeros();
        }
        R3::new(transverse, vertical, 0.0) / live as Scalar
    }
}

impl fmt::Display for Beam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Beam of {} macro-particle(s), weight lambda = {}",
            self.macro_count, self.lambda
        )?;
        writeln!(f, "Model particle:")?;
        write!(f, "{}", self.model)
    }
}

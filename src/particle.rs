//! Charged point particles and their leapfrog-style integration.

use std::fmt;
use std::mem;

use thiserror::Error;

use crate::constants::{SPEED_OF_LIGHT, ZERO_TIME};
use crate::errors::ConfigurationError;
use crate::math::{format_vector, IndexError, R3, Scalar};

/// Display color forwarded to the rendering collaborator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red channel in `[0, 1]`.
    pub red: Scalar,
    /// Green channel in `[0, 1]`.
    pub green: Scalar,
    /// Blue channel in `[0, 1]`.
    pub blue: Scalar,
}

impl Rgb {
    /// White, the default particle color.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from its three channels.
    #[must_use]
    pub const fn new(red: Scalar, green: Scalar, blue: Scalar) -> Self {
        Self { red, green, blue }
    }

    /// Returns channel `index` (0 = red, 1 = green, 2 = blue).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] for any index above 2.
    pub fn channel(&self, index: usize) -> Result<Scalar, IndexError> {
        match index {
            0 => Ok(self.red),
            1 => Ok(self.green),
            2 => Ok(self.blue),
            _ => Err(IndexError(index)),
        }
    }
}

/// Domain failures of relativistic kinematics queries.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum KinematicsError {
    /// Raised when a Lorentz factor is requested for a particle moving at or
    /// above the speed of light.
    #[error("particle speed {speed} m/s is at or above the speed of light")]
    Superluminal {
        /// Offending speed in m/s.
        speed: Scalar,
    },
}

/// A charged point mass carrying one integration step of state history.
///
/// The previous position/velocity pair always lags the current pair by
/// exactly one step; [`Particle::evolve`] maintains that invariant.
#[derive(Debug, Clone)]
pub struct Particle {
    position: R3,
    previous_position: R3,
    velocity: R3,
    previous_velocity: R3,
    force: R3,
    mass: Scalar,
    charge: Scalar,
    radius: Scalar,
    color: Rgb,
}

impl Particle {
    /// Creates a particle at rest history: both state pairs start equal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonPositiveMass`] when `mass <= 0`.
    pub fn new(
        position: R3,
        velocity: R3,
        mass: Scalar,
        charge: Scalar,
        radius: Scalar,
        color: Rgb,
    ) -> Result<Self, ConfigurationError> {
        if mass <= 0.0 {
            return Err(ConfigurationError::NonPositiveMass(mass));
        }
        Ok(Self {
            position,
            previous_position: position,
            velocity,
            previous_velocity: velocity,
            force: R3::zeros(),
            mass,
            charge,
            radius,
            color,
        })
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> R3 {
        self.position
    }

    /// Position one step ago.
    #[must_use]
    pub const fn previous_position(&self) -> R3 {
        self.previous_position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> R3 {
        self.velocity
    }

    /// Velocity one step ago.
    #[must_use]
    pub const fn previous_velocity(&self) -> R3 {
        self.previous_velocity
    }

    /// Force accumulated since the last [`Particle::clear_force`].
    #[must_use]
    pub const fn force(&self) -> R3 {
        self.force
    }

    /// Particle mass in kg.
    #[must_use]
    pub const fn mass(&self) -> Scalar {
        self.mass
    }

    /// Particle charge in C.
    #[must_use]
    pub const fn charge(&self) -> Scalar {
        self.charge
    }

    /// Chamber-collision radius in m.
    #[must_use]
    pub const fn radius(&self) -> Scalar {
        self.radius
    }

    /// Display color.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Moves the particle, resetting its one-step history to the new point.
    pub fn set_position(&mut self, position: R3) {
        self.position = position;
        self.previous_position = position;
    }

    /// Replaces the velocity, resetting its one-step history.
    pub fn set_velocity(&mut self, velocity: R3) {
        self.velocity = velocity;
        self.previous_velocity = velocity;
    }

    /// Current speed in m/s.
    #[must_use]
    pub fn speed(&self) -> Scalar {
        self.velocity.norm()
    }

    /// Resets the force accumulator; called once per step before the
    /// element's Lorentz contribution.
    pub fn clear_force(&mut self) {
        self.force = R3::zeros();
    }

    /// Accumulates an arbitrary force.
    pub fn add_force(&mut self, force: R3) {
        self.force += force;
    }

    /// Accumulates the magnetic part of the Lorentz force, `q · (v × B)`.
    ///
    /// Sub-steps shorter than [`ZERO_TIME`] accumulate nothing; a degenerate
    /// step must not apply a spurious impulsive kick. This is a numerical
    /// safeguard, not a physical effect.
    pub fn add_magnetic_force(&mut self, b: &R3, dt: Scalar) {
        if dt < ZERO_TIME {
            return;
        }
        self.force += self.charge * self.velocity.cross(b);
    }

    /// Accumulates the electric part of the Lorentz force, `q · E`.
    pub fn add_electric_force(&mut self, e: &R3) {
        self.force += self.charge * e;
    }

    /// Advances the particle one step with a symmetric leapfrog-style scheme.
    ///
    /// The current velocity rotates into the previous slot, the new velocity
    /// is kicked by the accumulated force, and the position then drifts along
    /// the new velocity. The caller clears the accumulator before the next
    /// step's force pass.
    pub fn evolve(&mut self, dt: Scalar) {
        mem::swap(&mut self.velocity, &mut self.previous_velocity);
        self.velocity = self.previous_velocity + (dt / self.mass) * self.force;

        mem::swap(&mut self.position, &mut self.previous_position);
        self.position = self.previous_position + dt * self.velocity;
    }

    /// Relativistic Lorentz factor γ = 1/√(1 − v²/c²).
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::Superluminal`] when the speed is at or
    /// above the speed of light, where γ leaves the real domain.
    pub fn gamma(&self) -> Result<Scalar, KinematicsError> {
        let speed = self.speed();
        if speed >= SPEED_OF_LIGHT {
            return Err(KinematicsError::Superluminal { speed });
        }
        let beta = speed / SPEED_OF_LIGHT;
        Ok(1.0 / (1.0 - beta * beta).sqrt())
    }

    /// Total relativistic energy γ·m·c² in J.
    ///
    /// # Errors
    ///
    /// Propagates [`KinematicsError::Superluminal`] from [`Particle::gamma`].
    pub fn energy(&self) -> Result<Scalar, KinematicsError> {
        Ok(self.gamma()? * self.mass * SPEED_OF_LIGHT * SPEED_OF_LIGHT)
    }

    /// Scales mass and charge by the macro-particle weight λ, so one
    /// simulated particle stands in for λ real ones.
    pub fn scale(&mut self, weight: Scalar) {
        self.mass *= weight;
        self.charge *= weight;
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   Mass: {} kg", self.mass)?;
        writeln!(f, "   Charge: {} C", self.charge)?;
        writeln!(f, "   Position: {}", format_vector(&self.position))?;
        writeln!(f, "   Velocity: {}", format_vector(&self.velocity))?;
        write!(f, "   Force: {}", format_vector(&self.force))?;
        if let (Ok(gamma), Ok(energy)) = (self.gamma(), self.energy()) {
            write!(f, "\n   Gamma: {gamma}\n   Energy: {energy} J")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::constants::PROTON_MASS;

    use super::*;

    fn coasting(velocity: R3) -> Particle {
        Particle::new(R3::zeros(), velocity, 2.0, 1.0, 0.1, Rgb::WHITE).expect("positive mass")
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let err = Particle::new(R3::zeros(), R3::zeros(), 0.0, 1.0, 0.1, Rgb::WHITE);
        assert_eq!(err.unwrap_err(), ConfigurationError::NonPositiveMass(0.0));
    }

    #[test]
    fn rgb_channel_access_is_bounds_checked() {
        let c = Rgb::new(0.2, 0.4, 0.6);
        assert_eq!(c.channel(2), Ok(0.6));
        assert_eq!(c.channel(3), Err(IndexError(3)));
    }

    #[test]
    fn evolve_without_force_is_uniform_motion() {
        let mut p = coasting(R3::new(3.0, -1.0, 0.5));
        p.evolve(0.25);
        assert_relative_eq!(p.velocity().x, 3.0);
        assert_relative_eq!(p.velocity().y, -1.0);
        assert_relative_eq!(p.position().x, 0.75, epsilon = 1.0e-12);
        assert_relative_eq!(p.position().y, -0.25, epsilon = 1.0e-12);
        assert_relative_eq!(p.position().z, 0.125, epsilon = 1.0e-12);
    }

    #[test]
    fn evolve_keeps_one_step_history() {
        let mut p = coasting(R3::new(1.0, 0.0, 0.0));
        p.add_force(R3::new(0.0, 4.0, 0.0));
        p.evolve(0.5);
        assert_relative_eq!(p.previous_velocity().y, 0.0);
        assert_relative_eq!(p.velocity().y, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(p.previous_position().norm(), 0.0);
        assert_relative_eq!(p.position().y, 0.5, epsilon = 1.0e-12);
    }

    #[test]
    fn magnetic_force_is_skipped_on_degenerate_substep() {
        let b = R3::new(0.0, 0.0, 2.0);
        let mut p = coasting(R3::new(1.0, 0.0, 0.0));
        p.add_magnetic_force(&b, 0.0);
        assert_relative_eq!(p.force().norm(), 0.0);
        p.add_magnetic_force(&b, 1.0e-6);
        // F = q v × B = 1 · (1,0,0) × (0,0,2) = (0,-2,0)
        assert_relative_eq!(p.force().y, -2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn electric_force_scales_with_charge() {
        let mut p = Particle::new(R3::zeros(), R3::zeros(), 1.0, -3.0, 0.1, Rgb::WHITE)
            .expect("positive mass");
        p.add_electric_force(&R3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p.force().x, -6.0);
    }

    #[test]
    fn gamma_matches_reference_at_half_light_speed() {
        let p = coasting(R3::new(0.5 * SPEED_OF_LIGHT, 0.0, 0.0));
        let gamma = p.gamma().expect("subluminal");
        assert_relative_eq!(gamma, 1.0 / (0.75f64).sqrt(), epsilon = 1.0e-12);
    }

    #[test]
    fn gamma_fails_at_light_speed() {
        let p = coasting(R3::new(SPEED_OF_LIGHT, 0.0, 0.0));
        assert!(matches!(
            p.gamma(),
            Err(KinematicsError::Superluminal { .. })
        ));
        assert!(p.energy().is_err());
    }

    #[test]
    fn rest_energy_matches_mc_squared() {
        let p = Particle::new(R3::zeros(), R3::zeros(), PROTON_MASS, 1.0, 0.1, Rgb::WHITE)
            .expect("positive mass");
        let energy = p.energy().expect("at rest");
        assert_relative_eq!(
            energy,
            PROTON_MASS * SPEED_OF_LIGHT * SPEED_OF_LIGHT,
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn scale_multiplies_mass_and_charge() {
        let mut p = coasting(R3::zeros());
        p.scale(10.0);
        assert_relative_eq!(p.mass(), 20.0);
        assert_relative_eq!(p.charge(), 10.0);
    }
}

//! Draw-trigger contract between the physics core and an external view.
//!
//! The core never renders. Each drawable entity exposes a single `draw`
//! hook that visits an externally supplied [`Canvas`] collaborator exactly
//! once per explicit request; the collaborator decides what, if anything,
//! to paint.

use crate::accelerator::Accelerator;
use crate::elements::Element;
use crate::particle::Particle;

/// Rendering collaborator supplied by an enclosing application.
pub trait Canvas {
    /// Draws one beamline element.
    fn draw_element(&mut self, element: &Element);
    /// Draws one particle.
    fn draw_particle(&mut self, particle: &Particle);
    /// Draws the accelerator as a whole.
    fn draw_accelerator(&mut self, accelerator: &Accelerator);
}

impl Element {
    /// Triggers a draw of this element on the supplied canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_element(self);
    }

    /// Triggers a draw of every resident particle on the supplied canvas.
    pub fn draw_particles(&self, canvas: &mut dyn Canvas) {
        for particle in self.particles() {
            particle.draw(canvas);
        }
    }
}

impl Particle {
    /// Triggers a draw of this particle on the supplied canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_particle(self);
    }
}

impl Accelerator {
    /// Triggers a draw of the whole machine on the supplied canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_accelerator(self);
    }
}

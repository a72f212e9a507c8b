use crate::bodies::Entity;
use crate::integration::Integrator;

/// Symplectic Euler integrator (semi-implicit Euler)
/// More stable than explicit Euler for physics simulations
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEulerIntegrator;

impl SymplecticEulerIntegrator {
    /// Creates a new Symplectic Euler integrator
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for SymplecticEulerIntegrator {
    fn integrate(&mut self, entity: &mut Entity, dt: f64) {
        // Velocities first, then positions from the *new* velocities
        entity.integrate_forces(dt);
        entity.integrate_velocity(dt);

        // Accumulators are per frame, static or not
        entity.clear_accumulators();
    }

    fn name(&self) -> &str {
        "SymplecticEuler"
    }
}

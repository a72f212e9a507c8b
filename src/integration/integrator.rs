use crate::bodies::Entity;

/// Trait for numerical integration algorithms
pub trait Integrator {
    /// Advances an entity's kinematic state over a time step
    fn integrate(&mut self, entity: &mut Entity, dt: f64);

    /// Returns the name of the integrator
    fn name(&self) -> &str;
}

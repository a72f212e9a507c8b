use crate::core::PhysicsConstants;

/// Weight of a body: `m * g`
#[inline]
pub fn gravity_force(mass: f64, constants: &PhysicsConstants) -> f64 {
    mass * constants.gravity
}

use crate::core::PhysicsConstants;
use crate::math::Vector3;

/// Quadratic hull drag magnitude: `0.5 * Cd * rho * A * |v|^2`.
///
/// Exactly zero for a zero velocity.
pub fn drag_magnitude(velocity: Vector3, wet_area: f64, constants: &PhysicsConstants) -> f64 {
    let speed_squared = velocity.length_squared();
    if speed_squared == 0.0 {
        return 0.0;
    }

    0.5 * constants.drag_coefficient * constants.drag_water_density * wet_area * speed_squared
}

/// Drag force opposing the horizontal components of the velocity.
///
/// The components are scaled by the full speed, so vertical motion shares
/// the magnitude without being opposed itself.
pub fn drag_force(velocity: Vector3, wet_area: f64, constants: &PhysicsConstants) -> Vector3 {
    let speed = velocity.length();
    if speed < crate::math::EPSILON {
        return Vector3::zero();
    }

    let magnitude = drag_magnitude(velocity, wet_area, constants);
    Vector3::new(
        -magnitude * velocity.x / speed,
        0.0,
        -magnitude * velocity.z / speed,
    )
}

/// Drag force limited so a single step of length `dt` can stop the
/// horizontal motion of a body of `mass` but never reverse it.
///
/// A non-positive `dt` or `mass` returns the plain [`drag_force`].
pub fn limited_drag_force(
    velocity: Vector3,
    wet_area: f64,
    mass: f64,
    dt: f64,
    constants: &PhysicsConstants,
) -> Vector3 {
    let force = drag_force(velocity, wet_area, constants);
    if dt <= 0.0 || mass <= 0.0 {
        return force;
    }

    let horizontal_speed = velocity.horizontal().length();
    let limit = mass * horizontal_speed / dt;
    let magnitude = force.length();
    if magnitude > limit {
        log::trace!("drag limited from {} to {}", magnitude, limit);
        force.with_length(limit)
    } else {
        force
    }
}

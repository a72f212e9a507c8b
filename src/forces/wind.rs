use crate::core::{Environment, PhysicsConstants};
use crate::math::{CompassDirection, Vector3};

/// Sail thrust from the wind's dynamic pressure:
/// `efficiency * 0.5 * rho_air * v_wind^2 * sail_area`
pub fn wind_thrust(environment: &Environment, constants: &PhysicsConstants) -> f64 {
    let dynamic_pressure = 0.5 * constants.air_density * environment.wind_speed * environment.wind_speed;
    constants.sail_efficiency * dynamic_pressure * environment.sail_area
}

/// Torque of the wind around the hull's vertical axis.
///
/// The wind force is taken as proportional to the wind speed.
pub fn wind_torque(environment: &Environment, constants: &PhysicsConstants) -> f64 {
    let wind_force = environment.wind_speed * constants.wind_force_per_speed;
    wind_force * constants.wind_lever_arm
}

/// Nudges a velocity along its own direction by `thrust * dt`.
///
/// A body at rest has no direction to be pushed along and stays at rest.
pub fn apply_thrust_along_heading(velocity: Vector3, thrust: f64, dt: f64) -> Vector3 {
    velocity + velocity.normalize() * (thrust * dt)
}

/// Speeds a velocity up when the body heads the way the wind blows and slows
/// it down otherwise, by `wind_speed / divisor`.
///
/// Slowing down stops at rest rather than reversing the direction.
pub fn wind_adjusted_velocity(
    velocity: Vector3,
    heading: CompassDirection,
    environment: &Environment,
    constants: &PhysicsConstants,
) -> Vector3 {
    if environment.wind_speed <= 0.0 || constants.wind_adjust_divisor == 0.0 {
        return velocity;
    }

    let delta = environment.wind_speed / constants.wind_adjust_divisor;
    let speed = velocity.length();

    let adjusted = if heading == environment.wind_direction {
        speed + delta
    } else {
        (speed - delta).max(0.0)
    };

    velocity.with_length(adjusted)
}

use crate::math::CompassDirection;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Read-only scalars derived from a boat's state, captured once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// Magnitude of the linear velocity
    pub speed: f64,

    /// Magnitude of the acceleration integrated this frame
    pub acceleration_magnitude: f64,

    /// Yaw in radians
    pub rotation_y: f64,

    /// Buoyant force
    pub buoyant_force: f64,

    /// Weight
    pub gravity_force: f64,

    /// Downward wave force
    pub wave_force: f64,

    /// Linear momentum magnitude
    pub momentum: f64,

    /// Magnitude of the angular velocity
    pub angular_speed: f64,

    /// Kinetic energy of the hull
    pub kinetic_energy: f64,

    /// Torque of the wind around the vertical axis
    pub wind_torque: f64,

    /// Drag magnitude plus sail thrust
    pub thrust_force: f64,

    /// Drag magnitude
    pub drag_force: f64,

    /// Momentum of a water mass equal to the hull's, moving with the current
    pub water_momentum: f64,

    /// Kinetic energy of that water mass
    pub water_kinetic_energy: f64,

    /// Heading quadrant
    pub compass_direction: CompassDirection,

    /// Whether weight exceeded buoyancy this frame
    pub is_sinking: bool,

    /// Sail angle, half the yaw at the last turn
    pub sail_angle: f64,

    /// Compass needle angle in degrees, in `[0, 360)`
    pub heading_degrees: f64,

    /// Throttle at capture time
    pub throttle: f64,
}

mod gravity;
mod buoyancy;
mod drag;
mod wind;

pub use self::gravity::gravity_force;
pub use self::buoyancy::{buoyant_force, wave_force, VerticalBalance};
pub use self::drag::{drag_force, drag_magnitude, limited_drag_force};
pub use self::wind::{apply_thrust_along_heading, wind_adjusted_velocity, wind_thrust, wind_torque};

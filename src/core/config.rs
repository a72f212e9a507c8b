use crate::error::SimulationError;
use crate::math::{CompassDirection, Vector3};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Operator-tunable conditions, supplied once per tick by the embedding layer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Environment {
    /// Height of the waves; drives the wave force and the bobbing amplitude
    pub wave_height: f64,

    /// Wind speed (m/s)
    pub wind_speed: f64,

    /// The quadrant the wind blows towards
    pub wind_direction: CompassDirection,

    /// Sail area exposed to the wind (m^2)
    pub sail_area: f64,

    /// Speed of the water current (m/s)
    pub water_speed: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            wave_height: 0.0,
            wind_speed: 5.0,
            wind_direction: CompassDirection::North,
            sail_area: 10.0,
            water_speed: 0.0,
        }
    }
}

impl Environment {
    /// Returns a calm environment: no wind, no waves, still water
    pub fn calm() -> Self {
        Self {
            wave_height: 0.0,
            wind_speed: 0.0,
            water_speed: 0.0,
            ..Self::default()
        }
    }
}

/// Constants of the hydrodynamic model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct PhysicsConstants {
    /// Gravitational acceleration magnitude
    pub gravity: f64,

    /// Water density used for buoyancy and wave forces
    pub water_density: f64,

    /// Water density used for hull drag
    pub drag_water_density: f64,

    /// Hull drag coefficient
    pub drag_coefficient: f64,

    /// Air density used for the sail's dynamic pressure
    pub air_density: f64,

    /// Fraction of the sail's dynamic pressure turned into thrust
    pub sail_efficiency: f64,

    /// Vertical speed lost per update while sinking (applied per call, not per second)
    pub sinking_penalty: f64,

    /// Angular friction coefficient applied per update
    pub angular_friction: f64,

    /// Acceleration per unit of throttle
    pub throttle_acceleration_scale: f64,

    /// Divisor turning wind speed into the post-update speed adjustment
    pub wind_adjust_divisor: f64,

    /// Wind force per unit of wind speed, for the reported torque
    pub wind_force_per_speed: f64,

    /// Lever arm of the wind force around the boat's vertical axis
    pub wind_lever_arm: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            water_density: 1000.0,
            drag_water_density: 1000.0,
            drag_coefficient: 0.47,
            air_density: 1.225,
            sail_efficiency: 0.5,
            sinking_penalty: 0.5,
            angular_friction: 0.02,
            throttle_acceleration_scale: 0.5,
            wind_adjust_divisor: 20.0,
            wind_force_per_speed: 10.0,
            wind_lever_arm: 1.0,
        }
    }
}

impl PhysicsConstants {
    /// Constants with a unit water density for buoyancy and waves.
    ///
    /// Drag keeps the physical density of water.
    pub fn unit_density() -> Self {
        Self {
            water_density: 1.0,
            ..Self::default()
        }
    }
}

/// Configuration held by a root grid and handed to every node during update
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// The per-tick external conditions
    pub environment: Environment,

    /// Constants of the force model
    pub constants: PhysicsConstants,
}

impl SimulationConfig {
    /// Creates a configuration with the given environment and default constants
    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            constants: PhysicsConstants::default(),
        }
    }
}

/// Construction parameters of a boat
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BoatConfig {
    /// Initial position
    pub position: Vector3,

    /// Initial yaw in radians
    pub yaw: f64,

    /// Mass of the boat (kg), must be positive
    pub mass: f64,

    /// Submerged hull volume (m^3)
    pub submerged_volume: f64,

    /// Wetted hull area (m^2)
    pub wet_area: f64,

    /// Height of the water surface
    pub water_level: f64,

    /// Upper bound of the throttle
    pub max_throttle: f64,

    /// Throttle change per `throttle_up` / `throttle_down`
    pub throttle_step: f64,

    /// Minimum time between two throttle changes
    pub throttle_cooldown: f64,

    /// Angular acceleration per unit of turn input
    pub turn_rate: f64,

    /// Half extents of the hull's bounding box
    pub hull_half_extents: Vector3,

    /// Initial bobbing phase; randomized when `None`
    pub bob_phase: Option<f64>,
}

impl Default for BoatConfig {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            yaw: 0.0,
            mass: 1.0,
            submerged_volume: 1.0,
            wet_area: 1.0,
            water_level: 0.0,
            max_throttle: 0.1,
            throttle_step: 1.0,
            throttle_cooldown: 0.3,
            turn_rate: 0.02,
            hull_half_extents: Vector3::splat(0.5),
            bob_phase: None,
        }
    }
}

impl BoatConfig {
    /// Rejects parameters that would produce NaN or infinities downstream
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            log::warn!("rejected boat configuration: {}", message);
            Err(SimulationError::InvalidParameter(message))
        }

        if !self.position.is_finite() || !self.yaw.is_finite() || !self.water_level.is_finite() {
            return invalid("position, yaw and water level must be finite".to_string());
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return invalid(format!("mass must be positive, got {}", self.mass));
        }
        if !(self.submerged_volume.is_finite() && self.submerged_volume >= 0.0) {
            return invalid(format!(
                "submerged volume must be non-negative, got {}",
                self.submerged_volume
            ));
        }
        if !(self.wet_area.is_finite() && self.wet_area >= 0.0) {
            return invalid(format!("wet area must be non-negative, got {}", self.wet_area));
        }
        if !(self.max_throttle.is_finite() && self.max_throttle >= 0.0) {
            return invalid(format!(
                "max throttle must be non-negative, got {}",
                self.max_throttle
            ));
        }
        if !(self.throttle_step.is_finite() && self.throttle_step >= 0.0) {
            return invalid(format!(
                "throttle step must be non-negative, got {}",
                self.throttle_step
            ));
        }
        if !self.turn_rate.is_finite() {
            return invalid(format!("turn rate must be finite, got {}", self.turn_rate));
        }
        if !(self.throttle_cooldown.is_finite() && self.throttle_cooldown >= 0.0) {
            return invalid(format!(
                "throttle cooldown must be non-negative, got {}",
                self.throttle_cooldown
            ));
        }
        let half = self.hull_half_extents;
        if !half.is_finite() || half.x < 0.0 || half.y < 0.0 || half.z < 0.0 {
            return invalid(format!("hull half extents must be non-negative, got {}", half));
        }
        if let Some(phase) = self.bob_phase {
            if !phase.is_finite() {
                return invalid(format!("bob phase must be finite, got {}", phase));
            }
        }

        Ok(())
    }
}

use std::any::Any;

use rand::Rng;

use crate::bodies::body_flags::EntityFlags;
use crate::bodies::{Entity, Telemetry};
use crate::collision::{elastic_speed_after, kinetic_energy, momentum, Collidable};
use crate::core::{
    BoatConfig, Cooldown, EntityHandle, Environment, FrameContext, Grid, GridNode, NodeEventType,
    Siblings,
};
use crate::forces::{
    apply_thrust_along_heading, drag_magnitude, limited_drag_force, wind_adjusted_velocity,
    wind_thrust, wind_torque, VerticalBalance,
};
use crate::math::compass::heading_degrees;
use crate::math::{Aabb, CompassDirection, Transform, Vector3};
use crate::Result;

/// Upper bound (exclusive) of a randomized initial bob phase
const MAX_RANDOM_BOB_PHASE: f64 = 999.0;

/// A floating hull driven by buoyancy, drag, throttle and wind.
///
/// A boat is also a grid: attachments added to it live in its local frame and
/// are updated after the hull, every frame.
#[derive(Debug)]
pub struct Boat {
    /// Transform and kinematic state
    entity: Entity,

    /// Nodes carried by the boat
    attachments: Grid,

    /// Current throttle, within `[0, max_throttle]`
    throttle: f64,

    /// Upper bound of the throttle
    max_throttle: f64,

    /// Throttle change per step
    throttle_step: f64,

    /// Gates throttle changes
    throttle_cooldown: Cooldown,

    /// Angular acceleration per unit of turn input
    turn_rate: f64,

    /// Mass (kg)
    mass: f64,

    /// Submerged hull volume
    submerged_volume: f64,

    /// Wetted hull area
    wet_area: f64,

    /// Height of the water surface
    water_level: f64,

    /// Recomputed every frame
    is_sinking: bool,

    /// Half the yaw at the last turn
    sail_angle: f64,

    /// Phase of the bobbing oscillation
    bob_phase: f64,

    /// Vertical bobbing offset currently applied to the position
    bob_offset: f64,

    /// Half extents of the hull's bounding box
    hull_half_extents: Vector3,

    /// Acceleration integrated in the last frame
    last_acceleration: Vector3,

    /// Scalars captured at the end of the last frame
    telemetry: Telemetry,
}

impl Boat {
    /// Creates a boat, rejecting configurations that would produce NaN
    pub fn new(config: BoatConfig) -> Result<Self> {
        config.validate()?;

        let mut entity = Entity::new(Transform::from_position_yaw(config.position, config.yaw));
        entity.set_mass(config.mass);

        let bob_phase = match config.bob_phase {
            Some(phase) => phase,
            None => rand::thread_rng().gen_range(0.0..MAX_RANDOM_BOB_PHASE),
        };

        let mut boat = Self {
            entity,
            attachments: Grid::new(),
            throttle: 0.0,
            max_throttle: config.max_throttle,
            throttle_step: config.throttle_step,
            throttle_cooldown: Cooldown::with_duration(config.throttle_cooldown),
            turn_rate: config.turn_rate,
            mass: config.mass,
            submerged_volume: config.submerged_volume,
            wet_area: config.wet_area,
            water_level: config.water_level,
            is_sinking: false,
            sail_angle: 0.0,
            bob_phase,
            bob_offset: 0.0,
            hull_half_extents: config.hull_half_extents,
            last_acceleration: Vector3::zero(),
            telemetry: Telemetry::default(),
        };
        boat.telemetry.compass_direction = boat.heading();
        boat.telemetry.heading_degrees = heading_degrees(boat.entity.get_transform().yaw());

        Ok(boat)
    }

    /// Returns the current throttle
    pub fn get_throttle(&self) -> f64 {
        self.throttle
    }

    /// Returns the throttle's upper bound
    pub fn get_max_throttle(&self) -> f64 {
        self.max_throttle
    }

    /// Returns the cooldown gating throttle changes
    pub fn get_throttle_cooldown(&self) -> &Cooldown {
        &self.throttle_cooldown
    }

    /// Raises the throttle by one step, up to the maximum.
    /// Returns `false` without changing anything while the cooldown is hot.
    pub fn throttle_up(&mut self) -> bool {
        if self.throttle_cooldown.is_hot() {
            return false;
        }

        self.throttle = (self.throttle + self.throttle_step).min(self.max_throttle);
        self.throttle_cooldown.heat();
        log::debug!("throttle up to {}", self.throttle);
        true
    }

    /// Lowers the throttle by one step, down to zero.
    /// Returns `false` without changing anything while the cooldown is hot.
    pub fn throttle_down(&mut self) -> bool {
        if self.throttle_cooldown.is_hot() {
            return false;
        }

        self.throttle = (self.throttle - self.throttle_step).max(0.0);
        self.throttle_cooldown.heat();
        log::debug!("throttle down to {}", self.throttle);
        true
    }

    /// Trims the sail to the current yaw and queues an angular acceleration
    /// around the vertical axis
    pub fn turn(&mut self, amount: f64) {
        self.sail_angle = self.entity.get_rotation().y / 2.0;
        self.entity
            .apply_angular_acceleration(Vector3::new(0.0, amount * self.turn_rate, 0.0));
    }

    /// Applies a force, caching the resulting acceleration
    pub fn apply_force(&mut self, force: Vector3) {
        self.entity.apply_force(force);
        self.last_acceleration = self.entity.get_acceleration();
    }

    /// Returns the mass
    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    /// Returns the submerged hull volume
    pub fn get_submerged_volume(&self) -> f64 {
        self.submerged_volume
    }

    /// Returns the wetted hull area
    pub fn get_wet_area(&self) -> f64 {
        self.wet_area
    }

    /// Returns the height of the water surface
    pub fn get_water_level(&self) -> f64 {
        self.water_level
    }

    /// Returns whether the boat was sinking in the last frame
    pub fn is_sinking(&self) -> bool {
        self.is_sinking
    }

    /// Returns the sail angle
    pub fn get_sail_angle(&self) -> f64 {
        self.sail_angle
    }

    /// Returns the phase of the bobbing oscillation
    pub fn get_bob_phase(&self) -> f64 {
        self.bob_phase
    }

    /// Returns the acceleration integrated in the last frame
    pub fn get_last_acceleration(&self) -> Vector3 {
        self.last_acceleration
    }

    /// Returns the speed (velocity magnitude)
    pub fn speed(&self) -> f64 {
        self.entity.get_linear_velocity().length()
    }

    /// Returns the heading quadrant derived from the yaw
    pub fn heading(&self) -> CompassDirection {
        CompassDirection::from_yaw(self.entity.get_transform().yaw())
    }

    /// Returns the scalars captured at the end of the last frame
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Returns the nodes carried by the boat
    pub fn attachments(&self) -> &Grid {
        &self.attachments
    }

    /// Returns the nodes carried by the boat, mutably
    pub fn attachments_mut(&mut self) -> &mut Grid {
        &mut self.attachments
    }

    /// Returns the position of an attachment in the boat's owner frame
    pub fn attachment_world_position(&self, handle: EntityHandle) -> Result<Vector3> {
        let local = self.attachments.world_position(handle)?;
        Ok(self.entity.get_transform().transform_point(local))
    }

    /// Resolves an elastic collision with the water current, taken as a mass
    /// equal to the boat's moving at `water_speed`. Returns the new speed.
    pub fn resolve_current_collision(&mut self, environment: &Environment) -> f64 {
        let speed = elastic_speed_after(self.mass, self.speed(), self.mass, environment.water_speed);
        let velocity = self.entity.get_linear_velocity().with_length(speed);
        self.entity.set_linear_velocity(velocity);
        speed
    }

    fn update_sinking(&mut self, balance: &VerticalBalance, frame: &mut FrameContext<'_>) {
        let sinking = balance.is_sinking();

        if sinking {
            let mut velocity = self.entity.get_linear_velocity();
            velocity.y -= frame.constants().sinking_penalty;
            self.entity.set_linear_velocity(velocity);
        }

        if sinking != self.is_sinking {
            log::debug!(
                "{:?}: boat {:?} {} sinking",
                frame.grid(),
                frame.current(),
                if sinking { "started" } else { "stopped" }
            );
            frame.emit_node_event(if sinking {
                NodeEventType::SinkingStarted
            } else {
                NodeEventType::SinkingStopped
            });
        }
        self.is_sinking = sinking;
    }

    fn resolve_collisions(&mut self, frame: &mut FrameContext<'_>, siblings: &Siblings<'_>) {
        if !self.entity.flags().contains(EntityFlags::COLLIDABLE) {
            return;
        }

        for (handle, other) in siblings.collidables() {
            if !self.overlaps(other) {
                continue;
            }

            let before = self.speed();
            let after = self.on_collision(other);
            log::debug!(
                "{:?}: {:?} collided with {:?}, speed {} -> {}",
                frame.grid(),
                frame.current(),
                handle,
                before,
                after
            );
            frame.emit_collision(handle, before, after);
        }
    }

    fn update_bob(&mut self, dt: f64, wave_height: f64) {
        self.bob_phase += dt;
        let offset = self.bob_phase.sin() * wave_height / 8.0;

        let mut position = self.entity.get_position();
        position.y += offset - self.bob_offset;
        self.entity.set_position(position);
        self.bob_offset = offset;
    }

    fn capture_telemetry(&mut self, balance: &VerticalBalance, frame: &FrameContext<'_>) {
        let environment = frame.environment();
        let constants = frame.constants();
        let velocity = self.entity.get_linear_velocity();
        let speed = velocity.length();
        let yaw = self.entity.get_transform().yaw();
        let drag = drag_magnitude(velocity, self.wet_area, constants);

        self.telemetry = Telemetry {
            speed,
            acceleration_magnitude: self.last_acceleration.length(),
            rotation_y: yaw,
            buoyant_force: balance.buoyant,
            gravity_force: balance.gravity,
            wave_force: balance.wave,
            momentum: momentum(self.mass, speed),
            angular_speed: self.entity.get_angular_velocity().length(),
            kinetic_energy: kinetic_energy(self.mass, speed),
            wind_torque: wind_torque(environment, constants),
            thrust_force: drag + wind_thrust(environment, constants),
            drag_force: drag,
            water_momentum: momentum(self.mass, environment.water_speed),
            water_kinetic_energy: kinetic_energy(self.mass, environment.water_speed),
            compass_direction: CompassDirection::from_yaw(yaw),
            is_sinking: self.is_sinking,
            sail_angle: self.sail_angle,
            heading_degrees: heading_degrees(yaw),
            throttle: self.throttle,
        };

        log::trace!("{:?}: {:?}", frame.current(), self.telemetry);
    }
}

impl Collidable for Boat {
    fn bounding_volume(&self) -> Aabb {
        Aabb::from_center_half_extents(self.entity.get_position(), self.hull_half_extents)
    }

    fn collision_mass(&self) -> f64 {
        self.mass
    }

    fn collision_speed(&self) -> f64 {
        self.speed()
    }

    fn on_collision(&mut self, other: &dyn Collidable) -> f64 {
        let speed = elastic_speed_after(
            self.mass,
            self.speed(),
            other.collision_mass(),
            other.collision_speed(),
        );
        let velocity = self.entity.get_linear_velocity().with_length(speed);
        self.entity.set_linear_velocity(velocity);
        speed
    }
}

impl GridNode for Boat {
    fn node_type(&self) -> &'static str {
        "Boat"
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, siblings: &Siblings<'_>) {
        let dt = frame.dt;
        let environment = frame.environment();
        let constants = frame.constants();

        let mut balance = VerticalBalance::compute(
            self.mass,
            self.submerged_volume,
            environment.wave_height,
            constants,
        );
        self.update_sinking(&balance, frame);

        if balance.clamp_at_surface(self.entity.get_position().y, self.water_level) {
            let mut velocity = self.entity.get_linear_velocity();
            velocity.y = 0.0;
            self.entity.set_linear_velocity(velocity);
        }

        self.resolve_collisions(frame, siblings);

        let velocity = self.entity.get_linear_velocity();
        self.apply_force(limited_drag_force(velocity, self.wet_area, self.mass, dt, constants));
        self.apply_force(Vector3::new(0.0, balance.net, 0.0));

        if self.throttle > 0.0 {
            let thrust = self.entity.get_forward() * (self.throttle * constants.throttle_acceleration_scale);
            self.entity.apply_acceleration(thrust);
        }

        let sail = wind_thrust(environment, constants);
        let velocity = apply_thrust_along_heading(self.entity.get_linear_velocity(), sail, dt);
        self.entity.set_linear_velocity(velocity);

        self.last_acceleration = self.entity.get_acceleration();
        self.entity.update_physics(dt);
        self.entity.apply_angular_friction(constants.angular_friction);
        self.update_bob(dt, environment.wave_height);

        self.attachments.update_children(frame);
        self.throttle_cooldown.cool(dt);

        self.capture_telemetry(&balance, frame);

        let velocity = wind_adjusted_velocity(
            self.entity.get_linear_velocity(),
            self.heading(),
            environment,
            constants,
        );
        self.entity.set_linear_velocity(velocity);
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        if self.entity.flags().contains(EntityFlags::COLLIDABLE) {
            Some(self)
        } else {
            None
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

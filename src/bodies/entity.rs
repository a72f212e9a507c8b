use crate::bodies::body_flags::EntityFlags;
use crate::core::GridId;
use crate::integration::{Integrator, SymplecticEulerIntegrator};
use crate::math::{Transform, Vector2, Vector3};

/// A node with a transform and point-mass kinematic state.
///
/// Forces and accelerations accumulate during a frame and are consumed by
/// [`Entity::update_physics`], which zeroes the accumulators afterwards.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Position and Euler rotation in the owner's frame
    transform: Transform,

    /// Linear velocity
    linear_velocity: Vector3,

    /// Angular velocity (Euler rates)
    angular_velocity: Vector3,

    /// Linear acceleration accumulated this frame
    acceleration: Vector3,

    /// Angular acceleration accumulated this frame
    angular_acceleration: Vector3,

    /// Inverse mass used by `apply_force`
    inv_mass: f64,

    /// The grid that owns this entity, if any. Never keeps the grid alive.
    owner: Option<GridId>,

    /// Behaviour flags
    flags: EntityFlags,
}

impl Entity {
    /// Creates a unit-mass entity with the given transform
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            angular_acceleration: Vector3::zero(),
            inv_mass: 1.0,
            owner: None,
            flags: EntityFlags::COLLIDABLE,
        }
    }

    /// Creates a unit-mass entity at the given position
    pub fn at(position: Vector3) -> Self {
        Self::new(Transform::from_position(position))
    }

    /// Creates an entity that is never integrated
    pub fn new_static(position: Vector3) -> Self {
        let mut entity = Self::at(position);
        entity.flags.insert(EntityFlags::STATIC);
        entity
    }

    /// Returns the entity's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Sets the entity's transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Returns the entity's position
    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    /// Overwrites the position, bypassing integration
    pub fn set_position(&mut self, position: Vector3) {
        debug_assert!(position.is_finite(), "non-finite position {}", position);
        self.transform.position = position;
    }

    /// Returns the Euler rotation
    pub fn get_rotation(&self) -> Vector3 {
        self.transform.rotation
    }

    /// Overwrites the Euler rotation
    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.transform.rotation = rotation;
    }

    /// Returns the linear velocity
    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Sets the linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        debug_assert!(velocity.is_finite(), "non-finite velocity {}", velocity);
        self.linear_velocity = velocity;
    }

    /// Returns the angular velocity
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
    }

    /// Returns the acceleration accumulated so far this frame
    pub fn get_acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Returns the angular acceleration accumulated so far this frame
    pub fn get_angular_acceleration(&self) -> Vector3 {
        self.angular_acceleration
    }

    /// Returns the mass used to turn forces into accelerations
    pub fn get_mass(&self) -> f64 {
        if self.inv_mass > 0.0 {
            1.0 / self.inv_mass
        } else {
            f64::INFINITY
        }
    }

    /// Sets the mass; non-positive masses make the entity ignore forces
    pub fn set_mass(&mut self, mass: f64) {
        self.inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Returns the owning grid, if any
    pub fn owner(&self) -> Option<GridId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<GridId>) {
        self.owner = owner;
    }

    /// Returns the entity's flags
    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Sets or clears flags
    pub fn set_flags(&mut self, flags: EntityFlags, enabled: bool) {
        self.flags.set(flags, enabled);
    }

    /// Returns whether the entity is skipped by integration
    pub fn is_static(&self) -> bool {
        self.flags.contains(EntityFlags::STATIC)
    }

    /// Accumulates `force / mass` into the acceleration
    pub fn apply_force(&mut self, force: Vector3) {
        debug_assert!(force.is_finite(), "non-finite force {}", force);
        self.acceleration += force * self.inv_mass;
    }

    /// Accumulates into the acceleration
    pub fn apply_acceleration(&mut self, acceleration: Vector3) {
        debug_assert!(acceleration.is_finite(), "non-finite acceleration {}", acceleration);
        self.acceleration += acceleration;
    }

    /// Accumulates into the angular acceleration
    pub fn apply_angular_acceleration(&mut self, acceleration: Vector3) {
        debug_assert!(acceleration.is_finite(), "non-finite angular acceleration {}", acceleration);
        self.angular_acceleration += acceleration;
    }

    /// Scales the angular velocity by `1 - coefficient`.
    ///
    /// Applied once per call, independent of the frame time.
    pub fn apply_angular_friction(&mut self, coefficient: f64) {
        self.angular_velocity *= 1.0 - coefficient.clamp(0.0, 1.0);
    }

    /// Translates the entity by `delta`
    pub fn move_by(&mut self, delta: Vector3) {
        self.transform.translate(delta);
    }

    /// Planar unit direction the entity is facing
    pub fn get_facing_vector2(&self) -> Vector2 {
        self.transform.facing_vector2()
    }

    /// Horizontal forward direction in 3D
    pub fn get_forward(&self) -> Vector3 {
        self.transform.forward()
    }

    /// Integrates the accumulated accelerations over `dt` and resets them
    pub fn update_physics(&mut self, dt: f64) {
        SymplecticEulerIntegrator.integrate(self, dt);
    }

    /// Integrates accelerations into velocities
    pub(crate) fn integrate_forces(&mut self, dt: f64) {
        if self.is_static() {
            return;
        }

        self.linear_velocity += self.acceleration * dt;
        self.angular_velocity += self.angular_acceleration * dt;
    }

    /// Integrates velocities into position and rotation
    pub(crate) fn integrate_velocity(&mut self, dt: f64) {
        if self.is_static() {
            return;
        }

        self.transform.position += self.linear_velocity * dt;
        self.transform.rotation += self.angular_velocity * dt;
    }

    /// Zeroes the accumulators so they do not leak into the next frame
    pub(crate) fn clear_accumulators(&mut self) {
        self.acceleration = Vector3::zero();
        self.angular_acceleration = Vector3::zero();
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Transform::identity())
    }
}

use nalgebra as na;

use crate::math::{Vector2, Vector3};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Position and Euler orientation of a node, relative to the grid that owns it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in the owner's frame
    pub position: Vector3,

    /// Euler angles in radians; `y` is the yaw around the vertical axis
    pub rotation: Vector3,
}

impl Transform {
    /// Creates a new transform with the given position and Euler rotation
    #[inline]
    pub fn new(position: Vector3, rotation: Vector3) -> Self {
        Self { position, rotation }
    }

    /// Creates a new identity transform
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Vector3::zero(),
        }
    }

    /// Creates a transform at a position, turned to the given yaw
    #[inline]
    pub fn from_position_yaw(position: Vector3, yaw: f64) -> Self {
        Self {
            position,
            rotation: Vector3::new(0.0, yaw, 0.0),
        }
    }

    /// Returns the yaw (rotation around the vertical axis)
    #[inline]
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    /// Translates the transform by the given offset
    #[inline]
    pub fn translate(&mut self, delta: Vector3) {
        self.position += delta;
    }

    /// Returns the horizontal forward direction for the current yaw.
    ///
    /// Yaw 0 faces +Z; positive yaw turns towards +X.
    pub fn forward(&self) -> Vector3 {
        let yaw = na::Rotation3::from_axis_angle(&na::Vector3::y_axis(), self.rotation.y);
        let forward = yaw * Vector3::unit_z().to_nalgebra();
        Vector3::from_nalgebra(&forward).horizontal().normalize()
    }

    /// Returns the planar unit facing vector, `x` mapping to world X and `y` to world Z
    pub fn facing_vector2(&self) -> Vector2 {
        let forward = self.forward();
        Vector2::new(forward.x, forward.z)
    }

    /// Maps a point from this transform's frame into the parent frame (translation only)
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.position + point
    }
}

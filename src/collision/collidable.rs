use crate::math::Aabb;

/// Capability of a node that takes part in sibling collisions.
///
/// Grids scan their children through this trait only, so any node type can
/// collide as long as it exposes a bounding volume and a point mass.
pub trait Collidable {
    /// World-aligned bounding box in the owner's frame
    fn bounding_volume(&self) -> Aabb;

    /// Mass used by collision resolution
    fn collision_mass(&self) -> f64;

    /// Current speed (velocity magnitude)
    fn collision_speed(&self) -> f64;

    /// Resolves a collision with `other`, changing only `self`.
    /// Returns the speed of `self` after resolution.
    fn on_collision(&mut self, other: &dyn Collidable) -> f64;

    /// Whether the two bounding volumes overlap
    fn overlaps(&self, other: &dyn Collidable) -> bool {
        self.bounding_volume().intersects(&other.bounding_volume())
    }
}

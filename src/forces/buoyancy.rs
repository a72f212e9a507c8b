use crate::core::PhysicsConstants;
use crate::forces::gravity_force;

/// Archimedes' principle: `rho * V * g`
#[inline]
pub fn buoyant_force(submerged_volume: f64, constants: &PhysicsConstants) -> f64 {
    constants.water_density * submerged_volume * constants.gravity
}

/// Downward push of the waves: `rho * g * h`
#[inline]
pub fn wave_force(wave_height: f64, constants: &PhysicsConstants) -> f64 {
    constants.water_density * constants.gravity * wave_height
}

/// The vertical forces acting on a hull for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalBalance {
    /// Weight of the hull
    pub gravity: f64,

    /// Buoyant force of the submerged volume
    pub buoyant: f64,

    /// Downward wave force
    pub wave: f64,

    /// `buoyant - gravity - wave`
    pub net: f64,
}

impl VerticalBalance {
    /// Computes the balance for a hull
    pub fn compute(mass: f64, submerged_volume: f64, wave_height: f64, constants: &PhysicsConstants) -> Self {
        let gravity = gravity_force(mass, constants);
        let buoyant = buoyant_force(submerged_volume, constants);
        let wave = wave_force(wave_height, constants);

        Self {
            gravity,
            buoyant,
            wave,
            net: buoyant - gravity - wave,
        }
    }

    /// Weight exceeds buoyancy. Waves do not count towards sinking.
    pub fn is_sinking(&self) -> bool {
        self.gravity > self.buoyant
    }

    /// Zeroes the net force when the hull is at or above the surface and
    /// would be pushed further up. Returns whether the clamp engaged.
    pub fn clamp_at_surface(&mut self, height: f64, water_level: f64) -> bool {
        if height >= water_level && self.net > 0.0 {
            self.net = 0.0;
            true
        } else {
            false
        }
    }
}

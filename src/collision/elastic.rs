/// Speed after a one-dimensional collision of two point masses:
/// `(m1 * v1 + m2 * v2) / (m1 + m2)`.
///
/// Momentum is conserved along the speed axis. Kinetic energy is not
/// enforced. A degenerate total mass leaves `v1` untouched.
pub fn elastic_speed_after(m1: f64, v1: f64, m2: f64, v2: f64) -> f64 {
    let total_mass = m1 + m2;
    if !(total_mass > 0.0) {
        return v1;
    }

    (m1 * v1 + m2 * v2) / total_mass
}

/// Momentum magnitude `m * v`
#[inline]
pub fn momentum(mass: f64, speed: f64) -> f64 {
    mass * speed
}

/// Kinetic energy `0.5 * m * v^2`
#[inline]
pub fn kinetic_energy(mass: f64, speed: f64) -> f64 {
    0.5 * mass * speed * speed
}

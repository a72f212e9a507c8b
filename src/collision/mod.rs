mod collidable;
mod elastic;

pub use self::collidable::Collidable;
pub use self::elastic::{elastic_speed_after, kinetic_energy, momentum};

mod boat;
mod entity;
mod telemetry;

pub use self::boat::Boat;
pub use self::entity::Entity;
pub use self::telemetry::Telemetry;

/// Flags for controlling node behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling how grids treat a node
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct EntityFlags: u32 {
            /// Node is never integrated
            const STATIC = 0x01;

            /// Node may leave its grid's boundaries
            const IGNORE_BOUNDARIES = 0x02;

            /// Node takes part in sibling collisions, if it can collide at all
            const COLLIDABLE = 0x04;
        }
    }
}

pub mod math;
pub mod core;
pub mod bodies;
pub mod collision;
pub mod forces;
pub mod integration;

/// Re-export common types for easier usage
pub use crate::core::{
    BoatConfig, Cooldown, EntityHandle, Environment, Grid, GridNode, PhysicsConstants,
    SimulationConfig,
};
pub use crate::bodies::{Boat, Entity, Telemetry};
pub use crate::math::{CompassDirection, Vector3};

/// Error types for the simulation
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum SimulationError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Type mismatch: {0}")]
        TypeMismatch(String),
    }
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, error::SimulationError>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod cooldown;
pub mod events;
pub mod grid;
pub mod storage;

pub use self::config::{BoatConfig, Environment, PhysicsConstants, SimulationConfig};
pub use self::cooldown::Cooldown;
pub use self::events::{CollisionEvent, EventQueue, NodeEvent, NodeEventType};
pub use self::grid::{FrameContext, Grid, GridNode, Siblings};
pub use self::storage::ChildStorage;

use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies a child within the grid that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub(crate) u32);

/// A process-unique identifier for a grid, used as the non-owning
/// back-reference from a child to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(pub(crate) u32);

static NEXT_GRID_ID: AtomicU32 = AtomicU32::new(1);

impl GridId {
    pub(crate) fn next() -> Self {
        GridId(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed))
    }
}

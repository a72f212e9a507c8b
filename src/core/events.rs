use crate::core::{EntityHandle, GridId};
use std::collections::VecDeque;

/// A collision resolved between two siblings of the same grid
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// The grid both nodes belong to
    pub grid: GridId,

    /// The node whose velocity was resolved
    pub body_a: EntityHandle,

    /// The node it collided with
    pub body_b: EntityHandle,

    /// Speed of `body_a` before resolution
    pub speed_before: f64,

    /// Speed of `body_a` after resolution
    pub speed_after: f64,
}

/// Types of node events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEventType {
    /// A node has been added to a grid
    Added,

    /// A node has been removed from a grid
    Removed,

    /// A boat's gravity started to exceed its buoyancy
    SinkingStarted,

    /// A boat's buoyancy is back above its gravity
    SinkingStopped,

    /// A node was pushed back inside its grid's boundaries
    Clamped,
}

/// An event related to a single node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEvent {
    /// The type of node event
    pub event_type: NodeEventType,

    /// The grid the node belongs to
    pub grid: GridId,

    /// The node that the event refers to
    pub node: EntityHandle,
}

/// A queue of simulation events, drained by the embedding layer
#[derive(Debug, Default)]
pub struct EventQueue {
    collision_events: VecDeque<CollisionEvent>,
    node_events: VecDeque<NodeEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            collision_events: VecDeque::new(),
            node_events: VecDeque::new(),
        }
    }

    /// Adds a collision event to the queue
    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    /// Adds a node event to the queue
    pub fn add_node_event(&mut self, event: NodeEvent) {
        self.node_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next node event from the queue
    pub fn next_node_event(&mut self) -> Option<NodeEvent> {
        self.node_events.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.node_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.node_events.clear();
    }

    /// Gets all node events of a specific type
    pub fn get_node_events_of_type(&self, event_type: NodeEventType) -> Vec<&NodeEvent> {
        self.node_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events involving a specific node
    pub fn get_collision_events_for(&self, node: EntityHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.body_a == node || e.body_b == node)
            .collect()
    }

    /// Iterates over pending collision events without draining them
    pub fn collision_events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.collision_events.iter()
    }

    /// Iterates over pending node events without draining them
    pub fn node_events(&self) -> impl Iterator<Item = &NodeEvent> {
        self.node_events.iter()
    }
}

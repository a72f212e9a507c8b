use std::any::Any;
use std::fmt;

use crate::bodies::{body_flags::EntityFlags, Entity};
use crate::collision::Collidable;
use crate::core::events::{CollisionEvent, NodeEvent, NodeEventType};
use crate::core::storage::ChildStorage;
use crate::core::{EntityHandle, Environment, EventQueue, GridId, PhysicsConstants, SimulationConfig};
use crate::error::SimulationError;
use crate::math::{Aabb, Transform, Vector3};
use crate::Result;

/// Anything a grid can own: plain entities, boats, nested grids.
pub trait GridNode: Any + fmt::Debug {
    /// Returns the type name of the node
    fn node_type(&self) -> &'static str;

    /// The node's transform and kinematic state
    fn entity(&self) -> &Entity;

    /// Mutable access to the node's transform and kinematic state
    fn entity_mut(&mut self) -> &mut Entity;

    /// Advances the node by one frame.
    ///
    /// `siblings` are the other children of the same grid: the ones before
    /// this node are already updated for this frame, the ones after are not.
    fn update(&mut self, frame: &mut FrameContext<'_>, siblings: &Siblings<'_>);

    /// Translates the node (used by bulk moves)
    fn move_by(&mut self, delta: Vector3) {
        self.entity_mut().move_by(delta);
    }

    /// The node's collision capability, if it has one
    fn as_collidable(&self) -> Option<&dyn Collidable> {
        None
    }

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the boxed node for by-value downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Per-frame state handed down the update tree
pub struct FrameContext<'a> {
    /// Time step of this frame
    pub dt: f64,

    /// Timestamp of this frame, as supplied by the caller
    pub now: f64,

    config: &'a SimulationConfig,
    events: &'a mut EventQueue,
    grid: GridId,
    current: Option<EntityHandle>,
}

impl<'a> FrameContext<'a> {
    /// Creates a frame context rooted at `grid`
    pub fn new(
        dt: f64,
        now: f64,
        config: &'a SimulationConfig,
        events: &'a mut EventQueue,
        grid: GridId,
    ) -> Self {
        Self {
            dt,
            now,
            config,
            events,
            grid,
            current: None,
        }
    }

    /// The configuration of the root grid
    pub fn config(&self) -> &'a SimulationConfig {
        self.config
    }

    /// The external conditions for this frame
    pub fn environment(&self) -> &'a Environment {
        &self.config.environment
    }

    /// Constants of the force model
    pub fn constants(&self) -> &'a PhysicsConstants {
        &self.config.constants
    }

    /// The grid whose children are being updated
    pub fn grid(&self) -> GridId {
        self.grid
    }

    /// Handle of the node being updated, within [`FrameContext::grid`]
    pub fn current(&self) -> Option<EntityHandle> {
        self.current
    }

    /// Records a collision of the current node with `other`
    pub fn emit_collision(&mut self, other: EntityHandle, speed_before: f64, speed_after: f64) {
        if let Some(current) = self.current {
            self.events.add_collision_event(CollisionEvent {
                grid: self.grid,
                body_a: current,
                body_b: other,
                speed_before,
                speed_after,
            });
        }
    }

    /// Records an event about the current node
    pub fn emit_node_event(&mut self, event_type: NodeEventType) {
        if let Some(current) = self.current {
            self.events.add_node_event(NodeEvent {
                event_type,
                grid: self.grid,
                node: current,
            });
        }
    }

    fn enter(&mut self, grid: GridId) -> (GridId, Option<EntityHandle>) {
        let saved = (self.grid, self.current);
        self.grid = grid;
        self.current = None;
        saved
    }

    fn leave(&mut self, saved: (GridId, Option<EntityHandle>)) {
        self.grid = saved.0;
        self.current = saved.1;
    }
}

type Slot = (EntityHandle, Box<dyn GridNode>);

/// Shared view of the other children of a grid during one child's update
pub struct Siblings<'a> {
    before: &'a [Slot],
    after: &'a [Slot],
}

impl<'a> Siblings<'a> {
    /// A view with no siblings
    pub fn none() -> Self {
        Self { before: &[], after: &[] }
    }

    fn new(before: &'a [Slot], after: &'a [Slot]) -> Self {
        Self { before, after }
    }

    /// Iterates over the siblings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &'a dyn GridNode)> + 'a {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|(handle, node)| (*handle, &**node))
    }

    /// Iterates over the siblings that can collide
    pub fn collidables(&self) -> impl Iterator<Item = (EntityHandle, &'a dyn Collidable)> + 'a {
        self.iter()
            .filter_map(|(handle, node)| node.as_collidable().map(|c| (handle, c)))
    }

    /// Number of siblings
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Whether there are no siblings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A hierarchical container that owns an ordered list of nodes.
///
/// Child positions are expressed in the grid's own frame. Children are
/// updated in insertion order, and kept inside the grid's boundaries.
pub struct Grid {
    /// Identity used by children as their owner back-reference
    id: GridId,

    /// The grid's own transform within its parent
    entity: Entity,

    /// Children in insertion order
    children: ChildStorage<Box<dyn GridNode>>,

    /// Axis-aligned limits for child positions
    boundaries: Aabb,

    /// Configuration used when this grid is updated as a root
    config: SimulationConfig,

    /// Events recorded by this grid (and its subtree, when it is the root)
    events: EventQueue,

    /// Total simulated time as a root
    time: f64,
}

impl Grid {
    /// Creates a new unbounded grid with the default configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new unbounded grid with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        let mut entity = Entity::new(Transform::identity());
        entity.set_flags(EntityFlags::COLLIDABLE, false);

        Self {
            id: GridId::next(),
            entity,
            children: ChildStorage::new(),
            boundaries: Aabb::unbounded(),
            config,
            events: EventQueue::new(),
            time: 0.0,
        }
    }

    /// Returns the grid's identity
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Returns the total simulated time
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the simulation configuration
    pub fn get_config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Returns the external conditions
    pub fn environment(&self) -> &Environment {
        &self.config.environment
    }

    /// Replaces the external conditions for the following frames
    pub fn set_environment(&mut self, environment: Environment) {
        self.config.environment = environment;
    }

    /// Returns the boundaries as a box
    pub fn boundaries(&self) -> Aabb {
        self.boundaries
    }

    /// Sets the boundary range of each axis; `None` keeps the previous range
    pub fn set_boundaries(
        &mut self,
        x: Option<(f64, f64)>,
        y: Option<(f64, f64)>,
        z: Option<(f64, f64)>,
    ) {
        if let Some((min, max)) = x {
            self.boundaries.min.x = min;
            self.boundaries.max.x = max;
        }
        if let Some((min, max)) = y {
            self.boundaries.min.y = min;
            self.boundaries.max.y = max;
        }
        if let Some((min, max)) = z {
            self.boundaries.min.z = min;
            self.boundaries.max.z = max;
        }
    }

    /// Adds a node and returns its handle
    pub fn add<N: GridNode>(&mut self, node: N) -> EntityHandle {
        self.add_boxed(Box::new(node))
    }

    /// Adds an already boxed node and returns its handle
    pub fn add_boxed(&mut self, mut node: Box<dyn GridNode>) -> EntityHandle {
        node.entity_mut().set_owner(Some(self.id));
        let node_type = node.node_type();
        let handle = self.children.add(node);

        log::debug!("{:?}: added {} as {:?}", self.id, node_type, handle);
        self.events.add_node_event(NodeEvent {
            event_type: NodeEventType::Added,
            grid: self.id,
            node: handle,
        });

        handle
    }

    /// Removes a node, clearing its owner back-reference
    pub fn remove(&mut self, handle: EntityHandle) -> Result<Box<dyn GridNode>> {
        let mut node = match self.children.remove(handle) {
            Some(node) => node,
            None => {
                log::warn!("{:?}: cannot remove unknown child {:?}", self.id, handle);
                return Err(SimulationError::ResourceNotFound(format!(
                    "Child with handle {:?} not found",
                    handle
                )));
            }
        };
        node.entity_mut().set_owner(None);

        log::debug!("{:?}: removed {:?}", self.id, handle);
        self.events.add_node_event(NodeEvent {
            event_type: NodeEventType::Removed,
            grid: self.id,
            node: handle,
        });

        Ok(node)
    }

    /// Removes a node and returns it as its concrete type
    pub fn remove_as<T: GridNode>(&mut self, handle: EntityHandle) -> Result<T> {
        if !self.children.get_child(handle)?.as_any().is::<T>() {
            return Err(type_mismatch::<T>(handle));
        }

        let node = self.remove(handle)?;
        node.into_any()
            .downcast::<T>()
            .map(|node| *node)
            .map_err(|_| type_mismatch::<T>(handle))
    }

    /// Gets a reference to a child by its handle
    pub fn get(&self, handle: EntityHandle) -> Result<&dyn GridNode> {
        self.children.get_child(handle).map(|node| &**node)
    }

    /// Gets a mutable reference to a child by its handle
    pub fn get_mut(&mut self, handle: EntityHandle) -> Result<&mut dyn GridNode> {
        Ok(&mut **self.children.get_child_mut(handle)?)
    }

    /// Gets a child as its concrete type
    pub fn get_as<T: GridNode>(&self, handle: EntityHandle) -> Result<&T> {
        self.get(handle)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| type_mismatch::<T>(handle))
    }

    /// Gets a child mutably as its concrete type
    pub fn get_as_mut<T: GridNode>(&mut self, handle: EntityHandle) -> Result<&mut T> {
        self.get_mut(handle)?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| type_mismatch::<T>(handle))
    }

    /// Returns the handles of all children in update order
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.children.handles()
    }

    /// Iterates over the children in update order
    pub fn children(&self) -> impl Iterator<Item = (EntityHandle, &dyn GridNode)> + '_ {
        self.children.iter().map(|(handle, node)| (handle, &**node))
    }

    /// Returns the number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns whether the grid has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the position of a child in this grid's parent frame
    pub fn world_position(&self, handle: EntityHandle) -> Result<Vector3> {
        let child = self.get(handle)?;
        Ok(self.entity.get_transform().transform_point(child.entity().get_position()))
    }

    /// Returns the recorded events
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Takes all recorded events, leaving the queue empty
    pub fn drain_events(&mut self) -> EventQueue {
        std::mem::take(&mut self.events)
    }

    /// Advances the whole tree by one frame, using this grid's configuration.
    ///
    /// Events recorded before the call are discarded, so the queue holds
    /// exactly one frame's events until the next update.
    pub fn update(&mut self, dt: f64, now: f64) {
        debug_assert!(dt >= 0.0, "negative frame time {}", dt);
        self.events.clear();

        let mut frame = FrameContext::new(dt, now, &self.config, &mut self.events, self.id);
        update_slots(&mut self.children, &self.boundaries, &mut frame);

        self.time += dt;
    }

    /// Updates every child in insertion order within an ongoing frame
    pub fn update_children(&mut self, frame: &mut FrameContext<'_>) {
        let saved = frame.enter(self.id);
        update_slots(&mut self.children, &self.boundaries, frame);
        frame.leave(saved);
    }

    /// Translates every child not listed in `except`, within the boundaries
    pub fn move_children(&mut self, delta: Vector3, except: &[EntityHandle]) {
        for (handle, child) in self.children.iter_mut() {
            if except.contains(&handle) {
                continue;
            }
            child.move_by(delta);
            clamp_to_boundaries(&mut **child, &self.boundaries);
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("position", &self.entity.get_position())
            .field("children", &self.children.len())
            .field("boundaries", &self.boundaries)
            .finish()
    }
}

impl GridNode for Grid {
    fn node_type(&self) -> &'static str {
        "Grid"
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, _siblings: &Siblings<'_>) {
        // Parent before children
        self.entity.update_physics(frame.dt);
        self.update_children(frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl GridNode for Entity {
    fn node_type(&self) -> &'static str {
        "Entity"
    }

    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, _siblings: &Siblings<'_>) {
        self.update_physics(frame.dt);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

fn update_slots(
    children: &mut ChildStorage<Box<dyn GridNode>>,
    boundaries: &Aabb,
    frame: &mut FrameContext<'_>,
) {
    for index in 0..children.len() {
        let Some(slot) = children.split_slot(index) else {
            break;
        };

        frame.current = Some(slot.handle);
        let siblings = Siblings::new(slot.before, slot.after);
        slot.item.update(frame, &siblings);

        if clamp_to_boundaries(&mut **slot.item, boundaries) {
            log::trace!("{:?}: clamped {:?} to boundaries", frame.grid, slot.handle);
            frame.emit_node_event(NodeEventType::Clamped);
        }
    }
    frame.current = None;
}

/// Pushes a node back inside `boundaries`, zeroing the velocity along every
/// clamped axis. Returns whether the node was moved.
fn clamp_to_boundaries(node: &mut dyn GridNode, boundaries: &Aabb) -> bool {
    let entity = node.entity_mut();
    if entity.flags().contains(EntityFlags::IGNORE_BOUNDARIES) {
        return false;
    }

    let position = entity.get_position();
    if !position.is_finite() || boundaries.contains_point(position) {
        return false;
    }

    let clamped = boundaries.closest_point(position);
    let mut velocity = entity.get_linear_velocity();
    if clamped.x != position.x {
        velocity.x = 0.0;
    }
    if clamped.y != position.y {
        velocity.y = 0.0;
    }
    if clamped.z != position.z {
        velocity.z = 0.0;
    }

    entity.set_position(clamped);
    entity.set_linear_velocity(velocity);
    true
}

fn type_mismatch<T>(handle: EntityHandle) -> SimulationError {
    SimulationError::TypeMismatch(format!(
        "Child {:?} is not a {}",
        handle,
        std::any::type_name::<T>()
    ))
}
